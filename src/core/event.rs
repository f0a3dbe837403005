use std::fmt;

use compact_str::CompactString;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
        ..Self::NONE
    };
    pub const ALT_SHIFT: Self = Self {
        alt: true,
        shift: true,
        ..Self::NONE
    };
}

/// 一次按键：`key` 取浏览器 `KeyboardEvent.key` 的写法（"s"、"F11"、"`"、" "）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: CompactString,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: &str, modifiers: Modifiers) -> Self {
        Self {
            key: CompactString::new(key),
            modifiers,
        }
    }

    pub fn simple(key: &str) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn ctrl(key: &str) -> Self {
        Self::new(key, Modifiers::CTRL)
    }

    pub fn ctrl_shift(key: &str) -> Self {
        Self::new(key, Modifiers::CTRL_SHIFT)
    }

    pub fn alt(key: &str) -> Self {
        Self::new(key, Modifiers::ALT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChordParseError {
    Empty,
    MissingKey,
    UnknownModifier(String),
}

impl fmt::Display for ChordParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordParseError::Empty => write!(f, "empty key chord"),
            ChordParseError::MissingKey => write!(f, "key chord has no key"),
            ChordParseError::UnknownModifier(m) => write!(f, "unknown modifier: {}", m),
        }
    }
}

impl std::error::Error for ChordParseError {}

/// 解析 "ctrl+shift+f"、"Alt+Z"、"F11"、"ctrl+space"；最后一段为按键，其余为修饰键。
/// 单独的 "+" 或以 "++" 结尾时按键为 "+"。
pub fn parse_key_chord(text: &str) -> Result<KeyEvent, ChordParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ChordParseError::Empty);
    }

    let (mods_part, key) = if text == "+" {
        ("", "+")
    } else if let Some(prefix) = text.strip_suffix("++") {
        (prefix, "+")
    } else {
        match text.rsplit_once('+') {
            Some((mods, key)) => (mods, key),
            None => ("", text),
        }
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(ChordParseError::MissingKey);
    }

    let mut modifiers = Modifiers::NONE;
    for part in mods_part.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            "alt" | "option" => modifiers.alt = true,
            "meta" | "cmd" | "super" => modifiers.meta = true,
            _ => return Err(ChordParseError::UnknownModifier(part.to_string())),
        }
    }

    let key = if key.eq_ignore_ascii_case("space") { " " } else { key };
    Ok(KeyEvent::new(key, modifiers))
}
