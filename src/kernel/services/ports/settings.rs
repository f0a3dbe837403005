use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 30;
pub const DEFAULT_FONT_SIZE: u32 = 14;
pub const MIN_PANEL_SIZE: u32 = 100;
pub const MAX_PANEL_SIZE: u32 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[serde(rename = "vs")]
    Light,
    #[default]
    #[serde(rename = "vs-dark")]
    Dark,
    #[serde(rename = "hc-black")]
    HighContrast,
}

impl Theme {
    /// vs → vs-dark → hc-black → vs
    pub fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::HighContrast,
            Self::HighContrast => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "vs",
            Self::Dark => "vs-dark",
            Self::HighContrast => "hc-black",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordWrap {
    #[default]
    On,
    Off,
}

impl WordWrap {
    pub fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-CN")]
    ZhCn,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::ZhCn => "zh-CN",
        }
    }
}

/// 持久化的界面偏好
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    pub theme: Theme,
    pub font_size: u32,
    pub word_wrap: WordWrap,
    pub minimap_enabled: bool,
    pub sidebar_visible: bool,
    pub terminal_visible: bool,
    pub sidebar_width: u32,
    pub terminal_height: u32,
    pub locale: Locale,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            font_size: DEFAULT_FONT_SIZE,
            word_wrap: WordWrap::On,
            minimap_enabled: true,
            sidebar_visible: true,
            terminal_visible: false,
            sidebar_width: 250,
            terminal_height: 300,
            locale: Locale::En,
        }
    }
}

impl EditorSettings {
    /// 逐字段合并到默认值之上：缺失或类型错误的字段保留默认值，未知字段忽略。
    /// 返回结果以及被丢弃的字段名。
    pub fn from_value(value: &Value) -> (Self, Vec<&'static str>) {
        let mut settings = Self::default();
        let Some(map) = value.as_object() else {
            return (settings, Vec::new());
        };

        let mut rejected = Vec::new();
        merge_field(map, "theme", &mut settings.theme, &mut rejected);
        merge_field(map, "fontSize", &mut settings.font_size, &mut rejected);
        merge_field(map, "wordWrap", &mut settings.word_wrap, &mut rejected);
        merge_field(map, "minimapEnabled", &mut settings.minimap_enabled, &mut rejected);
        merge_field(map, "sidebarVisible", &mut settings.sidebar_visible, &mut rejected);
        merge_field(map, "terminalVisible", &mut settings.terminal_visible, &mut rejected);
        merge_field(map, "sidebarWidth", &mut settings.sidebar_width, &mut rejected);
        merge_field(map, "terminalHeight", &mut settings.terminal_height, &mut rejected);
        merge_field(map, "locale", &mut settings.locale, &mut rejected);
        (settings, rejected)
    }

    /// 字号与面板尺寸夹到允许范围内
    pub fn normalized(mut self) -> Self {
        self.font_size = clamp_font_size(self.font_size);
        self.sidebar_width = clamp_panel_size(self.sidebar_width);
        self.terminal_height = clamp_panel_size(self.terminal_height);
        self
    }
}

pub fn clamp_font_size(size: u32) -> u32 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

pub fn clamp_panel_size(size: u32) -> u32 {
    size.clamp(MIN_PANEL_SIZE, MAX_PANEL_SIZE)
}

fn merge_field<T: DeserializeOwned>(
    map: &Map<String, Value>,
    key: &'static str,
    slot: &mut T,
    rejected: &mut Vec<&'static str>,
) {
    let Some(raw) = map.get(key) else {
        return;
    };
    match T::deserialize(raw) {
        Ok(value) => *slot = value,
        Err(_) => rejected.push(key),
    }
}

/// 局部更新：只有 `Some` 的字段会覆盖
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_wrap: Option<WordWrap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimap_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn normalized(mut self) -> Self {
        self.font_size = self.font_size.map(clamp_font_size);
        self.sidebar_width = self.sidebar_width.map(clamp_panel_size);
        self.terminal_height = self.terminal_height.map(clamp_panel_size);
        self
    }

    pub fn apply_to(&self, settings: &mut EditorSettings) {
        if let Some(v) = self.theme {
            settings.theme = v;
        }
        if let Some(v) = self.font_size {
            settings.font_size = v;
        }
        if let Some(v) = self.word_wrap {
            settings.word_wrap = v;
        }
        if let Some(v) = self.minimap_enabled {
            settings.minimap_enabled = v;
        }
        if let Some(v) = self.sidebar_visible {
            settings.sidebar_visible = v;
        }
        if let Some(v) = self.terminal_visible {
            settings.terminal_visible = v;
        }
        if let Some(v) = self.sidebar_width {
            settings.sidebar_width = v;
        }
        if let Some(v) = self.terminal_height {
            settings.terminal_height = v;
        }
        if let Some(v) = self.locale {
            settings.locale = v;
        }
    }
}

/// 偏好记录的持久化后端（原始 JSON 文本）
pub trait SettingsStorage: Send {
    fn read(&self) -> std::io::Result<Option<String>>;
    fn write(&mut self, data: &str) -> std::io::Result<()>;
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
