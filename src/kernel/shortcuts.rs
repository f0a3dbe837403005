//! 快捷键表与分发规则

use rustc_hash::FxHashSet;

use crate::core::{KeyEvent, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    Save,
    SaveAll,
    NewFile,
    OpenFile,
    Find,
    Replace,
    FindInFiles,
    GoToLine,
    ToggleSidebar,
    ToggleTerminal,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    FormatDocument,
    CommentLine,
    FoldCode,
    UnfoldCode,
    IndentLine,
    OutdentLine,
    QuickOpen,
    ToggleFullScreen,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ToggleWordWrap,
    ToggleMinimap,
    ChangeTheme,
}

impl ShortcutAction {
    pub const ALL: [ShortcutAction; 30] = [
        Self::Save,
        Self::SaveAll,
        Self::NewFile,
        Self::OpenFile,
        Self::Find,
        Self::Replace,
        Self::FindInFiles,
        Self::GoToLine,
        Self::ToggleSidebar,
        Self::ToggleTerminal,
        Self::Undo,
        Self::Redo,
        Self::Cut,
        Self::Copy,
        Self::Paste,
        Self::SelectAll,
        Self::FormatDocument,
        Self::CommentLine,
        Self::FoldCode,
        Self::UnfoldCode,
        Self::IndentLine,
        Self::OutdentLine,
        Self::QuickOpen,
        Self::ToggleFullScreen,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::ResetZoom,
        Self::ToggleWordWrap,
        Self::ToggleMinimap,
        Self::ChangeTheme,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::SaveAll => "saveAll",
            Self::NewFile => "newFile",
            Self::OpenFile => "openFile",
            Self::Find => "find",
            Self::Replace => "replace",
            Self::FindInFiles => "findInFiles",
            Self::GoToLine => "goToLine",
            Self::ToggleSidebar => "toggleSidebar",
            Self::ToggleTerminal => "toggleTerminal",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Cut => "cut",
            Self::Copy => "copy",
            Self::Paste => "paste",
            Self::SelectAll => "selectAll",
            Self::FormatDocument => "formatDocument",
            Self::CommentLine => "commentLine",
            Self::FoldCode => "foldCode",
            Self::UnfoldCode => "unfoldCode",
            Self::IndentLine => "indentLine",
            Self::OutdentLine => "outdentLine",
            Self::QuickOpen => "quickOpen",
            Self::ToggleFullScreen => "toggleFullScreen",
            Self::ZoomIn => "zoomIn",
            Self::ZoomOut => "zoomOut",
            Self::ResetZoom => "resetZoom",
            Self::ToggleWordWrap => "toggleWordWrap",
            Self::ToggleMinimap => "toggleMinimap",
            Self::ChangeTheme => "changeTheme",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub action: ShortcutAction,
    pub key: &'static str,
    pub modifiers: Modifiers,
    /// i18n key
    pub description: &'static str,
    pub prevent_default: bool,
    /// 焦点在文本输入框内时仍然生效
    pub global: bool,
}

impl Shortcut {
    const fn new(
        action: ShortcutAction,
        key: &'static str,
        modifiers: Modifiers,
        description: &'static str,
    ) -> Self {
        Self {
            action,
            key,
            modifiers,
            description,
            prevent_default: true,
            global: false,
        }
    }

    const fn global(mut self) -> Self {
        self.global = true;
        self
    }

    const fn passthrough(mut self) -> Self {
        self.prevent_default = false;
        self
    }

    /// 按键不区分大小写，四个修饰键逐一精确比较
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key.to_lowercase() == event.key.to_lowercase() && self.modifiers == event.modifiers
    }

    pub fn format(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(5);
        if self.modifiers.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.shift {
            parts.push("Shift".to_string());
        }
        if self.modifiers.alt {
            parts.push("Alt".to_string());
        }
        if self.modifiers.meta {
            parts.push("Meta".to_string());
        }
        let key = if self.key == " " {
            "Space".to_string()
        } else if self.key.chars().count() == 1 {
            self.key.to_uppercase()
        } else {
            self.key.to_string()
        };
        parts.push(key);
        parts.join("+")
    }
}

use Modifiers as M;
use ShortcutAction as A;

static DEFAULT_SHORTCUTS: [Shortcut; 30] = [
    Shortcut::new(A::Save, "s", M::CTRL, "common.save").global(),
    Shortcut::new(A::SaveAll, "s", M::CTRL_SHIFT, "common.saveAll").global(),
    Shortcut::new(A::NewFile, "n", M::CTRL, "common.new").global(),
    Shortcut::new(A::OpenFile, "o", M::CTRL, "common.open").global(),
    Shortcut::new(A::Find, "f", M::CTRL, "common.find").global(),
    Shortcut::new(A::Replace, "h", M::CTRL, "common.replace").global(),
    Shortcut::new(A::FindInFiles, "f", M::CTRL_SHIFT, "search.findInFiles").global(),
    Shortcut::new(A::GoToLine, "g", M::CTRL, "goToLine.title").global(),
    Shortcut::new(A::ToggleSidebar, "b", M::CTRL, "explorer.title").global(),
    Shortcut::new(A::ToggleTerminal, "`", M::CTRL, "terminal.title").global(),
    Shortcut::new(A::Undo, "z", M::CTRL, "common.undo"),
    Shortcut::new(A::Redo, "y", M::CTRL, "common.redo"),
    Shortcut::new(A::Cut, "x", M::CTRL, "common.cut").passthrough(),
    Shortcut::new(A::Copy, "c", M::CTRL, "common.copy").passthrough(),
    Shortcut::new(A::Paste, "v", M::CTRL, "common.paste").passthrough(),
    Shortcut::new(A::SelectAll, "a", M::CTRL, "common.selectAll"),
    Shortcut::new(A::FormatDocument, "f", M::ALT_SHIFT, "editor.formatDocument"),
    Shortcut::new(A::CommentLine, "/", M::CTRL, "editor.toggleComment"),
    Shortcut::new(A::FoldCode, "[", M::CTRL_SHIFT, "editor.foldCode"),
    Shortcut::new(A::UnfoldCode, "]", M::CTRL_SHIFT, "editor.unfoldCode"),
    Shortcut::new(A::IndentLine, "]", M::CTRL, "editor.indentLine"),
    Shortcut::new(A::OutdentLine, "[", M::CTRL, "editor.outdentLine"),
    Shortcut::new(A::QuickOpen, "p", M::CTRL, "quickOpen.title").global(),
    Shortcut::new(A::ToggleFullScreen, "F11", M::NONE, "common.fullScreen").global(),
    Shortcut::new(A::ZoomIn, "=", M::CTRL, "common.zoomIn").global(),
    Shortcut::new(A::ZoomOut, "-", M::CTRL, "common.zoomOut").global(),
    Shortcut::new(A::ResetZoom, "0", M::CTRL, "common.resetZoom").global(),
    Shortcut::new(A::ToggleWordWrap, "z", M::ALT, "editor.wordWrap"),
    Shortcut::new(A::ToggleMinimap, "m", M::CTRL_SHIFT, "editor.minimap"),
    Shortcut::new(A::ChangeTheme, "k", M::CTRL, "common.theme").global(),
];

pub fn default_shortcuts() -> &'static [Shortcut] {
    &DEFAULT_SHORTCUTS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutHit {
    pub action: ShortcutAction,
    pub prevent_default: bool,
}

/// 快捷键表 + 已注册处理器的动作集合
#[derive(Debug, Clone)]
pub struct ShortcutRegistry {
    shortcuts: Vec<Shortcut>,
    handlers: FxHashSet<ShortcutAction>,
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new(default_shortcuts().to_vec())
    }
}

impl ShortcutRegistry {
    pub fn new(shortcuts: Vec<Shortcut>) -> Self {
        Self {
            shortcuts,
            handlers: FxHashSet::default(),
        }
    }

    /// 默认表，且每个动作都有处理器
    pub fn with_all_handlers() -> Self {
        let mut registry = Self::default();
        registry.handlers.extend(ShortcutAction::ALL);
        registry
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    pub fn register_handler(&mut self, action: ShortcutAction) -> bool {
        self.handlers.insert(action)
    }

    pub fn unregister_handler(&mut self, action: ShortcutAction) -> bool {
        self.handlers.remove(&action)
    }

    pub fn has_handler(&self, action: ShortcutAction) -> bool {
        self.handlers.contains(&action)
    }

    pub fn shortcut_for(&self, action: ShortcutAction) -> Option<&Shortcut> {
        self.shortcuts.iter().find(|s| s.action == action)
    }

    /// 焦点在文本输入框内时只考虑 global 快捷键；按表顺序第一个有处理器的匹配项胜出
    pub fn resolve(&self, event: &KeyEvent, in_text_input: bool) -> Option<ShortcutHit> {
        self.shortcuts
            .iter()
            .filter(|s| !in_text_input || s.global)
            .filter(|s| s.matches(event))
            .find(|s| self.handlers.contains(&s.action))
            .map(|s| ShortcutHit {
                action: s.action,
                prevent_default: s.prevent_default,
            })
    }

    /// 供快捷键对话框按描述或组合键过滤
    pub fn filter<'a>(
        &'a self,
        query: &str,
        describe: impl Fn(&Shortcut) -> String,
    ) -> Vec<&'a Shortcut> {
        let query = query.trim().to_lowercase();
        self.shortcuts
            .iter()
            .filter(|s| {
                query.is_empty()
                    || describe(s).to_lowercase().contains(&query)
                    || s.format().to_lowercase().contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/shortcuts.rs"]
mod tests;
