use compact_str::CompactString;

use crate::kernel::i18n::Translator;
use crate::kernel::language::LanguageId;
use crate::kernel::quick_open::QuickOpenState;
use crate::kernel::search::SearchState;
use crate::kernel::services::ports::{EditorSettings, Theme, WordWrap};
use crate::kernel::tabs::TabsState;
use crate::kernel::terminal::TerminalState;
use crate::models::{FileTree, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarTab {
    #[default]
    Explorer,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    QuickOpen,
    GoToLine,
    Shortcuts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewItemKind {
    File,
    Folder,
}

/// 资源管理器里正在输入名字的新建项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemDraft {
    pub kind: NewItemKind,
    pub parent: NodeId,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub sidebar_tab: SidebarTab,
    pub explorer_filter: String,
    pub new_item: Option<NewItemDraft>,
    /// 同一时间最多一个对话框
    pub dialog: Option<Dialog>,
    pub shortcuts_query: String,
    pub full_screen: bool,
}

/// 交给编辑器组件的输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorProps {
    pub file: NodeId,
    pub content: String,
    pub language: LanguageId,
    pub theme: Theme,
    pub font_size: u32,
    pub word_wrap: WordWrap,
    pub minimap: bool,
}

#[derive(Debug)]
pub struct AppState {
    pub project_name: CompactString,
    pub tree: FileTree,
    pub tabs: TabsState,
    pub search: SearchState,
    pub quick_open: QuickOpenState,
    pub terminal: TerminalState,
    pub settings: EditorSettings,
    pub i18n: Translator,
    pub ui: UiState,
}

impl AppState {
    pub fn new(tree: FileTree, settings: EditorSettings) -> Self {
        let settings = settings.normalized();
        let project_name = tree
            .resolve(tree.root())
            .map(|root| CompactString::from(root.name()))
            .unwrap_or_default();
        Self {
            project_name,
            tree,
            tabs: TabsState::new(),
            search: SearchState::default(),
            quick_open: QuickOpenState::default(),
            terminal: TerminalState::default(),
            i18n: Translator::builtin(settings.locale),
            settings,
            ui: UiState::default(),
        }
    }

    pub fn active_file(&self) -> Option<NodeId> {
        self.tabs.active()
    }

    pub fn editor_props(&self) -> Option<EditorProps> {
        let id = self.tabs.active()?;
        let node = self.tree.resolve(id)?;
        Some(EditorProps {
            file: id,
            content: node.content().to_string(),
            language: node.language().unwrap_or_default(),
            theme: self.settings.theme,
            font_size: self.settings.font_size,
            word_wrap: self.settings.word_wrap,
            minimap: self.settings.minimap_enabled,
        })
    }

    /// 活动文件的行数（至少 1）
    pub fn active_line_count(&self) -> Option<usize> {
        let node = self.tree.resolve(self.tabs.active()?)?;
        Some(memchr::memchr_iter(b'\n', node.content().as_bytes()).count() + 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
