use compact_str::CompactString;

use crate::core::KeyEvent;
use crate::kernel::services::ports::{
    CommandResult, Locale, SettingsPatch, ShellError, ShellSession, Theme,
};
use crate::kernel::shortcuts::ShortcutAction;
use crate::kernel::state::{Dialog, NewItemKind, SidebarTab};
use crate::models::NodeId;

#[derive(Debug, Clone)]
pub enum Action {
    KeyPressed {
        event: KeyEvent,
        in_text_input: bool,
    },
    Shortcut(ShortcutAction),

    SelectFile(NodeId),
    CloseTab(NodeId),
    ReorderTabs {
        from: usize,
        to: usize,
    },
    CloseOtherTabs(NodeId),
    CloseTabsToRight(NodeId),
    CloseSavedTabs,
    CloseAllTabs,
    EditorContentChanged {
        file: NodeId,
        content: String,
    },
    SaveFile(NodeId),
    SaveActive,
    SaveAll,
    NewUntitledFile,

    ExplorerToggleFolder(NodeId),
    ExplorerSetFilter(String),
    ExplorerBeginNewItem {
        kind: NewItemKind,
        parent: NodeId,
    },
    ExplorerSetNewItemName(String),
    ExplorerCommitNewItem,
    ExplorerCancelNewItem,

    SearchSetQuery(String),
    SearchToggleCaseSensitive,
    SearchToggleWholeWord,
    SearchToggleRegex,
    SearchToggleFileExpanded(NodeId),
    SearchOpenMatch {
        file: NodeId,
        line: usize,
    },

    ToggleSidebar,
    SetSidebarTab(SidebarTab),
    ToggleTerminal,
    SetSidebarWidth(u32),
    SetTerminalHeight(u32),
    SetTheme(Theme),
    SetFontSize(u32),
    SetLocale(Locale),
    ToggleWordWrap,
    ToggleMinimap,
    ApplySettings(SettingsPatch),

    OpenDialog(Dialog),
    CloseDialog,
    QuickOpenSetQuery(String),
    QuickOpenMoveSelection(isize),
    QuickOpenAccept,
    GoToLineSubmit(String),
    ShortcutsSetQuery(String),

    TerminalNew,
    TerminalSessionOpened(ShellSession),
    TerminalSelectTab(usize),
    TerminalCloseTab(usize),
    TerminalSetInput(String),
    TerminalHistoryUp,
    TerminalHistoryDown,
    TerminalSubmit,
    TerminalInterrupt,
    TerminalClearScreen,
    TerminalCommandFinished {
        request: u64,
        result: Result<CommandResult, ShellError>,
        prompt: Option<String>,
    },
    TerminalCleared(CompactString),
}
