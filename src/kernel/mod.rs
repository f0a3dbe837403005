//! Headless application core (state/action/effect).

pub mod action;
pub mod effect;
pub mod i18n;
pub mod language;
pub mod quick_open;
pub mod search;
pub mod services;
pub mod shortcuts;
pub mod state;
pub mod store;
pub mod tabs;
pub mod terminal;

pub use action::Action;
pub use effect::{EditorCommand, Effect};
pub use i18n::Translator;
pub use language::LanguageId;
pub use quick_open::QuickOpenState;
pub use search::{SearchFileResult, SearchState};
pub use shortcuts::{default_shortcuts, Shortcut, ShortcutAction, ShortcutHit, ShortcutRegistry};
pub use state::{
    AppState, Dialog, EditorProps, NewItemDraft, NewItemKind, SidebarTab, UiState,
};
pub use store::{DispatchResult, Store};
pub use tabs::TabsState;
pub use terminal::{TerminalEntry, TerminalState, TerminalTab};
