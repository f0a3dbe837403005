//! Service ports: traits + data contracts.

pub mod runtime;
pub mod search;
pub mod settings;
pub mod shell;

pub use runtime::{AsyncExecutor, BoxFuture};
pub use search::{FileMatches, Match, SearchError, SearchOptions};
pub use settings::{EditorSettings, Locale, SettingsPatch, SettingsStorage, Theme, WordWrap};
pub use shell::{
    CommandResult, OperatingSystem, ShellError, ShellEvent, ShellKind, ShellSession,
};
