//! Service adapters: storage/runtime specific implementations.

pub mod content_search;
pub mod runtime;
pub mod settings;
pub mod shell;

pub use content_search::{search_files, ContentSearcher};
pub use runtime::TokioExecutor;
pub use settings::{
    ensure_log_dir, get_log_dir, get_settings_path, FileSettingsStorage, MemorySettingsStorage,
    SettingsError, SettingsService,
};
pub use shell::{ShellConfig, SimulatedShell};
