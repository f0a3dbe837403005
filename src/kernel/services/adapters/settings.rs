//! 偏好存储：读取时逐字段回退默认值，每次变更整体写回

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::Service;
use crate::kernel::services::ports::settings::{EditorSettings, SettingsPatch, SettingsStorage};

const SETTINGS_DIR: &str = ".codepad";
const SETTINGS_FILE: &str = "settings.json";
const LOG_DIR: &str = "logs";

#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "settings IO error: {}", e),
            SettingsError::Serialize(e) => write!(f, "settings serialization error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<io::Error> for SettingsError {
    fn from(e: io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Serialize(e)
    }
}

pub struct FileSettingsStorage {
    path: PathBuf,
}

impl FileSettingsStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 位于缓存目录下的默认设置文件
    pub fn default_location() -> Option<Self> {
        get_settings_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStorage for FileSettingsStorage {
    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, data: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, data)
    }
}

#[derive(Debug, Default)]
pub struct MemorySettingsStorage {
    data: Option<String>,
}

impl MemorySettingsStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
        }
    }
}

impl SettingsStorage for MemorySettingsStorage {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.data.clone())
    }

    fn write(&mut self, data: &str) -> io::Result<()> {
        self.data = Some(data.to_string());
        Ok(())
    }
}

pub struct SettingsService {
    storage: Box<dyn SettingsStorage>,
}

impl SettingsService {
    pub fn new(storage: impl SettingsStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemorySettingsStorage::new())
    }

    /// 读取失败或内容损坏时回退到默认值，不返回错误
    pub fn get_settings(&self) -> EditorSettings {
        let data = match self.storage.read() {
            Ok(Some(data)) => data,
            Ok(None) => return EditorSettings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read settings; using defaults");
                return EditorSettings::default();
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&data) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse stored settings; using defaults");
                return EditorSettings::default();
            }
        };

        let (settings, rejected) = EditorSettings::from_value(&value);
        if !rejected.is_empty() {
            tracing::warn!(fields = ?rejected, "ignored malformed settings fields");
        }
        settings
    }

    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<EditorSettings, SettingsError> {
        let mut settings = self.get_settings();
        patch.apply_to(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }

    pub fn save(&mut self, settings: &EditorSettings) -> Result<(), SettingsError> {
        let data = serde_json::to_string_pretty(settings)?;
        self.storage.write(&data)?;
        tracing::debug!("settings saved");
        Ok(())
    }

    pub fn reset_settings(&mut self) -> Result<EditorSettings, SettingsError> {
        let settings = EditorSettings::default();
        self.save(&settings)?;
        Ok(settings)
    }
}

impl Service for SettingsService {
    fn name(&self) -> &'static str {
        "SettingsService"
    }
}

pub fn get_settings_path() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(SETTINGS_DIR).join(LOG_DIR))
}

pub fn ensure_log_dir() -> io::Result<PathBuf> {
    let dir = get_log_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Cannot determine cache directory")
    })?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn get_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Caches"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".cache"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return Some(PathBuf::from(local));
        }
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
