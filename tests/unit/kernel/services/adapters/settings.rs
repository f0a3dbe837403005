use super::*;
use crate::kernel::services::ports::settings::{Locale, Theme, WordWrap};
use tempfile::tempdir;

#[test]
fn empty_storage_reads_defaults() {
    let service = SettingsService::in_memory();
    assert_eq!(service.get_settings(), EditorSettings::default());
}

#[test]
fn partial_patch_round_trip() {
    let mut service = SettingsService::in_memory();
    let patch = SettingsPatch {
        font_size: Some(18),
        ..SettingsPatch::default()
    };

    let written = service.update_settings(&patch).unwrap();
    let read = service.get_settings();

    assert_eq!(written, read);
    assert_eq!(
        read,
        EditorSettings {
            font_size: 18,
            ..EditorSettings::default()
        }
    );
}

#[test]
fn successive_patches_accumulate() {
    let mut service = SettingsService::in_memory();
    service
        .update_settings(&SettingsPatch {
            theme: Some(Theme::HighContrast),
            ..SettingsPatch::default()
        })
        .unwrap();
    service
        .update_settings(&SettingsPatch {
            word_wrap: Some(WordWrap::Off),
            locale: Some(Locale::ZhCn),
            ..SettingsPatch::default()
        })
        .unwrap();

    let settings = service.get_settings();
    assert_eq!(settings.theme, Theme::HighContrast);
    assert_eq!(settings.word_wrap, WordWrap::Off);
    assert_eq!(settings.locale, Locale::ZhCn);
}

#[test]
fn malformed_json_falls_back_to_defaults() {
    let service = SettingsService::new(MemorySettingsStorage::with_data("{not json"));
    assert_eq!(service.get_settings(), EditorSettings::default());
}

#[test]
fn stored_partial_record_is_merged() {
    let service = SettingsService::new(MemorySettingsStorage::with_data(
        r#"{"sidebarWidth": 320, "terminalHeight": "tall"}"#,
    ));
    let settings = service.get_settings();
    assert_eq!(settings.sidebar_width, 320);
    assert_eq!(settings.terminal_height, 300);
}

#[test]
fn reset_restores_defaults() {
    let mut service = SettingsService::in_memory();
    service
        .update_settings(&SettingsPatch {
            minimap_enabled: Some(false),
            ..SettingsPatch::default()
        })
        .unwrap();

    assert_eq!(service.reset_settings().unwrap(), EditorSettings::default());
    assert_eq!(service.get_settings(), EditorSettings::default());
}

#[test]
fn file_storage_creates_parent_and_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let mut service = SettingsService::new(FileSettingsStorage::new(&path));
    assert_eq!(service.get_settings(), EditorSettings::default());

    service
        .update_settings(&SettingsPatch {
            font_size: Some(22),
            ..SettingsPatch::default()
        })
        .unwrap();
    assert!(path.exists());

    let reopened = SettingsService::new(FileSettingsStorage::new(&path));
    assert_eq!(reopened.get_settings().font_size, 22);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"fontSize\": 22"));
}
