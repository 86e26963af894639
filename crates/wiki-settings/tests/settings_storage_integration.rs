//! Integration tests for the settings use case against real stores.
//!
//! These tests exercise `SettingsService` end-to-end with the file-backed and
//! in-memory stores, checking what ends up on disk as well as what the service
//! returns.

use std::path::PathBuf;

use uuid::Uuid;
use wiki_core::{LoadSource, RecordingLog, SiteSettings, SITE_SETTINGS_ID};
use wiki_settings::application::manage_settings::{
    ManageSettingsError, SettingField, SettingsService, SettingsStore,
};
use wiki_settings::infrastructure::storage::{FileSettingsStore, InMemorySettingsStore};

fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("wiki_settings_it_{}", Uuid::new_v4()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_first_run_loads_defaults_from_empty_directory() {
    let dir = temp_data_dir();
    let service = SettingsService::with_log(FileSettingsStore::new(&dir), RecordingLog::new());

    let settings = service.load().expect("defaults on first run");

    assert_eq!(settings, SiteSettings::default());
    assert_eq!(service.log().warnings().len(), 1);
    assert!(!dir.exists(), "loading must not create the data directory");
}

#[test]
fn test_update_writes_record_file_that_wiki_can_read() {
    // Arrange
    let dir = temp_data_dir();
    let store = FileSettingsStore::new(&dir);
    let service = SettingsService::with_log(store.clone(), RecordingLog::new());

    // Act
    service
        .update(SettingField::SiteName, "Engineering wiki")
        .expect("update");
    service
        .update(SettingField::IsRecaptchaEnabled, "yes")
        .expect("update");

    // Assert: the file holds pretty JSON readable through the core contract
    let text = std::fs::read_to_string(store.record_path(SITE_SETTINGS_ID)).expect("record file");
    assert!(text.contains('\n'));
    let log = RecordingLog::new();
    let reloaded = SiteSettings::load_from_json_with(Some(text.as_str()), &log).expect("parse");
    assert_eq!(reloaded.site_name, "Engineering wiki");
    assert!(reloaded.is_recaptcha_enabled);
    assert!(log.entries().is_empty());

    // Cleanup
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_corrupt_record_file_recovers_and_is_repaired_by_next_save() {
    // Arrange: a half-written record on disk
    let dir = temp_data_dir();
    let store = FileSettingsStore::new(&dir);
    store
        .store(SITE_SETTINGS_ID, "{\"SiteName\": \"Half")
        .expect("seed");
    let service = SettingsService::with_log(store.clone(), RecordingLog::new());

    // Act
    let recovered = service.load().expect("recovered");
    service
        .update(SettingField::Theme, "Blackbar")
        .expect("update on top of defaults");

    // Assert
    assert_eq!(recovered, SiteSettings::default());
    assert_eq!(service.log().errors().len(), 2, "each load of the corrupt record logs");
    let fixed = store.fetch(SITE_SETTINGS_ID).expect("fetch").expect("record");
    assert!(fixed.contains("\"Theme\": \"Blackbar\""));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_incompatible_record_is_reported_not_overwritten() {
    let store = InMemorySettingsStore::with_record(
        SITE_SETTINGS_ID,
        r#"{"AllowUserSignup": "sometimes"}"#,
    );
    let service = SettingsService::with_log(&store, RecordingLog::new());

    let result = service.update(SettingField::SiteName, "x");

    assert!(matches!(result, Err(ManageSettingsError::Settings(_))));
    assert_eq!(
        store.fetch(SITE_SETTINGS_ID).unwrap().as_deref(),
        Some(r#"{"AllowUserSignup": "sometimes"}"#)
    );
}

#[test]
fn test_cleared_file_types_are_stored_empty_and_healed_on_read() {
    // Arrange
    let store = InMemorySettingsStore::new();
    let service = SettingsService::with_log(&store, RecordingLog::new());

    // Act
    service
        .update(SettingField::AllowedFileTypes, "")
        .expect("update");
    let value = service.get(SettingField::AllowedFileTypes).expect("get");

    // Assert
    assert_eq!(value, "jpg, png, gif");
    let stored: serde_json::Value =
        serde_json::from_str(&store.fetch(SITE_SETTINGS_ID).unwrap().unwrap()).unwrap();
    assert_eq!(stored["AllowedFileTypes"], "");
    assert_eq!(service.log().warnings().len(), 2, "absent record, then healing read");
}

#[test]
fn test_reset_replaces_customised_record() {
    let store = InMemorySettingsStore::new();
    let service = SettingsService::with_log(&store, RecordingLog::new());
    service
        .update(SettingField::MarkupType, "Markdown")
        .expect("update");

    service.reset().expect("reset");

    assert_eq!(service.load().expect("load"), SiteSettings::default());
}

#[test]
fn test_import_stores_parsed_document() {
    let store = InMemorySettingsStore::new();
    let service = SettingsService::with_log(&store, RecordingLog::new());

    let imported = service
        .import(r#"{"SiteName":"Imported","Theme":"Blackbar"}"#)
        .expect("import");

    assert_eq!(imported.site_name, "Imported");
    assert_eq!(imported.markup_type, "Creole", "omitted keys keep defaults");
    assert_eq!(service.load().expect("load"), imported);
}

#[test]
fn test_import_of_truncated_json_keeps_existing_record() {
    // Arrange: a customised record already in place
    let store = InMemorySettingsStore::new();
    let service = SettingsService::with_log(&store, RecordingLog::new());
    service
        .update(SettingField::SiteName, "Production wiki")
        .expect("seed");
    let before = store.fetch(SITE_SETTINGS_ID).expect("fetch").expect("record");

    // Act
    let result = service.import("{\"SiteName\": \"Half");

    // Assert
    assert!(matches!(
        result,
        Err(ManageSettingsError::NothingToImport(LoadSource::Malformed))
    ));
    let after = store.fetch(SITE_SETTINGS_ID).expect("fetch").expect("record");
    assert_eq!(after, before);
    assert_eq!(service.load().expect("load").site_name, "Production wiki");
}

#[test]
fn test_import_of_empty_file_keeps_existing_record() {
    let dir = temp_data_dir();
    let store = FileSettingsStore::new(&dir);
    let service = SettingsService::with_log(store.clone(), RecordingLog::new());
    service
        .update(SettingField::Theme, "Blackbar")
        .expect("seed");

    let result = service.import("");

    assert!(matches!(
        result,
        Err(ManageSettingsError::NothingToImport(LoadSource::EmptyInput))
    ));
    assert_eq!(service.load().expect("load").theme, "Blackbar");

    std::fs::remove_dir_all(&dir).ok();
}
