//! Settings persistence through the file backend.

use std::fs;

use flashdeck_engine::{
    App, FileStorage, LaunchOptions, Mode, STORAGE_KEY, Setting, SettingKey, SettingValue,
    Settings, SettingsStore, SilentTones, UiOptions,
};
use tempfile::tempdir;

use crate::common::file_app;

#[test]
fn settings_survive_a_restart() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("storage.json");

    let store = SettingsStore::new(FileStorage::new(&path));
    store.update([
        Setting::CardDuration(6.0),
        Setting::Mode(Mode::Random),
        Setting::SoundEnabled(false),
    ]);
    drop(store);

    let reopened = SettingsStore::new(FileStorage::new(&path));
    let snap = reopened.snapshot();
    assert_eq!(snap.card_duration, 6.0);
    assert_eq!(snap.mode, Mode::Random);
    assert!(!snap.sound_enabled);
    assert!(snap.animation_enabled);
}

#[test]
fn document_holds_camel_case_record_under_storage_key() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("storage.json");

    let store = SettingsStore::new(FileStorage::new(&path));
    store.set(Setting::AnimationSpeed(1.5));

    let raw = fs::read_to_string(&path).expect("document written");
    let document: serde_json::Value = serde_json::from_str(&raw).expect("json document");
    let record = document[STORAGE_KEY].as_str().expect("record is a string");
    let record: serde_json::Value = serde_json::from_str(record).expect("json record");
    assert_eq!(record["animationSpeed"], 1.5);
    assert_eq!(record["mode"], "sequential");
    assert_eq!(record["reduceMotion"], false);
}

#[test]
fn first_run_uses_defaults() {
    let dir = tempdir().expect("temp dir");
    let app = file_app(&dir.path().join("storage.json"));
    assert_eq!(app.settings(), Settings::default());
    assert!(!app.deck().is_playing());
}

#[test]
fn corrupt_document_falls_back_and_is_replaced() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("storage.json");
    fs::write(&path, "not json at all").expect("seed corrupt file");

    let store = SettingsStore::new(FileStorage::new(&path));
    assert_eq!(store.snapshot(), Settings::default());

    store.set(Setting::CardDuration(3.0));
    let reopened = SettingsStore::new(FileStorage::new(&path));
    assert_eq!(reopened.snapshot().card_duration, 3.0);
}

#[test]
fn malformed_record_falls_back_to_defaults() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("storage.json");
    let document = serde_json::json!({ STORAGE_KEY: "{\"cardDuration\": \"slow\"}" });
    fs::write(&path, document.to_string()).expect("seed document");

    let store = SettingsStore::new(FileStorage::new(&path));
    assert_eq!(store.snapshot(), Settings::default());
}

#[test]
fn unknown_keys_are_ignored_and_missing_keys_defaulted() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("storage.json");
    let record = r#"{"mode":"random","theme":"dark"}"#;
    let document = serde_json::json!({ STORAGE_KEY: record, "otherApp": "kept" });
    fs::write(&path, document.to_string()).expect("seed document");

    let store = SettingsStore::new(FileStorage::new(&path));
    assert_eq!(store.get(SettingKey::Mode), SettingValue::Mode(Mode::Random));
    assert_eq!(store.get(SettingKey::CardDuration), SettingValue::Number(4.0));

    // Writing our key leaves other items alone.
    store.set(Setting::SoundEnabled(false));
    let raw = fs::read_to_string(&path).expect("document");
    let document: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(document["otherApp"], "kept");
}

#[test]
fn autoplay_on_start_persists_across_launches() {
    let dir = tempdir().expect("temp dir");
    let options = LaunchOptions {
        ui: UiOptions::default(),
        storage_path: Some(dir.path().join("storage.json")),
    };

    let app = App::from_options(&options, Box::new(SilentTones::new()));
    app.store().set(Setting::AutoplayEnabled(true));
    drop(app);

    let app = App::from_options(&options, Box::new(SilentTones::new()));
    assert!(app.deck().is_playing());
}

#[test]
fn reduced_motion_signal_is_persisted() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("storage.json");
    let options = LaunchOptions {
        ui: UiOptions {
            reduced_motion: true,
            ..UiOptions::default()
        },
        storage_path: Some(path.clone()),
    };

    let app = App::from_options(&options, Box::new(SilentTones::new()));
    assert!(app.stage().timings().is_still());
    drop(app);

    let reopened = SettingsStore::new(FileStorage::new(&path));
    assert!(!reopened.snapshot().animation_enabled);
}
