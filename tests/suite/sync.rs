//! Settings views staying consistent with each other and the store.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use flashdeck_engine::{
    ControlInput, Mode, Setting, SettingKey, SettingValue, SettingsStore, SettingsView,
};

use crate::common::memory_app;

#[test]
fn drawer_write_is_visible_in_compact_view() {
    let store = SettingsStore::in_memory();
    let drawer = SettingsView::drawer(store.clone());
    let compact = SettingsView::compact(store.clone());

    drawer.interact(SettingKey::CardDuration, ControlInput::Set(SettingValue::Number(7.0)));

    assert_eq!(compact.readout(SettingKey::CardDuration).as_deref(), Some("7s"));
    assert_eq!(store.get(SettingKey::CardDuration), SettingValue::Number(7.0));
}

#[test]
fn compact_write_is_visible_in_drawer() {
    let store = SettingsStore::in_memory();
    let drawer = SettingsView::drawer(store.clone());
    let compact = SettingsView::compact(store);

    compact.interact(SettingKey::Mode, ControlInput::Cycle);
    compact.interact(SettingKey::SoundEnabled, ControlInput::Toggle);

    assert_eq!(
        drawer.value(SettingKey::Mode),
        Some(SettingValue::Mode(Mode::Random))
    );
    assert_eq!(
        drawer.value(SettingKey::SoundEnabled),
        Some(SettingValue::Bool(false))
    );
}

#[test]
fn listeners_see_every_committed_change_once() {
    let store = SettingsStore::in_memory();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let _sub = store.subscribe(move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });
    let view = SettingsView::drawer(store.clone());

    view.interact(SettingKey::AnimationSpeed, ControlInput::Increment);
    store.set(Setting::AnimationSpeed(1.25));
    store.reset();

    assert_eq!(calls.get(), 2, "unchanged set does not notify");
}

#[test]
fn reduced_motion_setting_zeroes_durations() {
    let store = SettingsStore::in_memory();
    let base = Duration::from_millis(700);
    store.set(Setting::AnimationSpeed(0.5));
    assert_eq!(store.animation_duration(base), Duration::from_millis(1400));

    let drawer = SettingsView::drawer(store.clone());
    drawer.interact(SettingKey::ReduceMotion, ControlInput::Toggle);
    assert_eq!(store.animation_duration(base), Duration::ZERO);
}

#[test]
fn app_views_track_reset() {
    let mut app = memory_app();
    app.compact_adjust(SettingKey::CardDuration, ControlInput::Increment);
    app.compact_adjust(SettingKey::CardDuration, ControlInput::Increment);
    assert_eq!(app.drawer().readout(SettingKey::CardDuration).as_deref(), Some("6s"));

    app.reset_settings();

    assert_eq!(app.drawer().readout(SettingKey::CardDuration).as_deref(), Some("4s"));
    assert_eq!(app.compact().readout(SettingKey::CardDuration).as_deref(), Some("4s"));
}
