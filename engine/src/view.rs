//! Settings surfaces bound to the shared store.
//!
//! A [`SettingsView`] owns one control per bound key. Interacting with a
//! control writes the store at once; the store's notification then re-syncs
//! every view, including the one that wrote. Two views over the same keys can
//! therefore never disagree for longer than one notification.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use flashdeck_types::{
    ANIMATION_SPEED_RANGE, CARD_DURATION_RANGE, Mode, Setting, SettingKey, SettingValue, Settings,
};

use crate::store::{SettingsStore, Subscription};

/// Input widget behind a setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Slider {
        min: f64,
        max: f64,
        step: f64,
        /// Suffix of the readout label, e.g. `"s"` in `"4s"`.
        unit: &'static str,
    },
    Toggle,
    Select {
        options: &'static [Mode],
    },
}

impl Control {
    /// The stock control for `key`.
    #[must_use]
    pub fn for_key(key: SettingKey) -> Self {
        match key {
            SettingKey::CardDuration => Self::Slider {
                min: *CARD_DURATION_RANGE.start(),
                max: *CARD_DURATION_RANGE.end(),
                step: 1.0,
                unit: "s",
            },
            SettingKey::AnimationSpeed => Self::Slider {
                min: *ANIMATION_SPEED_RANGE.start(),
                max: *ANIMATION_SPEED_RANGE.end(),
                step: 0.25,
                unit: "x",
            },
            SettingKey::Mode => Self::Select {
                options: &Mode::ALL,
            },
            SettingKey::SoundEnabled
            | SettingKey::AnimationEnabled
            | SettingKey::AutoplayEnabled
            | SettingKey::ReduceMotion => Self::Toggle,
        }
    }

    /// Value the control would hold after `input`, or `None` if the input
    /// does not apply to this kind of control.
    #[must_use]
    pub fn apply(&self, current: SettingValue, input: ControlInput) -> Option<SettingValue> {
        match (*self, input) {
            (Self::Slider { .. }, ControlInput::Set(SettingValue::Number(value))) => {
                Some(SettingValue::Number(self.clamp(value)))
            }
            (Self::Slider { step, .. }, ControlInput::Increment) => {
                let value = current.as_number()?;
                Some(SettingValue::Number(self.clamp(value + step)))
            }
            (Self::Slider { step, .. }, ControlInput::Decrement) => {
                let value = current.as_number()?;
                Some(SettingValue::Number(self.clamp(value - step)))
            }
            (Self::Toggle, ControlInput::Set(SettingValue::Bool(on))) => {
                Some(SettingValue::Bool(on))
            }
            (
                Self::Toggle,
                ControlInput::Toggle
                | ControlInput::Cycle
                | ControlInput::Increment
                | ControlInput::Decrement,
            ) => Some(SettingValue::Bool(!current.as_bool()?)),
            (Self::Select { options }, ControlInput::Set(SettingValue::Mode(mode))) => {
                options.contains(&mode).then_some(SettingValue::Mode(mode))
            }
            (Self::Select { options }, ControlInput::Cycle | ControlInput::Increment) => {
                step_option(options, current.as_mode()?, 1)
            }
            (Self::Select { options }, ControlInput::Decrement) => {
                step_option(options, current.as_mode()?, -1)
            }
            _ => None,
        }
    }

    /// Readout shown beside a slider, e.g. `"4s"` or `"1.25x"`.
    #[must_use]
    pub fn readout(&self, value: SettingValue) -> Option<String> {
        match (self, value) {
            (Self::Slider { unit, .. }, SettingValue::Number(n)) => Some(format!("{n}{unit}")),
            _ => None,
        }
    }

    fn clamp(&self, value: f64) -> f64 {
        let Self::Slider { min, max, step, .. } = *self else {
            return value;
        };
        if !value.is_finite() {
            return min;
        }
        let snapped = if step > 0.0 {
            min + ((value - min) / step).round() * step
        } else {
            value
        };
        snapped.clamp(min, max)
    }
}

fn step_option(options: &[Mode], current: Mode, delta: isize) -> Option<SettingValue> {
    if options.is_empty() {
        return None;
    }
    let len = options.len() as isize;
    let at = options.iter().position(|m| *m == current).unwrap_or(0) as isize;
    let next = (at + delta).rem_euclid(len) as usize;
    Some(SettingValue::Mode(options[next]))
}

/// A user gesture on a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlInput {
    Increment,
    Decrement,
    Toggle,
    Cycle,
    Set(SettingValue),
}

/// One control as the view currently displays it.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    pub key: SettingKey,
    pub control: Control,
    pub value: SettingValue,
    pub readout: Option<String>,
}

#[derive(Debug)]
struct Binding {
    key: SettingKey,
    control: Control,
    value: SettingValue,
}

impl Binding {
    fn sync(&mut self, snapshot: &Settings) {
        self.value = snapshot.get(self.key);
    }
}

pub struct SettingsView {
    name: &'static str,
    store: SettingsStore,
    bindings: Rc<RefCell<Vec<Binding>>>,
    focus: usize,
    _subscription: Subscription,
}

impl std::fmt::Debug for SettingsView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsView")
            .field("name", &self.name)
            .field("bindings", &self.bindings.borrow())
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl SettingsView {
    /// Bind `keys` (in display order) and subscribe to the store.
    pub fn new(name: &'static str, store: SettingsStore, keys: &[SettingKey]) -> Self {
        let snapshot = store.snapshot();
        let mut bindings: Vec<Binding> = Vec::with_capacity(keys.len());
        for &key in keys {
            if bindings.iter().any(|b| b.key == key) {
                continue;
            }
            bindings.push(Binding {
                key,
                control: Control::for_key(key),
                value: snapshot.get(key),
            });
        }
        let bindings = Rc::new(RefCell::new(bindings));

        let listener_bindings = Rc::clone(&bindings);
        let subscription = store.subscribe(move |snapshot| {
            let mut bindings = listener_bindings
                .try_borrow_mut()
                .map_err(|_| anyhow!("settings view '{name}' is busy"))?;
            for binding in bindings.iter_mut() {
                binding.sync(snapshot);
            }
            Ok(())
        });

        Self {
            name,
            store,
            bindings,
            focus: 0,
            _subscription: subscription,
        }
    }

    /// The full settings drawer.
    pub fn drawer(store: SettingsStore) -> Self {
        Self::new("drawer", store, &SettingKey::ALL)
    }

    /// The inline panel under the card.
    pub fn compact(store: SettingsStore) -> Self {
        Self::new(
            "compact",
            store,
            &[
                SettingKey::CardDuration,
                SettingKey::Mode,
                SettingKey::SoundEnabled,
            ],
        )
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn keys(&self) -> Vec<SettingKey> {
        self.bindings.borrow().iter().map(|b| b.key).collect()
    }

    #[must_use]
    pub fn binds(&self, key: SettingKey) -> bool {
        self.bindings.borrow().iter().any(|b| b.key == key)
    }

    #[must_use]
    pub fn value(&self, key: SettingKey) -> Option<SettingValue> {
        self.bindings
            .borrow()
            .iter()
            .find(|b| b.key == key)
            .map(|b| b.value)
    }

    #[must_use]
    pub fn readout(&self, key: SettingKey) -> Option<String> {
        self.bindings
            .borrow()
            .iter()
            .find(|b| b.key == key)
            .and_then(|b| b.control.readout(b.value))
    }

    /// Snapshot of every control for drawing.
    #[must_use]
    pub fn controls(&self) -> Vec<ControlState> {
        self.bindings
            .borrow()
            .iter()
            .map(|b| ControlState {
                key: b.key,
                control: b.control,
                value: b.value,
                readout: b.control.readout(b.value),
            })
            .collect()
    }

    /// Apply `input` to the control bound to `key` and write the result to
    /// the store. Returns whether the stored value changed. Unbound keys and
    /// inputs the control does not accept are ignored.
    pub fn interact(&self, key: SettingKey, input: ControlInput) -> bool {
        let next = {
            let mut bindings = self.bindings.borrow_mut();
            let Some(binding) = bindings.iter_mut().find(|b| b.key == key) else {
                tracing::trace!(view = self.name, %key, "Ignoring unbound key");
                return false;
            };
            let Some(next) = binding.control.apply(binding.value, input) else {
                return false;
            };
            binding.value = next;
            next
        };
        match Setting::from_parts(key, next) {
            Ok(setting) => self.store.set(setting),
            Err(e) => {
                tracing::warn!(view = self.name, "Control produced a mistyped value: {e}");
                false
            }
        }
    }

    /// Re-read every bound key from the store.
    pub fn sync(&self) {
        let snapshot = self.store.snapshot();
        for binding in self.bindings.borrow_mut().iter_mut() {
            binding.sync(&snapshot);
        }
    }

    #[must_use]
    pub fn focused_key(&self) -> Option<SettingKey> {
        self.bindings.borrow().get(self.focus).map(|b| b.key)
    }

    pub fn focus_next(&mut self) {
        let len = self.bindings.borrow().len();
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    pub fn focus_prev(&mut self) {
        let len = self.bindings.borrow().len();
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    pub fn reset_focus(&mut self) {
        self.focus = 0;
    }

    /// Apply `input` to the focused control.
    pub fn interact_focused(&self, input: ControlInput) -> bool {
        match self.focused_key() {
            Some(key) => self.interact(key, input),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::STORAGE_KEY;

    #[test]
    fn drawer_binds_every_key_and_compact_a_subset() {
        let store = SettingsStore::in_memory();
        let drawer = SettingsView::drawer(store.clone());
        let compact = SettingsView::compact(store);

        assert_eq!(drawer.keys(), SettingKey::ALL.to_vec());
        assert_eq!(
            compact.keys(),
            vec![
                SettingKey::CardDuration,
                SettingKey::Mode,
                SettingKey::SoundEnabled
            ]
        );
        assert!(!compact.binds(SettingKey::ReduceMotion));
    }

    #[test]
    fn readouts_follow_values() {
        let store = SettingsStore::in_memory();
        let drawer = SettingsView::drawer(store);
        assert_eq!(drawer.readout(SettingKey::CardDuration).as_deref(), Some("4s"));
        assert_eq!(drawer.readout(SettingKey::AnimationSpeed).as_deref(), Some("1x"));
        assert_eq!(drawer.readout(SettingKey::SoundEnabled), None);

        drawer.interact(SettingKey::AnimationSpeed, ControlInput::Increment);
        assert_eq!(
            drawer.readout(SettingKey::AnimationSpeed).as_deref(),
            Some("1.25x")
        );
    }

    #[test]
    fn write_from_one_view_updates_the_other() {
        let store = SettingsStore::in_memory();
        let drawer = SettingsView::drawer(store.clone());
        let compact = SettingsView::compact(store.clone());

        assert!(drawer.interact(SettingKey::CardDuration, ControlInput::Set(SettingValue::Number(7.0))));

        assert_eq!(compact.value(SettingKey::CardDuration), Some(SettingValue::Number(7.0)));
        assert_eq!(compact.readout(SettingKey::CardDuration).as_deref(), Some("7s"));
        assert_eq!(store.snapshot().card_duration, 7.0);
    }

    #[test]
    fn direct_store_writes_reach_views() {
        let store = SettingsStore::in_memory();
        let compact = SettingsView::compact(store.clone());

        store.set(Setting::Mode(Mode::Random));
        assert_eq!(compact.value(SettingKey::Mode), Some(SettingValue::Mode(Mode::Random)));

        store.reset();
        assert_eq!(
            compact.value(SettingKey::Mode),
            Some(SettingValue::Mode(Mode::Sequential))
        );
    }

    #[test]
    fn sliders_clamp_and_snap() {
        let store = SettingsStore::in_memory();
        let drawer = SettingsView::drawer(store.clone());

        for _ in 0..20 {
            drawer.interact(SettingKey::CardDuration, ControlInput::Increment);
        }
        assert_eq!(store.snapshot().card_duration, 10.0);

        drawer.interact(SettingKey::CardDuration, ControlInput::Set(SettingValue::Number(0.0)));
        assert_eq!(store.snapshot().card_duration, 2.0);

        drawer.interact(SettingKey::AnimationSpeed, ControlInput::Set(SettingValue::Number(1.3)));
        assert_eq!(store.snapshot().animation_speed, 1.25);
    }

    #[test]
    fn out_of_range_stored_value_is_shown_unclamped_until_touched() {
        let store = SettingsStore::in_memory();
        store.set(Setting::CardDuration(60.0));
        let compact = SettingsView::compact(store.clone());

        assert_eq!(compact.readout(SettingKey::CardDuration).as_deref(), Some("60s"));
        compact.interact(SettingKey::CardDuration, ControlInput::Decrement);
        assert_eq!(store.snapshot().card_duration, 10.0);
    }

    #[test]
    fn toggles_and_selects() {
        let store = SettingsStore::in_memory();
        let compact = SettingsView::compact(store.clone());

        assert!(compact.interact(SettingKey::SoundEnabled, ControlInput::Toggle));
        assert!(!store.snapshot().sound_enabled);

        assert!(compact.interact(SettingKey::Mode, ControlInput::Cycle));
        assert_eq!(store.snapshot().mode, Mode::Random);
        assert!(compact.interact(SettingKey::Mode, ControlInput::Cycle));
        assert_eq!(store.snapshot().mode, Mode::Sequential);
        assert!(compact.interact(SettingKey::Mode, ControlInput::Decrement));
        assert_eq!(store.snapshot().mode, Mode::Random);
    }

    #[test]
    fn unbound_keys_and_mismatched_inputs_are_ignored() {
        let storage = MemoryStorage::new();
        let store = SettingsStore::new(storage.clone());
        let compact = SettingsView::compact(store);

        assert!(!compact.interact(SettingKey::ReduceMotion, ControlInput::Toggle));
        assert!(!compact.interact(SettingKey::CardDuration, ControlInput::Toggle));
        assert!(!compact.interact(SettingKey::Mode, ControlInput::Set(SettingValue::Bool(true))));
        assert_eq!(storage.item(STORAGE_KEY), None);
    }

    #[test]
    fn focus_cycles_through_bound_keys() {
        let store = SettingsStore::in_memory();
        let mut compact = SettingsView::compact(store.clone());

        assert_eq!(compact.focused_key(), Some(SettingKey::CardDuration));
        compact.focus_prev();
        assert_eq!(compact.focused_key(), Some(SettingKey::SoundEnabled));
        compact.focus_next();
        compact.focus_next();
        assert_eq!(compact.focused_key(), Some(SettingKey::Mode));

        compact.interact_focused(ControlInput::Increment);
        assert_eq!(store.snapshot().mode, Mode::Random);
    }

    #[test]
    fn dropping_a_view_unsubscribes() {
        let store = SettingsStore::in_memory();
        let view = SettingsView::drawer(store.clone());
        assert_eq!(store.listener_count(), 1);
        drop(view);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn controls_snapshot_matches_bindings() {
        let store = SettingsStore::in_memory();
        let drawer = SettingsView::drawer(store);
        let controls = drawer.controls();
        assert_eq!(controls.len(), 7);
        assert_eq!(controls[0].readout.as_deref(), Some("4s"));
        assert!(matches!(controls[1].control, Control::Select { .. }));
    }
}
