//! Process-wide settings store with change notification.
//!
//! One store is constructed at startup and cloned (cheaply, it is an `Rc`
//! handle) into every consumer. Writes persist synchronously under
//! [`STORAGE_KEY`] and then notify subscribers with a fresh snapshot.
//!
//! Listeners run with no internal borrows held, so a listener may read or
//! even write the store while being notified.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use flashdeck_types::{Setting, SettingKey, SettingValue, Settings};

use crate::error::SettingsError;
use crate::storage::{MemoryStorage, StorageBackend};

/// Storage key of the serialized settings record.
pub const STORAGE_KEY: &str = "kidAppSettings";

type Listener = Rc<dyn Fn(&Settings) -> anyhow::Result<()>>;

struct StoreInner {
    settings: RefCell<Settings>,
    backend: RefCell<Box<dyn StorageBackend>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener_id: Cell<u64>,
    system_reduced_motion: Cell<bool>,
    reduced_motion_applied: Cell<bool>,
}

/// Shared handle to the user's preferences.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Rc<StoreInner>,
}

impl fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore")
            .field("settings", &*self.inner.settings.borrow())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

impl SettingsStore {
    /// Build a store and load its record from `backend`.
    ///
    /// An absent, unreadable, or malformed record yields the defaults.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        let settings = match read_record(&backend) {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {e}");
                Settings::default()
            }
        };
        Self {
            inner: Rc::new(StoreInner {
                settings: RefCell::new(settings),
                backend: RefCell::new(Box::new(backend)),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
                system_reduced_motion: Cell::new(false),
                reduced_motion_applied: Cell::new(false),
            }),
        }
    }

    /// A store that is never durable.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    #[must_use]
    pub fn get(&self, key: SettingKey) -> SettingValue {
        self.inner.settings.borrow().get(key)
    }

    #[must_use]
    pub fn snapshot(&self) -> Settings {
        *self.inner.settings.borrow()
    }

    /// Write one setting. Does nothing (and returns `false`) when the value is
    /// unchanged.
    pub fn set(&self, setting: Setting) -> bool {
        let changed = self.inner.settings.borrow_mut().apply(setting);
        if changed {
            tracing::debug!(key = %setting.key(), value = %setting.value(), "Setting changed");
            self.commit();
        }
        changed
    }

    /// Write several settings with one persist and one notification, even if
    /// none of them changed.
    pub fn update(&self, settings: impl IntoIterator<Item = Setting>) {
        {
            let mut current = self.inner.settings.borrow_mut();
            for setting in settings {
                current.apply(setting);
            }
        }
        self.commit();
    }

    /// Restore every key to its default.
    pub fn reset(&self) {
        *self.inner.settings.borrow_mut() = Settings::default();
        tracing::info!("Settings reset to defaults");
        self.commit();
    }

    /// Register `callback` for every change. The callback stays registered
    /// until the returned [`Subscription`] is dropped or unsubscribed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Settings) -> anyhow::Result<()> + 'static,
    {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(callback)));
        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Apply the system-level reduced motion preference. Only the first call
    /// has any effect; when the preference is set, animations are turned off.
    pub fn apply_system_reduced_motion(&self, prefers: bool) {
        if self.inner.reduced_motion_applied.replace(true) {
            tracing::debug!("Reduced motion preference already applied");
            return;
        }
        self.inner.system_reduced_motion.set(prefers);
        if prefers {
            tracing::info!("System prefers reduced motion; disabling animation");
            self.set(Setting::AnimationEnabled(false));
        }
    }

    #[must_use]
    pub fn prefers_reduced_motion(&self) -> bool {
        self.inner.system_reduced_motion.get()
    }

    /// Length of an animation whose nominal length is `base`, after the speed
    /// multiplier. Zero whenever motion is disabled by any switch.
    #[must_use]
    pub fn animation_duration(&self, base: Duration) -> Duration {
        let settings = self.snapshot();
        if self.prefers_reduced_motion() || settings.reduce_motion || !settings.animation_enabled {
            return Duration::ZERO;
        }
        scale_duration(base, settings.animation_speed)
    }

    fn commit(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!("Failed to save settings: {e}");
        }
        self.notify();
    }

    fn persist(&self) -> Result<(), SettingsError> {
        let record = serde_json::to_string(&*self.inner.settings.borrow())?;
        self.inner
            .backend
            .borrow_mut()
            .set_item(STORAGE_KEY, &record)?;
        Ok(())
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            if let Err(e) = listener(&snapshot) {
                tracing::error!("Settings listener error: {e:#}");
            }
        }
    }
}

/// Divide `base` by a speed multiplier. Non-positive or non-finite speeds
/// count as 1.
#[must_use]
pub fn scale_duration(base: Duration, speed: f64) -> Duration {
    let speed = if speed.is_finite() && speed > 0.0 {
        speed
    } else {
        1.0
    };
    let nanos = (base.as_nanos() as f64 / speed).round();
    if nanos < u64::MAX as f64 {
        Duration::from_nanos(nanos as u64)
    } else {
        base
    }
}

fn read_record(backend: &dyn StorageBackend) -> Result<Option<Settings>, SettingsError> {
    let Some(raw) = backend.get_item(STORAGE_KEY)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Registration handle returned by [`SettingsStore::subscribe`].
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .listeners
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}
