//! User preference types shared across crates.
//!
//! `Settings` is the persisted record. Every key always has a value: missing
//! keys deserialize to their defaults, so a partially written record from an
//! older build still loads. A record with a wrongly typed value fails as a
//! whole; the store treats that as "no record".

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Range the UI offers for `cardDuration`, in seconds. The store does not clamp.
pub const CARD_DURATION_RANGE: RangeInclusive<f64> = 2.0..=10.0;

/// Range the UI offers for `animationSpeed` (multiplier). The store does not clamp.
pub const ANIMATION_SPEED_RANGE: RangeInclusive<f64> = 0.5..=2.0;

/// Card ordering used by "next".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Sequential,
    Random,
}

impl Mode {
    pub const ALL: [Self; 2] = [Self::Sequential, Self::Random];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Sequential => "In order",
            Self::Random => "Shuffle",
        }
    }
}

/// The fixed set of setting names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    CardDuration,
    Mode,
    SoundEnabled,
    AnimationEnabled,
    AnimationSpeed,
    AutoplayEnabled,
    ReduceMotion,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown setting key: {0}")]
pub struct UnknownSettingKey(pub String);

impl SettingKey {
    pub const ALL: [Self; 7] = [
        Self::CardDuration,
        Self::Mode,
        Self::SoundEnabled,
        Self::AnimationEnabled,
        Self::AnimationSpeed,
        Self::AutoplayEnabled,
        Self::ReduceMotion,
    ];

    /// Name used in the persisted record.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CardDuration => "cardDuration",
            Self::Mode => "mode",
            Self::SoundEnabled => "soundEnabled",
            Self::AnimationEnabled => "animationEnabled",
            Self::AnimationSpeed => "animationSpeed",
            Self::AutoplayEnabled => "autoplayEnabled",
            Self::ReduceMotion => "reduceMotion",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CardDuration => "Card duration",
            Self::Mode => "Order",
            Self::SoundEnabled => "Sound",
            Self::AnimationEnabled => "Animation",
            Self::AnimationSpeed => "Animation speed",
            Self::AutoplayEnabled => "Autoplay on start",
            Self::ReduceMotion => "Reduce motion",
        }
    }
}

impl FromStr for SettingKey {
    type Err = UnknownSettingKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSettingKey(s.to_string()))
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Untyped view of a setting's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    Mode(Mode),
}

impl SettingValue {
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_mode(self) -> Option<Mode> {
        match self {
            Self::Mode(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("on"),
            Self::Bool(false) => f.write_str("off"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Mode(mode) => f.write_str(mode.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq)]
#[error("setting {key} does not accept {value:?}")]
pub struct SettingTypeError {
    pub key: SettingKey,
    pub value: SettingValue,
}

/// A key together with a correctly typed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting {
    CardDuration(f64),
    Mode(Mode),
    SoundEnabled(bool),
    AnimationEnabled(bool),
    AnimationSpeed(f64),
    AutoplayEnabled(bool),
    ReduceMotion(bool),
}

impl Setting {
    /// Pair an untyped value with its key, rejecting a value of the wrong kind.
    pub fn from_parts(key: SettingKey, value: SettingValue) -> Result<Self, SettingTypeError> {
        let setting = match (key, value) {
            (SettingKey::CardDuration, SettingValue::Number(n)) => Self::CardDuration(n),
            (SettingKey::Mode, SettingValue::Mode(m)) => Self::Mode(m),
            (SettingKey::SoundEnabled, SettingValue::Bool(b)) => Self::SoundEnabled(b),
            (SettingKey::AnimationEnabled, SettingValue::Bool(b)) => Self::AnimationEnabled(b),
            (SettingKey::AnimationSpeed, SettingValue::Number(n)) => Self::AnimationSpeed(n),
            (SettingKey::AutoplayEnabled, SettingValue::Bool(b)) => Self::AutoplayEnabled(b),
            (SettingKey::ReduceMotion, SettingValue::Bool(b)) => Self::ReduceMotion(b),
            _ => return Err(SettingTypeError { key, value }),
        };
        Ok(setting)
    }

    #[must_use]
    pub const fn key(self) -> SettingKey {
        match self {
            Self::CardDuration(_) => SettingKey::CardDuration,
            Self::Mode(_) => SettingKey::Mode,
            Self::SoundEnabled(_) => SettingKey::SoundEnabled,
            Self::AnimationEnabled(_) => SettingKey::AnimationEnabled,
            Self::AnimationSpeed(_) => SettingKey::AnimationSpeed,
            Self::AutoplayEnabled(_) => SettingKey::AutoplayEnabled,
            Self::ReduceMotion(_) => SettingKey::ReduceMotion,
        }
    }

    #[must_use]
    pub const fn value(self) -> SettingValue {
        match self {
            Self::CardDuration(n) | Self::AnimationSpeed(n) => SettingValue::Number(n),
            Self::Mode(m) => SettingValue::Mode(m),
            Self::SoundEnabled(b)
            | Self::AnimationEnabled(b)
            | Self::AutoplayEnabled(b)
            | Self::ReduceMotion(b) => SettingValue::Bool(b),
        }
    }
}

/// All user preferences.
///
/// Copies handed to listeners are snapshots: later writes to the store never
/// reach them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Seconds each card stays up during autoplay.
    pub card_duration: f64,
    pub mode: Mode,
    pub sound_enabled: bool,
    pub animation_enabled: bool,
    /// Animation speed multiplier.
    pub animation_speed: f64,
    pub autoplay_enabled: bool,
    pub reduce_motion: bool,
}

pub type SettingsSnapshot = Settings;

impl Default for Settings {
    fn default() -> Self {
        Self {
            card_duration: 4.0,
            mode: Mode::Sequential,
            sound_enabled: true,
            animation_enabled: true,
            animation_speed: 1.0,
            autoplay_enabled: false,
            reduce_motion: false,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::CardDuration => SettingValue::Number(self.card_duration),
            SettingKey::Mode => SettingValue::Mode(self.mode),
            SettingKey::SoundEnabled => SettingValue::Bool(self.sound_enabled),
            SettingKey::AnimationEnabled => SettingValue::Bool(self.animation_enabled),
            SettingKey::AnimationSpeed => SettingValue::Number(self.animation_speed),
            SettingKey::AutoplayEnabled => SettingValue::Bool(self.autoplay_enabled),
            SettingKey::ReduceMotion => SettingValue::Bool(self.reduce_motion),
        }
    }

    /// Write one setting. Returns `false` when the value was already equal.
    pub fn apply(&mut self, setting: Setting) -> bool {
        if self.get(setting.key()) == setting.value() {
            return false;
        }
        match setting {
            Setting::CardDuration(n) => self.card_duration = n,
            Setting::Mode(m) => self.mode = m,
            Setting::SoundEnabled(b) => self.sound_enabled = b,
            Setting::AnimationEnabled(b) => self.animation_enabled = b,
            Setting::AnimationSpeed(n) => self.animation_speed = n,
            Setting::AutoplayEnabled(b) => self.autoplay_enabled = b,
            Setting::ReduceMotion(b) => self.reduce_motion = b,
        }
        true
    }

    /// Autoplay period. Non-finite or negative durations collapse to zero.
    #[must_use]
    pub fn card_period(&self) -> Duration {
        Duration::try_from_secs_f64(self.card_duration).unwrap_or(Duration::ZERO)
    }
}
