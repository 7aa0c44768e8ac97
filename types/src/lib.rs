//! Core domain types for Flashdeck.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod card;
mod settings;
pub mod ui;

pub use card::{Card, CardColor, DECK};
pub use settings::{
    ANIMATION_SPEED_RANGE, CARD_DURATION_RANGE, Mode, Setting, SettingKey, SettingTypeError,
    SettingValue, Settings, SettingsSnapshot, UnknownSettingKey,
};
