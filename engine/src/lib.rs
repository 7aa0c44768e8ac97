//! Core engine for Flashdeck: settings store, deck state machine, and
//! orchestration.
//!
//! This crate contains the App state machine without TUI dependencies.

mod animation;
mod app;
pub mod config;
mod deck;
mod error;
mod presentation;
mod scheduler;
mod storage;
mod store;
mod tone;
mod view;

pub use animation::{AnimationTimings, EffectTimer};
pub use app::{App, Stage};
pub use config::{ConfigError, FlashdeckConfig, LaunchOptions};
pub use deck::{CardDeckController, CardPicker, DeckPhase, EmptyDeckError, RandomPicker, SETTLE_DELAY};
pub use error::{SettingsError, StorageError};
pub use presentation::{CardStage, Motion, Presenter, RenderStatus, StageFrame};
pub use scheduler::{Scheduler, TimerId};
pub use storage::{FileStorage, MemoryStorage, StorageBackend};
pub use store::{STORAGE_KEY, SettingsStore, Subscription, scale_duration};
pub use tone::{DecayingSine, SilentTones, Tone, ToneSink, card_chime};
pub use view::{Control, ControlInput, ControlState, SettingsView};

pub use flashdeck_types::{
    Card, CardColor, DECK, Mode, Setting, SettingKey, SettingValue, Settings, SettingsSnapshot,
    ui::UiOptions,
};
