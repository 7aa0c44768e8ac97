//! The App: one settings store wired into the deck, the stage, and both
//! settings views, plus the command surface the input layer drives.

mod init;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use flashdeck_types::ui::UiOptions;
use flashdeck_types::{SettingKey, Settings};

use crate::deck::{CardDeckController, CardPicker};
use crate::presentation::{CardStage, Presenter};
use crate::store::{SettingsStore, Subscription};
use crate::tone::ToneSink;
use crate::view::{ControlInput, SettingsView};

/// The presenter the App drives.
pub type Stage = CardStage<Box<dyn ToneSink>>;

pub struct App {
    store: SettingsStore,
    deck: CardDeckController<Stage>,
    drawer: SettingsView,
    compact: SettingsView,
    drawer_open: bool,
    /// Latest snapshot not yet forwarded to the stage.
    pending_settings: Rc<RefCell<Option<Settings>>>,
    _settings_mailbox: Subscription,
    ui_options: UiOptions,
    last_frame: Instant,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.store.snapshot()
    }

    #[must_use]
    pub fn deck(&self) -> &CardDeckController<Stage> {
        &self.deck
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        self.deck.presenter()
    }

    #[must_use]
    pub fn drawer(&self) -> &SettingsView {
        &self.drawer
    }

    #[must_use]
    pub fn compact(&self) -> &SettingsView {
        &self.compact
    }

    #[must_use]
    pub fn settings_open(&self) -> bool {
        self.drawer_open
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Replace the random card source.
    pub fn set_picker(&mut self, picker: impl CardPicker + 'static) {
        self.deck.set_picker(picker);
    }

    pub fn toggle_play_pause(&mut self) -> bool {
        self.deck.toggle_play_pause()
    }

    pub fn next(&mut self) -> bool {
        self.deck.next()
    }

    pub fn previous(&mut self) -> bool {
        self.deck.previous()
    }

    pub fn toggle_settings(&mut self) {
        if self.drawer_open {
            self.close_settings();
        } else {
            self.drawer.reset_focus();
            self.drawer_open = true;
        }
    }

    pub fn close_settings(&mut self) {
        self.drawer_open = false;
    }

    pub fn reset_settings(&mut self) {
        self.store.reset();
        self.flush_settings();
    }

    pub fn drawer_focus_next(&mut self) {
        self.drawer.focus_next();
    }

    pub fn drawer_focus_prev(&mut self) {
        self.drawer.focus_prev();
    }

    /// Apply `input` to the focused drawer control.
    pub fn drawer_adjust(&mut self, input: ControlInput) -> bool {
        let changed = self.drawer.interact_focused(input);
        self.flush_settings();
        changed
    }

    /// Apply `input` to a compact panel control.
    pub fn compact_adjust(&mut self, key: SettingKey, input: ControlInput) -> bool {
        let changed = self.compact.interact(key, input);
        self.flush_settings();
        changed
    }

    /// Terminal focus changed. Losing focus pauses autoplay.
    pub fn focus_changed(&mut self, focused: bool) {
        tracing::debug!(focused, "Terminal focus changed");
        self.deck.set_visible(focused);
    }

    /// Advance by the wall-clock time since the previous frame.
    pub fn tick(&mut self) {
        let elapsed = self.frame_elapsed();
        self.tick_by(elapsed);
    }

    /// Advance by `delta`. The frame loop goes through [`App::tick`].
    pub fn tick_by(&mut self, delta: Duration) {
        self.flush_settings();
        self.deck.advance(delta);
    }

    pub fn frame_elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        elapsed
    }

    /// Forward the latest settings snapshot, if any, to the stage.
    pub fn flush_settings(&mut self) {
        let pending = self.pending_settings.borrow_mut().take();
        if let Some(snapshot) = pending {
            self.deck.presenter_mut().settings_changed(&snapshot);
        }
    }

    /// Stop timers and release audio.
    pub fn shutdown(&mut self) {
        self.deck.shutdown();
    }
}
