use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use flashdeck_types::ui::UiOptions;

use super::App;
use crate::config::{FlashdeckConfig, LaunchOptions};
use crate::deck::CardDeckController;
use crate::presentation::CardStage;
use crate::storage::{FileStorage, MemoryStorage};
use crate::store::SettingsStore;
use crate::tone::ToneSink;
use crate::view::SettingsView;

impl App {
    /// Load `~/.flashdeck/config.toml` and the environment, then build.
    ///
    /// A bad config file is logged and ignored.
    pub fn new(tones: Box<dyn ToneSink>) -> Self {
        let config = match FlashdeckConfig::load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Ignoring config: {err}");
                None
            }
        };
        Self::from_options(&LaunchOptions::from_env(config.as_ref()), tones)
    }

    /// Build with explicit options. Settings live in the configured file, the
    /// default data directory, or (when neither resolves) in memory only.
    pub fn from_options(options: &LaunchOptions, tones: Box<dyn ToneSink>) -> Self {
        let path = options
            .storage_path
            .clone()
            .or_else(FileStorage::default_path);
        let store = match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Using settings storage");
                SettingsStore::new(FileStorage::new(path))
            }
            None => {
                tracing::warn!("No data directory; settings will not persist");
                SettingsStore::new(MemoryStorage::new())
            }
        };
        Self::with_store(store, options.ui, tones)
    }

    /// Wire `store` into every consumer and show the first card.
    pub fn with_store(store: SettingsStore, ui_options: UiOptions, tones: Box<dyn ToneSink>) -> Self {
        // Must precede the stage so its first timings see the signal.
        store.apply_system_reduced_motion(ui_options.reduced_motion);

        let pending_settings = Rc::new(RefCell::new(None));
        let mailbox = Rc::clone(&pending_settings);
        let settings_mailbox = store.subscribe(move |snapshot| {
            *mailbox.borrow_mut() = Some(*snapshot);
            Ok(())
        });

        let stage = CardStage::new(store.clone(), tones);
        let mut deck = CardDeckController::new(store.clone(), stage);
        deck.show_current();
        if store.snapshot().autoplay_enabled {
            deck.toggle_play_pause();
        }

        Self {
            drawer: SettingsView::drawer(store.clone()),
            compact: SettingsView::compact(store.clone()),
            store,
            deck,
            drawer_open: false,
            pending_settings,
            _settings_mailbox: settings_mailbox,
            ui_options,
            last_frame: Instant::now(),
            should_quit: false,
        }
    }
}
