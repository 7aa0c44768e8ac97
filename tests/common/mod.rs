//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use flashdeck_engine::{
    App, Card, FileStorage, Presenter, RenderStatus, SettingsStore, SilentTones, UiOptions,
};

/// Frame step used when driving fake time.
pub const STEP: Duration = Duration::from_millis(100);

/// An App over an in-memory store with no audio.
pub fn memory_app() -> App {
    App::with_store(
        SettingsStore::in_memory(),
        UiOptions::default(),
        Box::new(SilentTones::new()),
    )
}

/// An App whose settings live in `path`.
pub fn file_app(path: &std::path::Path) -> App {
    App::with_store(
        SettingsStore::new(FileStorage::new(path)),
        UiOptions::default(),
        Box::new(SilentTones::new()),
    )
}

/// Advance `app` by `total` in [`STEP`] increments.
pub fn run(app: &mut App, total: Duration) {
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        app.tick_by(STEP);
        elapsed += STEP;
    }
}

/// Presenter that completes every render at once and logs card positions.
#[derive(Clone, Default)]
pub struct Recorder {
    pub shown: Rc<RefCell<Vec<usize>>>,
}

impl Presenter for Recorder {
    fn card_changed(&mut self, _card: &Card, index: usize) -> RenderStatus {
        self.shown.borrow_mut().push(index);
        RenderStatus::Done
    }

    fn advance(&mut self, _delta: Duration) -> RenderStatus {
        RenderStatus::Done
    }

    fn release(&mut self) {}
}
