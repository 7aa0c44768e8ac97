//! Deck navigation and autoplay through the public API.

use std::time::Duration;

use flashdeck_engine::{
    CardDeckController, CardPicker, DeckPhase, Mode, SETTLE_DELAY, Setting, SettingsStore,
};

use crate::common::{Recorder, STEP, memory_app, run};

struct Cycle(usize);

impl CardPicker for Cycle {
    fn pick(&mut self, len: usize) -> usize {
        self.0 = (self.0 + 7) % len;
        self.0
    }
}

fn advance(deck: &mut CardDeckController<Recorder>, total: Duration) {
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        deck.advance(STEP);
        elapsed += STEP;
    }
}

#[test]
fn full_lap_visits_every_card_in_order() {
    let recorder = Recorder::default();
    let mut deck = CardDeckController::new(SettingsStore::in_memory(), recorder.clone());

    for _ in 0..26 {
        deck.next();
    }

    let expected: Vec<usize> = (1..26).chain(std::iter::once(0)).collect();
    assert_eq!(*recorder.shown.borrow(), expected);
}

#[test]
fn previous_from_first_card_wraps_in_both_modes() {
    for mode in Mode::ALL {
        let store = SettingsStore::in_memory();
        store.set(Setting::Mode(mode));
        let mut deck = CardDeckController::new(store, Recorder::default());
        deck.previous();
        assert_eq!(deck.index(), 25, "mode {mode:?}");
    }
}

#[test]
fn random_mode_uses_injected_picker() {
    let store = SettingsStore::in_memory();
    store.set(Setting::Mode(Mode::Random));
    let mut deck = CardDeckController::new(store, Recorder::default()).with_picker(Cycle(0));

    deck.next();
    deck.next();
    assert_eq!(deck.index(), 14);
}

#[test]
fn autoplay_cadence_includes_settle_delay() {
    let store = SettingsStore::in_memory();
    store.set(Setting::CardDuration(4.0));
    let recorder = Recorder::default();
    let mut deck = CardDeckController::new(store, recorder.clone());

    deck.toggle_play_pause();
    assert_eq!(deck.phase(), DeckPhase::Playing);

    advance(&mut deck, Duration::from_secs(4));
    assert_eq!(*recorder.shown.borrow(), vec![1]);

    advance(&mut deck, Duration::from_secs(4));
    assert_eq!(recorder.shown.borrow().len(), 1, "settle delay pushes the next tick");
    advance(&mut deck, SETTLE_DELAY);
    assert_eq!(*recorder.shown.borrow(), vec![1, 2]);

    deck.toggle_play_pause();
    deck.stop_autoplay();
    advance(&mut deck, Duration::from_secs(20));
    assert_eq!(recorder.shown.borrow().len(), 2);
    assert_eq!(deck.phase(), DeckPhase::Idle);
}

#[test]
fn card_duration_is_read_when_autoplay_starts() {
    let store = SettingsStore::in_memory();
    store.set(Setting::CardDuration(2.0));
    let recorder = Recorder::default();
    let mut deck = CardDeckController::new(store.clone(), recorder.clone());

    deck.toggle_play_pause();
    advance(&mut deck, Duration::from_secs(2));
    assert_eq!(recorder.shown.borrow().len(), 1);

    store.set(Setting::CardDuration(8.0));
    advance(&mut deck, SETTLE_DELAY + Duration::from_secs(2));
    assert_eq!(recorder.shown.borrow().len(), 1);
    advance(&mut deck, Duration::from_secs(6));
    assert_eq!(recorder.shown.borrow().len(), 2);
}

#[test]
fn app_autoplay_with_animation() {
    let mut app = memory_app();
    app.toggle_play_pause();

    run(&mut app, Duration::from_secs(4));
    assert_eq!(app.deck().index(), 1);
    assert_eq!(app.deck().phase(), DeckPhase::Transitioning);

    run(&mut app, Duration::from_millis(500));
    assert_eq!(app.deck().phase(), DeckPhase::Playing);
    assert_eq!(app.stage().frame().map(|f| f.index), Some(1));

    run(&mut app, Duration::from_millis(100) + Duration::from_secs(4));
    assert_eq!(app.deck().index(), 2);
}

#[test]
fn hidden_terminal_never_advances() {
    let mut app = memory_app();
    app.toggle_play_pause();
    app.focus_changed(false);
    run(&mut app, Duration::from_secs(60));
    assert_eq!(app.deck().index(), 0);

    app.focus_changed(true);
    run(&mut app, Duration::from_secs(4));
    assert_eq!(app.deck().index(), 1);
}
