//! Card deck state machine: current card, transition lock, and autoplay.
//!
//! ```text
//!            toggle                      next/previous
//!   Idle  <---------->  Playing    Idle|Playing ----------> Transitioning
//!                                        ^                        |
//!                                        +---- render done -------+
//! ```
//!
//! Every index change cancels the autoplay timer first, so a stale tick can
//! never land in the middle of a transition. After a change made while
//! playing, autoplay restarts only after [`SETTLE_DELAY`].

use std::time::Duration;

use flashdeck_types::{Card, DECK, Mode};
use thiserror::Error;

use crate::presentation::{Presenter, RenderStatus};
use crate::scheduler::{Scheduler, TimerId};
use crate::store::SettingsStore;

/// Pause between a card change and the autoplay timer restarting.
pub const SETTLE_DELAY: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeckTask {
    AutoplayTick,
    ResumeAutoplay,
}

/// Observable state of the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckPhase {
    Idle,
    Playing,
    /// A card swap is being rendered; navigation is ignored.
    Transitioning,
}

/// Source of random card positions.
pub trait CardPicker {
    /// Return a position in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform draw from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl CardPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        let draw = (rand::random::<f64>() * len as f64) as usize;
        draw.min(len - 1)
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("a deck needs at least one card")]
pub struct EmptyDeckError;

pub struct CardDeckController<P: Presenter> {
    cards: &'static [Card],
    store: SettingsStore,
    presenter: P,
    picker: Box<dyn CardPicker>,
    scheduler: Scheduler<DeckTask>,
    index: usize,
    playing: bool,
    transitioning: bool,
    visible: bool,
    autoplay: Option<TimerId>,
    resume: Option<TimerId>,
}

impl<P: Presenter> CardDeckController<P> {
    /// Controller over the alphabet deck.
    pub fn new(store: SettingsStore, presenter: P) -> Self {
        Self {
            cards: &DECK,
            store,
            presenter,
            picker: Box::new(RandomPicker),
            scheduler: Scheduler::new(),
            index: 0,
            playing: false,
            transitioning: false,
            visible: true,
            autoplay: None,
            resume: None,
        }
    }

    pub fn with_cards(
        cards: &'static [Card],
        store: SettingsStore,
        presenter: P,
    ) -> Result<Self, EmptyDeckError> {
        if cards.is_empty() {
            return Err(EmptyDeckError);
        }
        Ok(Self {
            cards,
            ..Self::new(store, presenter)
        })
    }

    #[must_use]
    pub fn with_picker(mut self, picker: impl CardPicker + 'static) -> Self {
        self.set_picker(picker);
        self
    }

    pub fn set_picker(&mut self, picker: impl CardPicker + 'static) {
        self.picker = Box::new(picker);
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn card(&self) -> &Card {
        &self.cards[self.index]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Whether the repeating autoplay timer is armed right now.
    #[must_use]
    pub fn autoplay_armed(&self) -> bool {
        self.autoplay.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> DeckPhase {
        if self.transitioning {
            DeckPhase::Transitioning
        } else if self.playing {
            DeckPhase::Playing
        } else {
            DeckPhase::Idle
        }
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Display the current card without moving. Used for the first frame.
    pub fn show_current(&mut self) {
        if self.transitioning {
            return;
        }
        self.emit();
    }

    /// Advance to the next card: a uniform random draw in random mode, the
    /// following card otherwise. Returns `false` if a transition is in flight.
    pub fn next(&mut self) -> bool {
        if self.transitioning {
            tracing::trace!("next ignored during transition");
            return false;
        }
        self.halt_timers();
        let len = self.cards.len();
        self.index = match self.store.snapshot().mode {
            Mode::Random => self.picker.pick(len).min(len - 1),
            Mode::Sequential => (self.index + 1) % len,
        };
        self.emit();
        self.schedule_resume();
        true
    }

    /// Step back one card. Never random, whatever the mode.
    pub fn previous(&mut self) -> bool {
        if self.transitioning {
            tracing::trace!("previous ignored during transition");
            return false;
        }
        self.halt_timers();
        let len = self.cards.len();
        self.index = (self.index + len - 1) % len;
        self.emit();
        self.schedule_resume();
        true
    }

    /// Flip between playing and idle. Returns the new playing state.
    pub fn toggle_play_pause(&mut self) -> bool {
        self.playing = !self.playing;
        if self.playing {
            self.start_autoplay();
        } else {
            self.halt_timers();
        }
        tracing::debug!(playing = self.playing, "Autoplay toggled");
        self.playing
    }

    /// Cancel the autoplay timer. Safe to call when none is armed.
    pub fn stop_autoplay(&mut self) {
        if let Some(id) = self.autoplay.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Visibility (terminal focus) changed. Hiding pauses the timer but keeps
    /// the playing flag; showing again restarts the timer if playing.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if visible {
            self.start_autoplay();
        } else {
            self.halt_timers();
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Advance presenter animations and timers by `delta`.
    pub fn advance(&mut self, delta: Duration) {
        if self.presenter.advance(delta) == RenderStatus::Done {
            self.transitioning = false;
        }
        for (id, task) in self.scheduler.advance(delta) {
            match task {
                DeckTask::AutoplayTick if self.autoplay == Some(id) => {
                    self.next();
                }
                DeckTask::ResumeAutoplay if self.resume == Some(id) => {
                    self.resume = None;
                    self.start_autoplay();
                }
                // Timer replaced by an earlier task in this same advance.
                _ => {}
            }
        }
    }

    /// Cancel timers and release presenter resources.
    pub fn shutdown(&mut self) {
        self.halt_timers();
        self.presenter.release();
    }

    fn emit(&mut self) {
        let card = self.cards[self.index];
        self.transitioning = true;
        if self.presenter.card_changed(&card, self.index) == RenderStatus::Done {
            self.transitioning = false;
        }
    }

    fn start_autoplay(&mut self) {
        if !self.playing || !self.visible || self.autoplay.is_some() {
            return;
        }
        let period = self.store.snapshot().card_period();
        self.autoplay = Some(
            self.scheduler
                .schedule_repeating(period, DeckTask::AutoplayTick),
        );
    }

    fn schedule_resume(&mut self) {
        if self.playing && self.visible {
            self.resume = Some(
                self.scheduler
                    .schedule_once(SETTLE_DELAY, DeckTask::ResumeAutoplay),
            );
        }
    }

    fn halt_timers(&mut self) {
        self.stop_autoplay();
        if let Some(id) = self.resume.take() {
            self.scheduler.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use flashdeck_types::Setting;

    use super::*;

    /// Presenter double: records every card change and optionally holds each
    /// swap in flight until `settle_after` has elapsed.
    #[derive(Default)]
    struct Probe {
        shown: Vec<usize>,
        settle_after: Option<Duration>,
        pending: Option<Duration>,
        released: bool,
    }

    impl Presenter for Probe {
        fn card_changed(&mut self, _card: &Card, index: usize) -> RenderStatus {
            self.shown.push(index);
            match self.settle_after {
                Some(delay) => {
                    self.pending = Some(delay);
                    RenderStatus::InFlight
                }
                None => RenderStatus::Done,
            }
        }

        fn advance(&mut self, delta: Duration) -> RenderStatus {
            match self.pending {
                Some(left) if left > delta => {
                    self.pending = Some(left - delta);
                    RenderStatus::InFlight
                }
                _ => {
                    self.pending = None;
                    RenderStatus::Done
                }
            }
        }

        fn release(&mut self) {
            self.released = true;
        }
    }

    struct Fixed(Vec<usize>);

    impl CardPicker for Fixed {
        fn pick(&mut self, _len: usize) -> usize {
            self.0.remove(0)
        }
    }

    fn deck() -> CardDeckController<Probe> {
        CardDeckController::new(SettingsStore::in_memory(), Probe::default())
    }

    fn step(deck: &mut CardDeckController<Probe>, total: Duration, tick: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            deck.advance(tick);
            elapsed += tick;
        }
    }

    #[test]
    fn starts_idle_at_first_card() {
        let deck = deck();
        assert_eq!(deck.index(), 0);
        assert_eq!(deck.phase(), DeckPhase::Idle);
        assert_eq!(deck.card().letter(), 'A');
        assert_eq!(deck.len(), 26);
    }

    #[test]
    fn sequential_next_visits_every_card_and_wraps() {
        let mut deck = deck();
        for _ in 0..26 {
            assert!(deck.next());
        }
        assert_eq!(deck.index(), 0);
        let expected: Vec<usize> = (1..26).chain([0]).collect();
        assert_eq!(deck.presenter().shown, expected);
    }

    #[test]
    fn previous_wraps_even_in_random_mode() {
        let store = SettingsStore::in_memory();
        store.set(Setting::Mode(Mode::Random));
        let mut deck = CardDeckController::new(store, Probe::default())
            .with_picker(Fixed(vec![]));

        deck.previous();

        assert_eq!(deck.index(), 25);
        deck.previous();
        assert_eq!(deck.index(), 24);
    }

    #[test]
    fn random_mode_draws_from_picker() {
        let store = SettingsStore::in_memory();
        store.set(Setting::Mode(Mode::Random));
        let mut deck = CardDeckController::new(store, Probe::default())
            .with_picker(Fixed(vec![17, 3, 99]));

        deck.next();
        assert_eq!(deck.index(), 17);
        deck.next();
        assert_eq!(deck.index(), 3);
        deck.next();
        assert_eq!(deck.index(), 25, "out-of-range draws are clamped");
    }

    #[test]
    fn random_picker_stays_in_range() {
        let mut picker = RandomPicker;
        for _ in 0..1000 {
            assert!(picker.pick(26) < 26);
        }
        assert_eq!(picker.pick(1), 0);
    }

    #[test]
    fn mode_is_read_on_each_transition() {
        let store = SettingsStore::in_memory();
        let mut deck = CardDeckController::new(store.clone(), Probe::default())
            .with_picker(Fixed(vec![9]));
        deck.next();
        assert_eq!(deck.index(), 1);
        store.set(Setting::Mode(Mode::Random));
        deck.next();
        assert_eq!(deck.index(), 9);
    }

    #[test]
    fn navigation_is_ignored_while_transitioning() {
        let probe = Probe {
            settle_after: Some(Duration::from_millis(500)),
            ..Probe::default()
        };
        let mut deck = CardDeckController::new(SettingsStore::in_memory(), probe);

        assert!(deck.next());
        assert_eq!(deck.phase(), DeckPhase::Transitioning);
        assert!(!deck.next());
        assert!(!deck.previous());
        assert_eq!(deck.index(), 1);
        assert_eq!(deck.presenter().shown, vec![1]);

        deck.advance(Duration::from_millis(500));
        assert_eq!(deck.phase(), DeckPhase::Idle);
        assert!(deck.next());
        assert_eq!(deck.index(), 2);
    }

    #[test]
    fn stopping_autoplay_twice_is_harmless() {
        let mut deck = deck();
        deck.toggle_play_pause();
        assert!(deck.autoplay_armed());
        deck.stop_autoplay();
        deck.stop_autoplay();
        assert!(!deck.autoplay_armed());
        assert!(deck.is_playing());
    }

    #[test]
    fn autoplay_advances_on_the_card_duration() {
        let store = SettingsStore::in_memory();
        store.set(Setting::CardDuration(4.0));
        let mut deck = CardDeckController::new(store, Probe::default());
        let tick = Duration::from_millis(100);

        assert!(deck.toggle_play_pause());
        step(&mut deck, Duration::from_millis(3900), tick);
        assert!(deck.presenter().shown.is_empty());
        step(&mut deck, tick, tick);
        assert_eq!(deck.presenter().shown, vec![1]);

        // Each tick restarts the timer after the settle delay.
        step(&mut deck, SETTLE_DELAY + Duration::from_secs(4), tick);
        assert_eq!(deck.presenter().shown, vec![1, 2]);
        step(&mut deck, SETTLE_DELAY + Duration::from_secs(4), tick);
        assert_eq!(deck.presenter().shown, vec![1, 2, 3]);

        assert!(!deck.toggle_play_pause());
        step(&mut deck, Duration::from_secs(30), tick);
        assert_eq!(deck.presenter().shown, vec![1, 2, 3]);
        assert!(!deck.autoplay_armed());
    }

    #[test]
    fn manual_advance_while_playing_restarts_after_settle() {
        let mut deck = deck();
        deck.toggle_play_pause();
        step(&mut deck, Duration::from_secs(3), Duration::from_millis(100));

        deck.next();
        assert!(!deck.autoplay_armed());
        step(&mut deck, Duration::from_millis(500), Duration::from_millis(100));
        assert!(!deck.autoplay_armed());
        step(&mut deck, Duration::from_millis(100), Duration::from_millis(100));
        assert!(deck.autoplay_armed());

        // The full period starts over from the restart.
        step(&mut deck, Duration::from_millis(3900), Duration::from_millis(100));
        assert_eq!(deck.presenter().shown, vec![1]);
        step(&mut deck, Duration::from_millis(100), Duration::from_millis(100));
        assert_eq!(deck.presenter().shown, vec![1, 2]);
    }

    #[test]
    fn manual_advance_while_idle_does_not_start_autoplay() {
        let mut deck = deck();
        deck.next();
        step(&mut deck, Duration::from_secs(10), Duration::from_millis(100));
        assert!(!deck.autoplay_armed());
        assert_eq!(deck.presenter().shown, vec![1]);
    }

    #[test]
    fn hiding_pauses_timer_and_showing_resumes_it() {
        let mut deck = deck();
        deck.toggle_play_pause();

        deck.set_visible(false);
        assert!(deck.is_playing());
        assert!(!deck.autoplay_armed());
        step(&mut deck, Duration::from_secs(20), Duration::from_millis(100));
        assert!(deck.presenter().shown.is_empty());

        deck.set_visible(true);
        assert!(deck.autoplay_armed());
        step(&mut deck, Duration::from_secs(4), Duration::from_millis(100));
        assert_eq!(deck.presenter().shown, vec![1]);
    }

    #[test]
    fn settle_restart_waits_for_visibility() {
        let mut deck = deck();
        deck.toggle_play_pause();
        deck.next();
        deck.set_visible(false);
        step(&mut deck, Duration::from_secs(2), Duration::from_millis(100));
        assert!(!deck.autoplay_armed());

        deck.set_visible(true);
        assert!(deck.autoplay_armed());
    }

    #[test]
    fn showing_when_idle_does_not_arm_timer() {
        let mut deck = deck();
        deck.set_visible(false);
        deck.set_visible(true);
        assert!(!deck.autoplay_armed());
    }

    #[test]
    fn show_current_emits_the_first_card() {
        let mut deck = deck();
        deck.show_current();
        assert_eq!(deck.presenter().shown, vec![0]);
        assert_eq!(deck.index(), 0);
    }

    #[test]
    fn shutdown_cancels_and_releases() {
        let mut deck = deck();
        deck.toggle_play_pause();
        deck.shutdown();
        assert!(!deck.autoplay_armed());
        assert!(deck.presenter().released);
    }

    #[test]
    fn empty_deck_is_rejected() {
        const NONE: [Card; 0] = [];
        let result = CardDeckController::with_cards(&NONE, SettingsStore::in_memory(), Probe::default());
        assert!(matches!(result, Err(EmptyDeckError)));
    }

    #[test]
    fn short_deck_wraps_at_its_own_length() {
        let mut deck =
            CardDeckController::with_cards(&DECK[..3], SettingsStore::in_memory(), Probe::default())
                .expect("non-empty");
        deck.next();
        deck.next();
        deck.next();
        assert_eq!(deck.index(), 0);
        deck.previous();
        assert_eq!(deck.index(), 2);
    }
}
