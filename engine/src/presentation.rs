//! Presentation side of the deck: the `Presenter` seam and the `CardStage`
//! the TUI draws from.
//!
//! A card change is not instantaneous. The outgoing card first plays its exit
//! animation, then the new card enters and chimes. The deck controller keeps
//! its transition lock until the presenter reports the swap as done.

use std::time::Duration;

use flashdeck_types::{Card, Settings};

use crate::animation::{AnimationTimings, EffectTimer};
use crate::store::SettingsStore;
use crate::tone::{ToneSink, card_chime};

/// Whether the presenter has finished swapping cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Done,
    InFlight,
}

/// Consumer of deck events.
pub trait Presenter {
    /// A new card was chosen. Return `InFlight` if the swap completes later,
    /// in which case a later `advance` must eventually return `Done`.
    fn card_changed(&mut self, card: &Card, index: usize) -> RenderStatus;

    fn settings_changed(&mut self, _snapshot: &Settings) {}

    fn advance(&mut self, delta: Duration) -> RenderStatus;

    /// Release held resources (audio output).
    fn release(&mut self);
}

/// What a card is doing on screen right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Sliding in; progress in `0.0..=1.0`.
    Entering(f32),
    Resting,
    /// Sliding out; progress in `0.0..=1.0`.
    Exiting(f32),
}

/// The card to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageFrame {
    pub card: Card,
    pub index: usize,
    pub motion: Motion,
}

#[derive(Debug, Clone)]
struct Shown {
    card: Card,
    index: usize,
    enter: EffectTimer,
}

#[derive(Debug, Clone)]
struct Exit {
    outgoing: Shown,
    timer: EffectTimer,
    incoming: (Card, usize),
}

/// Animation state for the card area plus the chime output.
pub struct CardStage<S: ToneSink> {
    store: SettingsStore,
    tones: S,
    timings: AnimationTimings,
    shown: Option<Shown>,
    exit: Option<Exit>,
    clock: Duration,
}

impl<S: ToneSink> CardStage<S> {
    pub fn new(store: SettingsStore, tones: S) -> Self {
        let timings =
            AnimationTimings::from_settings(&store.snapshot(), store.prefers_reduced_motion());
        Self {
            store,
            tones,
            timings,
            shown: None,
            exit: None,
            clock: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn timings(&self) -> AnimationTimings {
        self.timings
    }

    #[must_use]
    pub fn tones(&self) -> &S {
        &self.tones
    }

    #[must_use]
    pub fn frame(&self) -> Option<StageFrame> {
        if let Some(exit) = &self.exit {
            return Some(StageFrame {
                card: exit.outgoing.card,
                index: exit.outgoing.index,
                motion: Motion::Exiting(exit.timer.progress()),
            });
        }
        self.shown.as_ref().map(|shown| StageFrame {
            card: shown.card,
            index: shown.index,
            motion: if shown.enter.is_finished() {
                Motion::Resting
            } else {
                Motion::Entering(shown.enter.progress())
            },
        })
    }

    /// Position within the emoji bob cycle, `0.0..1.0`. Always 0 when still.
    #[must_use]
    pub fn float_phase(&self) -> f32 {
        self.cycle_phase(self.timings.float)
    }

    /// Position within the autoplay indicator beat, `0.0..1.0`.
    #[must_use]
    pub fn pulse_phase(&self) -> f32 {
        self.cycle_phase(self.timings.pulse)
    }

    fn cycle_phase(&self, period: Duration) -> f32 {
        if period.is_zero() {
            return 0.0;
        }
        let period = period.as_nanos();
        (self.clock.as_nanos() % period) as f32 / period as f32
    }

    fn enter(&mut self, card: Card, index: usize) {
        self.shown = Some(Shown {
            card,
            index,
            enter: EffectTimer::new(self.timings.slide_in),
        });
        if self.store.snapshot().sound_enabled {
            self.tones.play(&card_chime(&card));
        }
    }
}

impl<S: ToneSink> Presenter for CardStage<S> {
    fn card_changed(&mut self, card: &Card, index: usize) -> RenderStatus {
        // A change that lands mid-exit replaces the pending card.
        if let Some(exit) = &mut self.exit {
            exit.incoming = (*card, index);
            return RenderStatus::InFlight;
        }
        let Some(outgoing) = self.shown.take() else {
            self.enter(*card, index);
            return RenderStatus::Done;
        };
        if self.timings.slide_out.is_zero() {
            self.enter(*card, index);
            return RenderStatus::Done;
        }
        self.exit = Some(Exit {
            outgoing,
            timer: EffectTimer::new(self.timings.slide_out),
            incoming: (*card, index),
        });
        RenderStatus::InFlight
    }

    fn settings_changed(&mut self, snapshot: &Settings) {
        self.timings =
            AnimationTimings::from_settings(snapshot, self.store.prefers_reduced_motion());
    }

    fn advance(&mut self, delta: Duration) -> RenderStatus {
        self.clock = self.clock.saturating_add(delta);
        if let Some(shown) = &mut self.shown {
            shown.enter.advance(delta);
        }
        let Some(exit) = &mut self.exit else {
            return RenderStatus::Done;
        };
        exit.timer.advance(delta);
        if !exit.timer.is_finished() {
            return RenderStatus::InFlight;
        }
        let (card, index) = exit.incoming;
        self.exit = None;
        self.enter(card, index);
        RenderStatus::Done
    }

    fn release(&mut self) {
        self.tones.close();
    }
}
