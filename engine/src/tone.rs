//! Card tones: what to play, and the sample generator that plays it.

use std::f32::consts::TAU;
use std::time::Duration;

use flashdeck_types::Card;

/// Frequency of the `A` card; each later letter adds [`STEP_HZ`].
pub const BASE_HZ: f32 = 400.0;
pub const STEP_HZ: f32 = 20.0;
/// Interval between the two notes of a card chime.
pub const CHIME_INTERVAL_HZ: f32 = 100.0;
pub const CHIME_GAP: Duration = Duration::from_millis(100);
pub const CHIME_NOTE: Duration = Duration::from_millis(300);
pub const DEFAULT_GAIN: f32 = 0.3;
/// Level the envelope decays to by the end of a note.
const FLOOR_GAIN: f32 = 0.01;

/// One sine note with an exponential decay envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    /// Offset from the moment the chime is requested.
    pub start: Duration,
    pub duration: Duration,
    pub gain: f32,
}

impl Tone {
    #[must_use]
    pub fn new(frequency: f32, duration: Duration) -> Self {
        Self {
            frequency,
            start: Duration::ZERO,
            duration,
            gain: DEFAULT_GAIN,
        }
    }

    #[must_use]
    pub fn starting_at(mut self, start: Duration) -> Self {
        self.start = start;
        self
    }

    /// Samples for this note at `sample_rate`.
    #[must_use]
    pub fn samples(&self, sample_rate: u32) -> DecayingSine {
        DecayingSine::new(*self, sample_rate)
    }
}

/// The two-note chime for a card, rising with the letter.
#[must_use]
pub fn card_chime(card: &Card) -> [Tone; 2] {
    let root = BASE_HZ + card.letter_offset() as f32 * STEP_HZ;
    [
        Tone::new(root, CHIME_NOTE),
        Tone::new(root + CHIME_INTERVAL_HZ, CHIME_NOTE).starting_at(CHIME_GAP),
    ]
}

/// Audio output for chimes.
pub trait ToneSink {
    fn play(&mut self, tones: &[Tone]);
    /// Release the output device. Later `play` calls are ignored.
    fn close(&mut self);
}

impl<S: ToneSink + ?Sized> ToneSink for Box<S> {
    fn play(&mut self, tones: &[Tone]) {
        (**self).play(tones);
    }

    fn close(&mut self) {
        (**self).close();
    }
}

/// Sink used when no audio device is available.
#[derive(Debug, Default)]
pub struct SilentTones {
    closed: bool,
}

impl SilentTones {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToneSink for SilentTones {
    fn play(&mut self, tones: &[Tone]) {
        if self.closed {
            return;
        }
        let freqs: Vec<f32> = tones.iter().map(|t| t.frequency).collect();
        tracing::debug!(?freqs, "Audio not available; skipping chime");
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// Mono f32 samples of a sine whose amplitude falls exponentially from
/// `gain` to 0.01 over the note.
#[derive(Debug, Clone)]
pub struct DecayingSine {
    frequency: f32,
    gain: f32,
    sample_rate: u32,
    index: u64,
    total: u64,
}

impl DecayingSine {
    fn new(tone: Tone, sample_rate: u32) -> Self {
        let total = (tone.duration.as_secs_f64() * f64::from(sample_rate)).round() as u64;
        Self {
            frequency: tone.frequency,
            gain: tone.gain,
            sample_rate: sample_rate.max(1),
            index: 0,
            total,
        }
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    fn envelope(&self, index: u64) -> f32 {
        if self.gain <= FLOOR_GAIN || self.total == 0 {
            return self.gain.max(0.0);
        }
        let progress = index as f32 / self.total as f32;
        self.gain * (FLOOR_GAIN / self.gain).powf(progress)
    }
}

impl Iterator for DecayingSine {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.total {
            return None;
        }
        let t = self.index as f32 / self.sample_rate as f32;
        let sample = (TAU * self.frequency * t).sin() * self.envelope(self.index);
        self.index += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.total - self.index).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}
