//! Card chimes through the system audio device using rodio.

use std::time::Duration;

use anyhow::{Context, Result};
use rodio::{OutputStream, OutputStreamHandle, Source};

use flashdeck_engine::{DecayingSine, Tone, ToneSink};

const SAMPLE_RATE: u32 = 44_100;

/// Mono source over one decaying sine note.
struct ToneSource {
    samples: DecayingSine,
    duration: Duration,
}

impl ToneSource {
    fn new(tone: &Tone) -> Self {
        Self {
            samples: tone.samples(SAMPLE_RATE),
            duration: tone.duration,
        }
    }
}

impl Source for ToneSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.size_hint().0)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.samples.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.duration)
    }
}

impl Iterator for ToneSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        self.samples.next()
    }
}

/// Plays chimes on the default output device.
pub struct RodioTones {
    // Dropping the stream stops all playback.
    stream: Option<(OutputStream, OutputStreamHandle)>,
}

impl RodioTones {
    pub fn try_new() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("Failed to open audio output")?;
        Ok(Self {
            stream: Some((stream, handle)),
        })
    }
}

impl ToneSink for RodioTones {
    fn play(&mut self, tones: &[Tone]) {
        let Some((_, handle)) = &self.stream else {
            return;
        };
        for tone in tones {
            let source = ToneSource::new(tone).delay(tone.start);
            if let Err(e) = handle.play_raw(source) {
                tracing::warn!("Failed to play chime: {e}");
                return;
            }
        }
    }

    fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("Audio output closed");
        }
    }
}
