use std::time::Duration;

use flashdeck_types::Settings;

use crate::store::scale_duration;

pub(crate) fn normalized_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed.as_secs_f32();
    let total = duration.as_secs_f32();
    (elapsed / total).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct EffectTimer {
    elapsed: Duration,
    duration: Duration,
}

impl EffectTimer {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        normalized_progress(self.elapsed, self.duration)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Nominal animation lengths at speed 1x.
const SLIDE_IN: Duration = Duration::from_millis(700);
const SLIDE_OUT: Duration = Duration::from_millis(500);
const FLOAT: Duration = Duration::from_secs(3);
const PULSE: Duration = Duration::from_secs(1);

/// Animation lengths after applying the speed multiplier.
///
/// All zero when motion is off (animation disabled, reduce motion, or the
/// system preference).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTimings {
    /// Entry of a new card.
    pub slide_in: Duration,
    /// Exit of the outgoing card.
    pub slide_out: Duration,
    /// One bob cycle of the emoji.
    pub float: Duration,
    /// One beat of the autoplay indicator.
    pub pulse: Duration,
}

impl AnimationTimings {
    #[must_use]
    pub fn from_settings(settings: &Settings, system_reduced_motion: bool) -> Self {
        if system_reduced_motion || settings.reduce_motion || !settings.animation_enabled {
            return Self::still();
        }
        let speed = settings.animation_speed;
        Self {
            slide_in: scale_duration(SLIDE_IN, speed),
            slide_out: scale_duration(SLIDE_OUT, speed),
            float: scale_duration(FLOAT, speed),
            pulse: scale_duration(PULSE, speed),
        }
    }

    #[must_use]
    pub const fn still() -> Self {
        Self {
            slide_in: Duration::ZERO,
            slide_out: Duration::ZERO,
            float: Duration::ZERO,
            pulse: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn is_still(&self) -> bool {
        *self == Self::still()
    }
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), false)
    }
}
