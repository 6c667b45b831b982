//! Timed transitions
//!
//! A [`Timing`] moves a value from `from` to `to` over a fixed duration
//! along an [`Easing`] curve. Used for the clipping grace period and the page
//! mount fade, where the exact duration matters more than physical feel.

use serde::{Deserialize, Serialize};

/// Easing curve applied to linear progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

/// A fixed-duration transition between two values
#[derive(Clone, Copy, Debug)]
pub struct Timing {
    from: f32,
    to: f32,
    /// Duration in milliseconds
    duration_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
}

impl Timing {
    pub fn new(from: f32, to: f32, duration_ms: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            easing,
        }
    }

    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let progress = self.easing.apply(self.elapsed_ms / self.duration_ms);
        self.from + (self.to - self.from) * progress
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).min(1.0)
        }
    }

    /// Advance by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        self.elapsed_ms = (self.elapsed_ms + dt.max(0.0) * 1000.0).min(self.duration_ms);
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}
