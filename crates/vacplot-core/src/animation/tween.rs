#![forbid(unsafe_code)]

//! Scalar tween between two values.
//!
//! # Invariants
//!
//! 1. `current()` equals `from` before the first tick and `to` once complete.
//! 2. Elapsed time saturates at the duration.
//!
//! # Failure Modes
//!
//! - Zero duration: the tween is complete immediately.

use std::time::Duration;

use super::{Animation, EasingFn, linear};

/// Interpolates a scalar from `from` to `to` over `duration`.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: EasingFn,
}

impl Tween {
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing: linear,
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Interpolated value at the current elapsed time.
    #[must_use]
    pub fn current(&self) -> f64 {
        let t = f64::from(self.value());
        self.from + (self.to - self.from) * t
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (self.easing)(t as f32)
    }
}
