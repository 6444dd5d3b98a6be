#![forbid(unsafe_code)]

//! Stage definitions for point transitions.
//!
//! Entering and persisting points run a three-stage chain:
//!
//! ```text
//!   Collapse ──► Commit ──► Grow
//!   r → 0        x, y, fill, opacity snap      r → nominal
//!   (400 ms)     (1 ms, radius held at 0)      (600 ms)
//! ```
//!
//! Exiting points run a single `Exit` stage (r → 0 over 1000 ms) and are
//! removed from the scene when it completes. Positions are never
//! interpolated; only the radius is tweened.

use std::fmt;
use std::time::Duration;

use vacplot_core::animation::{EasingFn, ease_in_out_cubic};

/// One timed segment of a point's transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Radius shrinks to zero at the old position.
    Collapse,
    /// Position and style snap to their targets; radius stays zero.
    Commit,
    /// Radius grows back to the nominal size.
    Grow,
    /// Radius shrinks to zero, then the point is removed.
    Exit,
}

impl Stage {
    /// Stage that follows this one in the enter/update chain.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Collapse => Some(Self::Commit),
            Self::Commit => Some(Self::Grow),
            Self::Grow | Self::Exit => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collapse => "collapse",
            Self::Commit => "commit",
            Self::Grow => "grow",
            Self::Exit => "exit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timer payload: "stage `stage` of point `key` has finished".
///
/// `generation` is the point's generation when the stage started. A timer
/// whose generation no longer matches the point is stale and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimer<K> {
    pub key: K,
    pub generation: u64,
    pub stage: Stage,
}

/// Timing and sizing of point transitions.
#[derive(Debug, Clone, Copy)]
pub struct TransitionConfig {
    pub collapse: Duration,
    pub commit: Duration,
    pub grow: Duration,
    pub exit: Duration,
    /// Nominal marker radius in pixels.
    pub radius: f64,
    pub easing: EasingFn,
}

impl TransitionConfig {
    /// Duration of `stage`.
    #[must_use]
    pub fn duration(&self, stage: Stage) -> Duration {
        match stage {
            Stage::Collapse => self.collapse,
            Stage::Commit => self.commit,
            Stage::Grow => self.grow,
            Stage::Exit => self.exit,
        }
    }

    /// Time from the start of a collapse to the end of the grow.
    #[must_use]
    pub fn chain_duration(&self) -> Duration {
        self.collapse + self.commit + self.grow
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            collapse: Duration::from_millis(400),
            commit: Duration::from_millis(1),
            grow: Duration::from_millis(600),
            exit: Duration::from_millis(1000),
            radius: 3.5,
            easing: ease_in_out_cubic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_order() {
        assert_eq!(Stage::Collapse.next(), Some(Stage::Commit));
        assert_eq!(Stage::Commit.next(), Some(Stage::Grow));
        assert_eq!(Stage::Grow.next(), None);
        assert_eq!(Stage::Exit.next(), None);
    }

    #[test]
    fn default_timings() {
        let config = TransitionConfig::default();
        assert_eq!(config.chain_duration(), Duration::from_millis(1001));
        assert_eq!(config.duration(Stage::Exit), Duration::from_millis(1000));
        assert_eq!(config.radius, 3.5);
    }
}
