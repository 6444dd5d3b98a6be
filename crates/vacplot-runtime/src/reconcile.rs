#![forbid(unsafe_code)]

//! Keyed reconciliation of the scene against a new member list.
//!
//! # Algorithm
//!
//! 1. Diff the scene's non-exiting keys against `members` ([`keyed_diff`]).
//! 2. Every member (entering or persisting) is re-targeted: its generation is
//!    bumped, its target attributes are stored as pending, and a
//!    collapse → commit → grow chain starts from its current radius.
//! 3. Every exiting key is re-targeted into the exit stage.
//!
//! Points that were already exiting and are not members keep their running
//! exit. A point that was exiting and is a member again counts as entering
//! and restarts its chain in place.
//!
//! # Invariants
//!
//! 1. After `reconcile`, the scene's non-exiting keys equal `members`.
//! 2. A timer only acts on a point whose generation and stage still match.
//! 3. A point is removed from the scene only by its own exit timer.

use std::fmt::Debug;
use std::hash::Hash;

use ahash::AHashSet;
use tracing::{debug, debug_span, trace};
use vacplot_core::animation::Tween;
use web_time::Instant;

use crate::diff::{KeyedDiff, keyed_diff};
use crate::scene::{Phase, Scene, VisualAttrs, VisualPoint};
use crate::scheduler::Scheduler;
use crate::transition::{Stage, StageTimer, TransitionConfig};

/// Applies keyed diffs to a [`Scene`] and drives the stage timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    config: TransitionConfig,
}

impl Reconciler {
    #[must_use]
    pub fn new(config: TransitionConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Re-bind the scene to `members`.
    ///
    /// `attrs(key, rank)` computes the target attributes of the member at
    /// position `rank` of `members`. It is called once per distinct member.
    pub fn reconcile<K, F>(
        &self,
        scene: &mut Scene<K>,
        scheduler: &mut Scheduler<StageTimer<K>>,
        members: &[K],
        mut attrs: F,
    ) -> KeyedDiff<K>
    where
        K: Copy + Eq + Hash + Debug,
        F: FnMut(K, usize) -> VisualAttrs,
    {
        let start = Instant::now();
        let span = debug_span!(
            target: "vacplot.reconcile",
            "reconcile",
            members = members.len(),
            entering = tracing::field::Empty,
            persisting = tracing::field::Empty,
            exiting = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        let _guard = span.enter();

        let diff = keyed_diff(&scene.live_keys(), members);
        let entering: AHashSet<K> = diff.entering.iter().copied().collect();

        let mut seen: AHashSet<K> = AHashSet::with_capacity(members.len());
        for (rank, &key) in members.iter().enumerate() {
            if !seen.insert(key) {
                continue;
            }
            let phase = if entering.contains(&key) {
                Phase::Entering
            } else {
                Phase::Updating
            };
            let target = attrs(key, rank);
            let point = scene.get_or_insert(key);
            let generation = point.retarget(phase, Some(target));
            self.begin(point, scheduler, Stage::Collapse, generation);
        }

        for &key in &diff.exiting {
            if let Some(point) = scene.get_mut(key) {
                let generation = point.retarget(Phase::Exiting, None);
                self.begin(point, scheduler, Stage::Exit, generation);
            }
        }

        let duration_us = start.elapsed().as_micros() as u64;
        span.record("entering", diff.entering.len());
        span.record("persisting", diff.persisting.len());
        span.record("exiting", diff.exiting.len());
        span.record("duration_us", duration_us);
        debug!(
            target: "vacplot.reconcile",
            entering = diff.entering.len(),
            persisting = diff.persisting.len(),
            exiting = diff.exiting.len(),
            duration_us,
            "reconciled scene"
        );
        diff
    }

    /// Handle a fired stage timer. Returns `false` if the timer was stale.
    pub fn on_timer<K>(
        &self,
        scene: &mut Scene<K>,
        scheduler: &mut Scheduler<StageTimer<K>>,
        timer: StageTimer<K>,
    ) -> bool
    where
        K: Copy + Eq + Hash + Debug,
    {
        let Some(point) = scene.get_mut(timer.key) else {
            trace!(target: "vacplot.reconcile", key = ?timer.key, stage = %timer.stage, "timer for removed point");
            return false;
        };
        if point.generation() != timer.generation || point.stage() != Some(timer.stage) {
            trace!(
                target: "vacplot.reconcile",
                key = ?timer.key,
                stage = %timer.stage,
                timer_generation = timer.generation,
                point_generation = point.generation(),
                "stale stage timer"
            );
            return false;
        }

        if timer.stage == Stage::Exit {
            scene.remove(timer.key);
            trace!(target: "vacplot.reconcile", key = ?timer.key, "point removed");
            return true;
        }

        match timer.stage.next() {
            Some(next) => {
                point.end_stage(0.0);
                if timer.stage == Stage::Commit {
                    point.commit();
                }
                self.begin(point, scheduler, next, timer.generation);
            }
            None => {
                point.end_stage(self.config.radius);
                point.settle();
            }
        }
        true
    }

    fn begin<K: Copy>(
        &self,
        point: &mut VisualPoint<K>,
        scheduler: &mut Scheduler<StageTimer<K>>,
        stage: Stage,
        generation: u64,
    ) {
        let duration = self.config.duration(stage);
        let tween = match stage {
            Stage::Collapse | Stage::Exit => Some((point.radius(), 0.0)),
            Stage::Commit => None,
            Stage::Grow => Some((0.0, self.config.radius)),
        }
        .map(|(from, to)| Tween::new(from, to, duration).easing(self.config.easing));
        point.begin_stage(stage, tween);
        scheduler.schedule_in(
            duration,
            StageTimer {
                key: point.key(),
                generation,
                stage,
            },
        );
    }
}
