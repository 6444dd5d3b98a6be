#![forbid(unsafe_code)]

//! Render tree: keyed visual points in paint order.
//!
//! The scene is backend-agnostic. It records, per point, the attributes a
//! renderer needs (`position`, `radius`, `fill`, `opacity`) plus the
//! bookkeeping the reconciler needs (`phase`, active `stage`, `generation`,
//! pending target attributes).
//!
//! Points are painted in insertion order: persisting points keep their slot,
//! entering points are appended.

use std::hash::Hash;
use std::time::Duration;

use ahash::AHashMap;
use vacplot_core::Rgb;
use vacplot_core::animation::{Animation, Tween};

use crate::transition::Stage;

/// Target attributes committed to a point at the end of its commit stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualAttrs {
    pub cx: f64,
    pub cy: f64,
    pub fill: Rgb,
    pub opacity: f64,
}

/// Lifecycle phase of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Newly bound; running its first collapse/commit/grow chain.
    Entering,
    /// Still selected; refreshing attributes through the stage chain.
    Updating,
    /// No transition in flight.
    Settled,
    /// Shrinking out; removed when the exit stage completes.
    Exiting,
}

/// A marker bound to one key.
#[derive(Debug, Clone)]
pub struct VisualPoint<K> {
    key: K,
    position: Option<(f64, f64)>,
    fill: Option<Rgb>,
    opacity: f64,
    radius: f64,
    phase: Phase,
    stage: Option<Stage>,
    tween: Option<Tween>,
    pending: Option<VisualAttrs>,
    generation: u64,
}

impl<K: Copy> VisualPoint<K> {
    pub(crate) fn new(key: K) -> Self {
        Self {
            key,
            position: None,
            fill: None,
            opacity: 1.0,
            radius: 0.0,
            phase: Phase::Entering,
            stage: None,
            tween: None,
            pending: None,
            generation: 0,
        }
    }

    #[inline]
    pub fn key(&self) -> K {
        self.key
    }

    /// `(cx, cy)` in plotting-area pixels; `None` until the first commit.
    #[inline]
    pub fn position(&self) -> Option<(f64, f64)> {
        self.position
    }

    #[inline]
    pub fn fill(&self) -> Option<Rgb> {
        self.fill
    }

    #[inline]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Stage currently running, if any.
    #[inline]
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a renderer would draw anything for this point.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.position.is_some() && self.radius > 0.0
    }

    /// Point a new transition at this point, invalidating in-flight timers.
    pub(crate) fn retarget(&mut self, phase: Phase, pending: Option<VisualAttrs>) -> u64 {
        self.generation += 1;
        self.phase = phase;
        self.pending = pending;
        self.generation
    }

    pub(crate) fn begin_stage(&mut self, stage: Stage, tween: Option<Tween>) {
        self.stage = Some(stage);
        self.tween = tween;
    }

    pub(crate) fn end_stage(&mut self, radius: f64) {
        self.radius = radius;
        self.stage = None;
        self.tween = None;
    }

    /// Apply the pending attributes. Returns `false` if nothing was pending.
    pub(crate) fn commit(&mut self) -> bool {
        let Some(attrs) = self.pending.take() else {
            return false;
        };
        self.position = Some((attrs.cx, attrs.cy));
        self.fill = Some(attrs.fill);
        self.opacity = attrs.opacity;
        true
    }

    pub(crate) fn settle(&mut self) {
        self.phase = Phase::Settled;
    }

    fn tick(&mut self, dt: Duration) {
        if let Some(tween) = self.tween.as_mut() {
            tween.tick(dt);
            self.radius = tween.current();
        }
    }
}

/// Ordered collection of [`VisualPoint`]s keyed by `K`.
#[derive(Debug, Clone)]
pub struct Scene<K> {
    order: Vec<K>,
    points: AHashMap<K, VisualPoint<K>>,
}

impl<K> Default for Scene<K> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            points: AHashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> Scene<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: K) -> Option<&VisualPoint<K>> {
        self.points.get(&key)
    }

    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.points.contains_key(&key)
    }

    /// Points in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &VisualPoint<K>> + '_ {
        self.order.iter().filter_map(|key| self.points.get(key))
    }

    /// Keys of points that are not exiting, in paint order.
    #[must_use]
    pub fn live_keys(&self) -> Vec<K> {
        self.iter()
            .filter(|p| p.phase != Phase::Exiting)
            .map(VisualPoint::key)
            .collect()
    }

    /// Number of points in `phase`.
    #[must_use]
    pub fn count(&self, phase: Phase) -> usize {
        self.points.values().filter(|p| p.phase == phase).count()
    }

    pub(crate) fn get_mut(&mut self, key: K) -> Option<&mut VisualPoint<K>> {
        self.points.get_mut(&key)
    }

    /// Existing point for `key`, or a fresh one appended to the paint order.
    pub(crate) fn get_or_insert(&mut self, key: K) -> &mut VisualPoint<K> {
        if !self.points.contains_key(&key) {
            self.order.push(key);
        }
        self.points
            .entry(key)
            .or_insert_with(|| VisualPoint::new(key))
    }

    pub(crate) fn remove(&mut self, key: K) -> Option<VisualPoint<K>> {
        let point = self.points.remove(&key)?;
        self.order.retain(|k| *k != key);
        Some(point)
    }

    /// Advance every running radius tween by `dt`.
    pub(crate) fn tick(&mut self, dt: Duration) {
        if dt.is_zero() {
            return;
        }
        for point in self.points.values_mut() {
            point.tick(dt);
        }
    }
}
