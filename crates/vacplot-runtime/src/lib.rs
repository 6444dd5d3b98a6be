#![forbid(unsafe_code)]

//! vacplot runtime
//!
//! This crate turns a selection key into an animated scene.
//!
//! # Key Components
//!
//! - [`keyed_diff`] - Three-way set diff (persisting / entering / exiting)
//! - [`Scheduler`] - Virtual-clock timer queue
//! - [`Scene`] - Render tree of keyed [`VisualPoint`]s
//! - [`Reconciler`] - Applies a diff to the scene and schedules the
//!   collapse / commit / grow and exit stages
//! - [`Chart`] - Selection controller owning the dataset, scales, scene and
//!   clock
//!
//! # Execution model
//!
//! Everything runs on the caller's thread. Input arrives through
//! [`Chart::on_selection_changed`]; time arrives through [`Chart::advance`],
//! which fires due stage timers in time order. Stage timers carry the
//! generation of the point they target, so re-targeting a point silently
//! invalidates whatever was in flight for it.

pub mod chart;
pub mod diff;
pub mod reconcile;
pub mod scene;
pub mod scheduler;
pub mod transition;

pub use chart::{Chart, ChartSettings, OpacityRule, SelectionState};
pub use diff::{KeyedDiff, keyed_diff};
pub use reconcile::Reconciler;
pub use scene::{Phase, Scene, VisualAttrs, VisualPoint};
pub use scheduler::{Scheduler, TimerId};
pub use transition::{Stage, StageTimer, TransitionConfig};
