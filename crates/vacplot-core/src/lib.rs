#![forbid(unsafe_code)]

//! Core: records, grouping, scales, colors, layout, and animation primitives.
//!
//! # Role in vacplot
//! `vacplot-core` is the data layer. It owns the validated [`Dataset`], the
//! municipality [`Groups`], the axis [`Scales`] and the ordinal ownership
//! colors. It performs no I/O and keeps no global state; everything is built
//! from explicit configuration values.
//!
//! # How it fits in the system
//! The runtime (`vacplot-runtime`) consumes these types to reconcile the
//! rendered point set and drive transitions. The `vacplot` crate loads data
//! from CSV and renders the runtime's scene.

pub mod animation;
pub mod color;
pub mod error;
pub mod group;
pub mod layout;
pub mod record;
pub mod scale;

pub use color::{DEFAULT_PALETTE, LegendEntry, OrdinalColors, Rgb};
pub use error::{ConfigurationError, CoreError, Result, ValidationError};
pub use group::{Group, Groups};
pub use layout::{Margin, PlotArea};
pub use record::{Dataset, Record, RecordId};
pub use scale::{LinearScale, MIN_DOMAIN_SPAN, Scales};
