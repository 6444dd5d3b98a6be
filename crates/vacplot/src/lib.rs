#![forbid(unsafe_code)]

//! vacplot: vacancies against applications, by municipality.
//!
//! This crate is the outer layer: it loads the CSV dataset, reads the TOML
//! configuration, renders scenes to SVG and exposes all of it as a CLI. The
//! chart engine itself lives in `vacplot-core` (data, grouping, scales) and
//! `vacplot-runtime` (reconciliation, staged transitions, selection); the types
//! most callers need are re-exported here.

pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod svg;

pub use cli::run_from_env;
pub use config::ChartConfig;
pub use error::{AppError, Result};
pub use loader::{MalformedRowPolicy, load_path, load_reader};
pub use svg::SvgExporter;

// --- Engine re-exports -----------------------------------------------------

pub use vacplot_core::{
    ConfigurationError, CoreError, Dataset, LegendEntry, Margin, PlotArea, Record, RecordId, Rgb,
    Scales, ValidationError,
};
pub use vacplot_runtime::{
    Chart, ChartSettings, KeyedDiff, OpacityRule, Phase, Scene, SelectionState, Stage,
    TransitionConfig, VisualPoint,
};
