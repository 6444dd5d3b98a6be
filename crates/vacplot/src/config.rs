#![forbid(unsafe_code)]

//! Chart configuration as data.
//!
//! Every tunable of the chart lives in one [`ChartConfig`] that can be
//! loaded from TOML. Every section carries `#[serde(default)]`, so a partial
//! file only overrides what it names.
//!
//! ```toml
//! default_selection = "Abrera"
//!
//! [layout]
//! width = 960
//! height = 370
//! margin = { top = 40, right = 40, bottom = 40, left = 80 }
//!
//! [transition]
//! collapse_ms = 400
//! easing = "linear"
//! ```
//!
//! # Defaults
//!
//! `ChartConfig::default()` reproduces the published chart: margins
//! 40/40/40/80, a 370 px tall surface, palette `#f7d345`/`#29B3C7`,
//! radius 3.5, full opacity for the first 20 members, stage durations
//! 400/1/600 ms and a 1000 ms exit.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vacplot_core::animation::{
    EasingFn, ease_in_cubic, ease_in_out_cubic, ease_out_cubic, linear,
};
use vacplot_core::{CoreError, Margin, PlotArea, Rgb};
use vacplot_runtime::{ChartSettings, OpacityRule, TransitionConfig};

use crate::error::{AppError, Result};
use crate::loader::MalformedRowPolicy;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Group rendered when the chart is created.
    pub default_selection: String,
    pub layout: LayoutConfig,
    pub style: StyleConfig,
    pub transition: TransitionTimings,
    pub loader: LoaderConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            default_selection: "Abrera".to_string(),
            layout: LayoutConfig::default(),
            style: StyleConfig::default(),
            transition: TransitionTimings::default(),
            loader: LoaderConfig::default(),
        }
    }
}

/// Drawing surface size and insets, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    pub margin: MarginConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 370.0,
            margin: MarginConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarginConfig {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for MarginConfig {
    fn default() -> Self {
        let margin = Margin::default();
        Self {
            top: margin.top,
            right: margin.right,
            bottom: margin.bottom,
            left: margin.left,
        }
    }
}

/// Marker appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// Ordinal palette for ownership values, `#rrggbb`.
    pub palette: Vec<String>,
    /// Nominal marker radius once grown.
    pub radius: f64,
    /// Members ranked below this get `full_opacity`.
    pub full_opacity_rank: usize,
    pub full_opacity: f64,
    pub reduced_opacity: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let opacity = OpacityRule::default();
        Self {
            palette: vec!["#f7d345".to_string(), "#29B3C7".to_string()],
            radius: TransitionConfig::default().radius,
            full_opacity_rank: opacity.full_rank,
            full_opacity: opacity.full,
            reduced_opacity: opacity.reduced,
        }
    }
}

/// Radius easing for every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingName {
    #[default]
    CubicInOut,
    CubicIn,
    CubicOut,
    Linear,
}

impl EasingName {
    #[must_use]
    pub fn function(self) -> EasingFn {
        match self {
            Self::CubicInOut => ease_in_out_cubic,
            Self::CubicIn => ease_in_cubic,
            Self::CubicOut => ease_out_cubic,
            Self::Linear => linear,
        }
    }
}

/// Stage durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionTimings {
    pub collapse_ms: u64,
    pub commit_ms: u64,
    pub grow_ms: u64,
    pub exit_ms: u64,
    pub easing: EasingName,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            collapse_ms: 400,
            commit_ms: 1,
            grow_ms: 600,
            exit_ms: 1000,
            easing: EasingName::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    pub malformed_rows: MalformedRowPolicy,
}

impl ChartConfig {
    /// Parse a TOML document. Does not validate.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file. Does not validate.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AppError::MissingPath {
                path: path.to_path_buf(),
            });
        }
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// The defaults, or the file at `path`, validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                debug!(target: "vacplot.config", path = %path.display(), "loading configuration");
                Self::from_toml_file(path)?
            }
            None => Self::default(),
        };
        let problems = config.validate();
        if problems.is_empty() {
            Ok(config)
        } else {
            Err(AppError::InvalidConfig { problems })
        }
    }

    /// Check every parameter. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let layout = &self.layout;
        let margin = &layout.margin;

        for (name, value) in [
            ("layout.width", layout.width),
            ("layout.height", layout.height),
            ("layout.margin.top", margin.top),
            ("layout.margin.right", margin.right),
            ("layout.margin.bottom", margin.bottom),
            ("layout.margin.left", margin.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        let inner_width = layout.width - margin.left - margin.right;
        let inner_height = layout.height - margin.top - margin.bottom;
        if inner_width <= 0.0 || inner_height <= 0.0 {
            errors.push(format!(
                "layout leaves no drawable area inside the margins ({inner_width}x{inner_height})"
            ));
        }

        if self.style.palette.is_empty() {
            errors.push("style.palette must not be empty".into());
        }
        for color in &self.style.palette {
            if color.parse::<Rgb>().is_err() {
                errors.push(format!("style.palette entry `{color}` is not #rrggbb"));
            }
        }
        if !(self.style.radius.is_finite() && self.style.radius > 0.0) {
            errors.push(format!("style.radius must be > 0, got {}", self.style.radius));
        }
        for (name, value) in [
            ("style.full_opacity", self.style.full_opacity),
            ("style.reduced_opacity", self.style.reduced_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{name} must be in [0, 1], got {value}"));
            }
        }

        errors
    }

    /// Runtime settings for [`vacplot_runtime::Chart::new`].
    pub fn to_settings(&self) -> Result<ChartSettings> {
        let margin = &self.layout.margin;
        let area = PlotArea::new(
            self.layout.width,
            self.layout.height,
            Margin::new(margin.top, margin.right, margin.bottom, margin.left),
        )?;
        let palette = self
            .style
            .palette
            .iter()
            .map(|color| color.parse::<Rgb>().map_err(CoreError::from))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let timings = &self.transition;

        Ok(ChartSettings {
            area,
            palette,
            transition: TransitionConfig {
                collapse: Duration::from_millis(timings.collapse_ms),
                commit: Duration::from_millis(timings.commit_ms),
                grow: Duration::from_millis(timings.grow_ms),
                exit: Duration::from_millis(timings.exit_ms),
                radius: self.style.radius,
                easing: timings.easing.function(),
            },
            opacity: OpacityRule {
                full_rank: self.style.full_opacity_rank,
                full: self.style.full_opacity,
                reduced: self.style.reduced_opacity,
            },
            default_selection: self.default_selection.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_match_runtime_defaults() {
        let config = ChartConfig::default();
        assert!(config.validate().is_empty());

        let settings = config.to_settings().unwrap();
        let runtime = ChartSettings::default();
        assert_eq!(settings.area, runtime.area);
        assert_eq!(settings.palette, runtime.palette);
        assert_eq!(settings.opacity, runtime.opacity);
        assert_eq!(settings.default_selection, "Abrera");
        assert_eq!(settings.transition.chain_duration(), runtime.transition.chain_duration());
        assert_eq!(settings.transition.exit, Duration::from_millis(1000));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = ChartConfig::from_toml_str(
            r#"
default_selection = "Badalona"

[transition]
grow_ms = 250
easing = "linear"
"#,
        )
        .unwrap();
        assert_eq!(config.default_selection, "Badalona");
        assert_eq!(config.transition.grow_ms, 250);
        assert_eq!(config.transition.collapse_ms, 400);
        assert_eq!(config.transition.easing, EasingName::Linear);
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.style, StyleConfig::default());
    }

    #[test]
    fn inline_margin_table_parses() {
        let config = ChartConfig::from_toml_str(
            "[layout]\nwidth = 500\nmargin = { top = 10, right = 10, bottom = 10, left = 10 }\n",
        )
        .unwrap();
        assert_eq!(config.layout.width, 500.0);
        assert_eq!(config.layout.margin.left, 10.0);
        let settings = config.to_settings().unwrap();
        assert_eq!(settings.area.inner_width(), 480.0);
    }

    #[test]
    fn loader_policy_parses_lowercase() {
        let config = ChartConfig::from_toml_str("[loader]\nmalformed_rows = \"drop\"\n").unwrap();
        assert_eq!(config.loader.malformed_rows, MalformedRowPolicy::Drop);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = ChartConfig::from_toml_str("[style]\nradiuss = 4\n").unwrap_err();
        assert!(matches!(error, AppError::Toml(_)));
    }

    #[test]
    fn validate_catches_bad_values() {
        let mut config = ChartConfig::default();
        config.layout.width = 100.0;
        config.style.palette = vec!["#12345".into()];
        config.style.radius = 0.0;
        config.style.reduced_opacity = 1.2;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("drawable area")));
        assert!(errors.iter().any(|e| e.contains("#12345")));
        assert!(errors.iter().any(|e| e.contains("style.radius")));
        assert!(errors.iter().any(|e| e.contains("style.reduced_opacity")));
    }

    #[test]
    fn validate_catches_empty_palette() {
        let mut config = ChartConfig::default();
        config.style.palette.clear();
        assert!(config.validate().iter().any(|e| e.contains("palette")));
    }

    #[test]
    fn easing_names_map_to_functions() {
        assert_eq!(EasingName::Linear.function()(0.25), 0.25);
        assert_eq!(EasingName::CubicInOut.function()(0.5), 0.5);
        assert_eq!(EasingName::CubicIn.function()(0.5), 0.125);
        assert_eq!(EasingName::CubicOut.function()(0.5), 0.875);

        let config = ChartConfig::from_toml_str("[transition]\neasing = \"cubic-out\"\n").unwrap();
        assert_eq!(config.transition.easing, EasingName::CubicOut);
    }

    #[test]
    fn instantaneous_transitions_are_allowed() {
        let config = ChartConfig::from_toml_str(
            "default_selection = \"A\"\n[transition]\ncollapse_ms = 0\ncommit_ms = 0\ngrow_ms = 0\nexit_ms = 0\n",
        )
        .unwrap();
        assert!(config.validate().is_empty());

        let record = |municipality: &str| vacplot_core::Record {
            code: format!("{municipality}-1"),
            name: "Escola".to_string(),
            municipality: municipality.to_string(),
            ownership: "Public".to_string(),
            applications: 10.0,
            vacancies: 5.0,
        };
        let dataset = vacplot_core::Dataset::new(vec![record("A"), record("B")]).unwrap();
        let mut chart = vacplot_runtime::Chart::new(dataset, config.to_settings().unwrap()).unwrap();
        chart.advance(Duration::ZERO);
        assert!(chart.is_idle());
        let point = chart.scene().iter().next().unwrap();
        assert_eq!(point.radius(), 3.5);

        chart.on_selection_changed("B");
        chart.advance(Duration::ZERO);
        assert!(chart.is_idle());
        assert_eq!(chart.scene().len(), 1);
        assert_eq!(chart.now(), Duration::ZERO);
    }
}
