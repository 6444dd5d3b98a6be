#![forbid(unsafe_code)]

//! Linear scales mapping data domains onto pixel ranges.
//!
//! # Invariants
//!
//! 1. Domains are computed once over the full dataset, never per selection.
//! 2. A domain span is never narrower than [`MIN_DOMAIN_SPAN`]; narrower
//!    domains are widened upward from their lower bound.
//!
//! # Failure Modes
//!
//! - Degenerate domain (all values equal): widened, so `map` never divides
//!   by zero.

use crate::error::{ConfigurationError, Result};
use crate::layout::PlotArea;
use crate::record::{Dataset, Record};

/// Smallest allowed domain span, in data units.
pub const MIN_DOMAIN_SPAN: f64 = 1.0;

/// An affine map from `domain` to `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (d0, d1) = domain;
        let d1 = if (d1 - d0).abs() < MIN_DOMAIN_SPAN {
            d0 + MIN_DOMAIN_SPAN
        } else {
            d1
        };
        Self {
            domain: (d0, d1),
            range,
        }
    }

    #[inline]
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    #[inline]
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a data value to a pixel coordinate.
    #[inline]
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Round tick values covering the domain, roughly `count` of them.
    ///
    /// Steps are 1, 2 or 5 times a power of ten.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        let step = tick_step(lo, hi, count);
        if !(step.is_finite() && step > 0.0) {
            return vec![lo];
        }
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Step size for about `count` ticks across `[start, stop]`.
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start) / count as f64;
    let base = 10f64.powf(raw.log10().floor());
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// The chart's two axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    /// Vacancies, `[min, max]` onto `[0, inner_width]`.
    pub x: LinearScale,
    /// Applications, `[0, max]` onto `[inner_height, 0]`.
    pub y: LinearScale,
}

impl Scales {
    /// Build both scales from the full dataset.
    pub fn build(dataset: &Dataset, area: &PlotArea) -> Result<Self> {
        let mut records = dataset.records().iter();
        let Some(first) = records.next() else {
            return Err(ConfigurationError::EmptyDataset.into());
        };
        let (mut vac_min, mut vac_max, mut app_max) =
            (first.vacancies, first.vacancies, first.applications);
        for record in records {
            vac_min = vac_min.min(record.vacancies);
            vac_max = vac_max.max(record.vacancies);
            app_max = app_max.max(record.applications);
        }
        Ok(Self {
            x: LinearScale::new((vac_min, vac_max), (0.0, area.inner_width())),
            y: LinearScale::new((0.0, app_max), (area.inner_height(), 0.0)),
        })
    }

    /// Pixel position of a record inside the plotting area.
    #[inline]
    #[must_use]
    pub fn project(&self, record: &Record) -> (f64, f64) {
        (self.x.map(record.vacancies), self.y.map(record.applications))
    }
}
