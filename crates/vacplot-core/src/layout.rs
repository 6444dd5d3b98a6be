#![forbid(unsafe_code)]

//! Drawing surface and margins, supplied once by the layout host.

use crate::error::{ConfigurationError, Result};

/// Insets between the drawing surface edge and the plotting area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl Default for Margin {
    /// Room for the y axis label on the left.
    fn default() -> Self {
        Self::new(40.0, 40.0, 40.0, 80.0)
    }
}

/// Outer surface size plus margins.
///
/// The plotting area is the surface minus the margins; both scales map onto
/// it and its origin is translated by `(margin.left, margin.top)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    width: f64,
    height: f64,
    margin: Margin,
}

impl PlotArea {
    /// Fails when the margins leave no drawable extent.
    pub fn new(width: f64, height: f64, margin: Margin) -> Result<Self> {
        let area = Self {
            width,
            height,
            margin,
        };
        let (inner_w, inner_h) = (area.inner_width(), area.inner_height());
        if !(inner_w > 0.0 && inner_h > 0.0) {
            return Err(ConfigurationError::DegeneratePlotArea {
                width: inner_w,
                height: inner_h,
            }
            .into());
        }
        Ok(area)
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn margin(&self) -> Margin {
        self.margin
    }

    #[inline]
    #[must_use]
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    #[inline]
    #[must_use]
    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }
}

impl Default for PlotArea {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 370.0,
            margin: Margin::default(),
        }
    }
}
