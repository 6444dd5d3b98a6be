#![forbid(unsafe_code)]

//! Colors and the ordinal ownership → color assignment.
//!
//! [`OrdinalColors`] fixes its domain once, in first-occurrence order of the
//! values it is built from, and cycles through the palette when there are
//! more values than colors.

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;

use crate::error::{ConfigurationError, Result};
use crate::record::Dataset;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ConfigurationError;

    /// Parses `#rrggbb` (the leading `#` is optional).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || ConfigurationError::InvalidColor {
            value: s.to_string(),
        };
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Yellow for the first ownership value, teal for the second.
pub const DEFAULT_PALETTE: [Rgb; 2] = [Rgb::new(0xf7, 0xd3, 0x45), Rgb::new(0x29, 0xb3, 0xc7)];

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
}

/// Ordinal color scale with a domain fixed at construction.
#[derive(Debug, Clone)]
pub struct OrdinalColors {
    domain: Vec<String>,
    index: AHashMap<String, usize>,
    palette: Vec<Rgb>,
}

impl OrdinalColors {
    /// Assign colors to `values` in first-occurrence order.
    pub fn from_values<'a, I>(palette: Vec<Rgb>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if palette.is_empty() {
            return Err(ConfigurationError::EmptyPalette.into());
        }
        let mut domain = Vec::new();
        let mut index = AHashMap::new();
        for value in values {
            if !index.contains_key(value) {
                index.insert(value.to_string(), domain.len());
                domain.push(value.to_string());
            }
        }
        Ok(Self {
            domain,
            index,
            palette,
        })
    }

    /// Colors for every distinct `ownership` value in the dataset.
    pub fn for_ownership(dataset: &Dataset, palette: Vec<Rgb>) -> Result<Self> {
        Self::from_values(palette, dataset.records().iter().map(|r| r.ownership.as_str()))
    }

    /// Color assigned to `value`.
    ///
    /// Values outside the domain get the first palette color.
    #[must_use]
    pub fn color(&self, value: &str) -> Rgb {
        let slot = self.index.get(value).copied().unwrap_or(0);
        self.palette[slot % self.palette.len()]
    }

    #[must_use]
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Domain values paired with their colors, in domain order.
    #[must_use]
    pub fn legend(&self) -> Vec<LegendEntry> {
        self.domain
            .iter()
            .map(|label| LegendEntry {
                label: label.clone(),
                color: self.color(label),
            })
            .collect()
    }
}
