#![forbid(unsafe_code)]

//! Typed records and the validated dataset.
//!
//! A [`Dataset`] is the immutable, non-empty sequence of [`Record`]s the chart
//! is built from. Each record's identity is its [`RecordId`], the position it
//! was loaded at; reconciliation keys on that identity, never on a record's
//! position within a filtered group.

use std::fmt;
use std::ops::Index;

use crate::error::{ConfigurationError, Result, ValidationError};

/// Stable identity of a record within its [`Dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RecordId(usize);

impl RecordId {
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the record in the dataset.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One row of the source table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Record {
    pub code: String,
    pub name: String,
    pub municipality: String,
    pub ownership: String,
    pub applications: f64,
    pub vacancies: f64,
}

impl Record {
    /// Check that both measures are finite and non-negative.
    ///
    /// `row` is only used to label the error.
    pub fn validate(&self, row: usize) -> std::result::Result<(), ValidationError> {
        self.check_measure(row, "Applications", self.applications)?;
        self.check_measure(row, "Vacancies", self.vacancies)
    }

    fn check_measure(
        &self,
        row: usize,
        field: &'static str,
        value: f64,
    ) -> std::result::Result<(), ValidationError> {
        let reason = if !value.is_finite() {
            format!("must be finite, got {value}")
        } else if value < 0.0 {
            format!("must not be negative, got {value}")
        } else {
            return Ok(());
        };
        Err(ValidationError {
            row,
            code: self.code.clone(),
            field,
            reason,
        })
    }
}

/// Validated, non-empty record collection.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, validating every record.
    ///
    /// Fails with [`ConfigurationError::EmptyDataset`] when `records` is empty
    /// and with the first [`ValidationError`] otherwise.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err(ConfigurationError::EmptyDataset.into());
        }
        for (i, record) in records.iter().enumerate() {
            record.validate(i + 1)?;
        }
        Ok(Self { records })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.index())
    }

    /// Records with their identities, in load order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Record)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (RecordId::new(i), record))
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl Index<RecordId> for Dataset {
    type Output = Record;

    /// Ids are only minted by the dataset itself, so indexing with one of its
    /// own ids never goes out of bounds.
    fn index(&self, id: RecordId) -> &Record {
        &self.records[id.index()]
    }
}

#[cfg(test)]
pub(crate) fn record(municipality: &str, vacancies: f64, applications: f64, ownership: &str) -> Record {
    Record {
        code: format!("{municipality}-{vacancies}-{applications}"),
        name: format!("School in {municipality}"),
        municipality: municipality.to_string(),
        ownership: ownership.to_string(),
        applications,
        vacancies,
    }
}
