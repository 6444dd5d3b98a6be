#![forbid(unsafe_code)]

//! CSV dataset loader.
//!
//! Reads a table with the headers
//! `Code, Name, Municipality, Ownership, Applications, Vacancies` (extra
//! columns are ignored, surrounding whitespace is trimmed) and coerces the
//! last two columns to numbers.
//!
//! # Failure Modes
//!
//! - Structural CSV problems (missing header, wrong field count) always
//!   fail with [`AppError::Csv`].
//! - A row whose measures are unparsable, negative or non-finite is handled
//!   by the [`MalformedRowPolicy`]: `Reject` fails with the row's
//!   [`ValidationError`], `Drop` skips it with a warning.
//! - A file with no usable rows fails with `EmptyDataset`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vacplot_core::{CoreError, Dataset, Record, ValidationError};

use crate::error::{AppError, Result};

/// What to do with a row that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Abort loading at the first bad row.
    #[default]
    Reject,
    /// Skip bad rows and log them.
    Drop,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Municipality")]
    municipality: String,
    #[serde(rename = "Ownership")]
    ownership: String,
    #[serde(rename = "Applications")]
    applications: String,
    #[serde(rename = "Vacancies")]
    vacancies: String,
}

impl CsvRow {
    fn into_record(self, row: usize) -> std::result::Result<Record, ValidationError> {
        let applications = parse_measure(&self.applications, row, &self.code, "Applications")?;
        let vacancies = parse_measure(&self.vacancies, row, &self.code, "Vacancies")?;
        let record = Record {
            code: self.code,
            name: self.name,
            municipality: self.municipality,
            ownership: self.ownership,
            applications,
            vacancies,
        };
        record.validate(row)?;
        Ok(record)
    }
}

fn parse_measure(
    raw: &str,
    row: usize,
    code: &str,
    field: &'static str,
) -> std::result::Result<f64, ValidationError> {
    raw.parse::<f64>().map_err(|_| ValidationError {
        row,
        code: code.to_string(),
        field,
        reason: format!("is not a number: `{raw}`"),
    })
}

/// Load a dataset from a CSV file.
pub fn load_path(path: &Path, policy: MalformedRowPolicy) -> Result<Dataset> {
    if !path.exists() {
        return Err(AppError::MissingPath {
            path: path.to_path_buf(),
        });
    }
    let dataset = load_reader(File::open(path)?, policy)?;
    info!(
        target: "vacplot.loader",
        path = %path.display(),
        records = dataset.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Load a dataset from any CSV byte stream.
pub fn load_reader<R: Read>(reader: R, policy: MalformedRowPolicy) -> Result<Dataset> {
    let mut csv = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (index, row) in csv.deserialize::<CsvRow>().enumerate() {
        match row?.into_record(index + 1) {
            Ok(record) => records.push(record),
            Err(error) if policy == MalformedRowPolicy::Drop => {
                warn!(
                    target: "vacplot.loader",
                    row = error.row,
                    code = %error.code,
                    field = error.field,
                    reason = %error.reason,
                    "dropping malformed row"
                );
                dropped += 1;
            }
            Err(error) => return Err(CoreError::from(error).into()),
        }
    }

    if dropped > 0 {
        warn!(target: "vacplot.loader", dropped, kept = records.len(), "malformed rows dropped");
    }
    Ok(Dataset::new(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vacplot_core::ConfigurationError;

    const HEADER: &str = "Code,Name,Municipality,Ownership,Applications,Vacancies\n";

    fn load(body: &str, policy: MalformedRowPolicy) -> Result<Dataset> {
        load_reader(format!("{HEADER}{body}").as_bytes(), policy)
    }

    #[test]
    fn parses_and_trims_fields() {
        let dataset = load(
            "08001, Escola Bressol ,Abrera , Public ,25,20\n08002,Llar,Abrera,Private,3.5,10\n",
            MalformedRowPolicy::Reject,
        )
        .unwrap();
        assert_eq!(dataset.len(), 2);
        let first = &dataset.records()[0];
        assert_eq!(first.name, "Escola Bressol");
        assert_eq!(first.municipality, "Abrera");
        assert_eq!(first.ownership, "Public");
        assert_eq!(first.applications, 25.0);
        assert_eq!(first.vacancies, 20.0);
        assert_eq!(dataset.records()[1].applications, 3.5);
    }

    #[test]
    fn columns_are_matched_by_header() {
        let csv = "Vacancies,Ownership,Extra,Municipality,Name,Code,Applications\n7,Public,x,Abrera,N,C1,9\n";
        let dataset = load_reader(csv.as_bytes(), MalformedRowPolicy::Reject).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.code, "C1");
        assert_eq!(record.vacancies, 7.0);
        assert_eq!(record.applications, 9.0);
    }

    #[test]
    fn reject_policy_fails_on_first_bad_row() {
        let error = load("a,N,M,Public,n/a,3\nb,N,M,Public,-1,3\n", MalformedRowPolicy::Reject)
            .unwrap_err();
        match error {
            AppError::Core(CoreError::Validation(v)) => {
                assert_eq!(v.row, 1);
                assert_eq!(v.code, "a");
                assert_eq!(v.field, "Applications");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_measure_is_rejected() {
        let error = load("a,N,M,Public,4,-3\n", MalformedRowPolicy::Reject).unwrap_err();
        assert!(matches!(
            error,
            AppError::Core(CoreError::Validation(ValidationError { field: "Vacancies", .. }))
        ));
    }

    #[test]
    fn drop_policy_skips_bad_rows() {
        let dataset = load(
            "a,N,M,Public,,3\nb,N,M,Public,4,3\nc,N,M,Public,NaN,1\n",
            MalformedRowPolicy::Drop,
        )
        .unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].code, "b");
    }

    #[test]
    fn all_rows_dropped_is_an_empty_dataset() {
        let error = load("a,N,M,Public,x,3\n", MalformedRowPolicy::Drop).unwrap_err();
        assert!(matches!(
            error,
            AppError::Core(CoreError::Configuration(ConfigurationError::EmptyDataset))
        ));
    }

    #[test]
    fn missing_column_is_a_csv_error() {
        let csv = "Code,Name,Municipality,Ownership,Applications\na,N,M,Public,4\n";
        let error = load_reader(csv.as_bytes(), MalformedRowPolicy::Reject).unwrap_err();
        assert!(matches!(error, AppError::Csv(_)));
    }

    #[test]
    fn missing_file_is_reported() {
        let error = load_path(Path::new("/definitely/not/here.csv"), MalformedRowPolicy::Reject)
            .unwrap_err();
        assert!(matches!(error, AppError::MissingPath { .. }));
    }
}
