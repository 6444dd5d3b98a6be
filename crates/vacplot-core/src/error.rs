use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// A record failed load-time validation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("row {row} ({code}): `{field}` {reason}")]
pub struct ValidationError {
    /// 1-based data row (header excluded).
    pub row: usize,
    /// `Code` column of the offending record.
    pub code: String,
    /// Column name.
    pub field: &'static str,
    pub reason: String,
}

/// The chart cannot be built from the supplied inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("dataset contains no records")]
    EmptyDataset,

    #[error("plot area has no drawable extent ({width}x{height} inside the margins)")]
    DegeneratePlotArea { width: f64, height: f64 },

    #[error("color palette is empty")]
    EmptyPalette,

    #[error("invalid color `{value}`: expected #rrggbb")]
    InvalidColor { value: String },

    #[error("opacity {value} is outside [0, 1]")]
    InvalidOpacity { value: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}
