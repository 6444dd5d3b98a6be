use std::path::PathBuf;

use thiserror::Error;
use vacplot_core::CoreError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("invalid configuration: {}", .problems.join("; "))]
    InvalidConfig { problems: Vec<String> },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("logging setup failed: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

impl AppError {
    /// Process exit status: 2 for bad invocations, 3 for bad input data,
    /// 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } | Self::InvalidConfig { .. } | Self::MissingPath { .. } => 2,
            Self::Csv(_) | Self::Core(_) | Self::Toml(_) => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use vacplot_core::{ConfigurationError, CoreError};

    #[test]
    fn usage_errors_exit_with_two() {
        assert_eq!(AppError::invalid("bad").exit_code(), 2);
        let error = AppError::InvalidConfig {
            problems: vec!["a".into(), "b".into()],
        };
        assert_eq!(error.exit_code(), 2);
        assert_eq!(error.to_string(), "invalid configuration: a; b");
    }

    #[test]
    fn core_errors_are_data_errors() {
        let error = AppError::from(CoreError::from(ConfigurationError::EmptyDataset));
        assert_eq!(error.exit_code(), 3);
        assert_eq!(error.to_string(), "configuration error: dataset contains no records");
    }
}
