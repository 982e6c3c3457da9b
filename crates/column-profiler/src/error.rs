//! Custom error types for the column profiler.
//!
//! Analyzers themselves never fail on data: empty inputs, unparseable cells
//! and undetermined languages are all recovered locally. The errors below
//! cover the surfaces around them (configuration, table loading, column
//! conversion and report assembly).
//!
//! Errors are serializable so a failed column can be recorded in the
//! dataset report next to the columns that succeeded.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for the profiler.
#[derive(Error, Debug)]
pub enum ProfilerError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Column has a data type that cannot be turned into cells.
    #[error("Column '{column}' has unsupported dtype {dtype}")]
    UnsupportedDtype { column: String, dtype: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Two report fragments wrote the same feature key.
    #[error("Feature '{0}' was produced twice")]
    DuplicateFeature(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProfilerError>,
    },
}

impl ProfilerError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProfilerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, used when failures are written into a report.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::UnsupportedDtype { .. } => "UNSUPPORTED_DTYPE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::DuplicateFeature(_) => "DUPLICATE_FEATURE",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

impl From<ConfigValidationError> for ProfilerError {
    fn from(err: ConfigValidationError) -> Self {
        ProfilerError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ProfilerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProfilerError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for profiler operations.
pub type Result<T> = std::result::Result<T, ProfilerError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProfilerError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            ProfilerError::ColumnNotFound("test".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            ProfilerError::DuplicateFeature("length".to_string()).error_code(),
            "DUPLICATE_FEATURE"
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = ProfilerError::UnsupportedDtype {
            column: "payload".to_string(),
            dtype: "Binary".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UNSUPPORTED_DTYPE"));
        assert!(json.contains("payload"));
    }

    #[test]
    fn test_with_context() {
        let error = ProfilerError::ColumnNotFound("age".to_string())
            .with_context("While profiling dataset");
        assert!(error.to_string().contains("While profiling dataset"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_config_error_conversion() {
        let error: ProfilerError = ConfigValidationError::InvalidTopK(0).into();
        assert_eq!(error.error_code(), "INVALID_CONFIG");
        assert!(error.to_string().contains("top_k"));
    }
}
