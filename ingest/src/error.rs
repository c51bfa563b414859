//! Error types for the csvnest ingestion pipeline.
//!
//! Errors are split by how far they reach:
//!
//! - [`RowError`] - a single data row is rejected; the batch continues
//! - [`DocumentError`] - the whole document is unusable; no partial result
//! - [`IngestError`] - top-level entry point errors (I/O, decoding, JSON)
//! - [`ConfigError`] - invalid environment configuration
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Row Errors (recoverable)
// =============================================================================

/// Reasons a single row is skipped. Never aborts a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// Token count differs from the header width.
    #[error("Column count mismatch. Expected {expected}, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    /// Required dotted paths are absent or empty in the flat record.
    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingRequiredFields { fields: Vec<String> },

    /// The nested record cannot be mapped to the storage shape.
    #[error("Missing storage fields: {}", .fields.join(", "))]
    MissingStorageFields { fields: Vec<String> },
}

// =============================================================================
// Document Errors (fatal)
// =============================================================================

/// Failures that abort the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// No lines at all.
    #[error("CSV file is empty")]
    EmptyDocument,

    /// Header line yields no field names.
    #[error("CSV file has no headers")]
    NoHeaders,

    /// Every data row was skipped.
    #[error("No valid data rows found ({skipped} rows skipped)")]
    NoValidRows { skipped: usize },

    /// Input exceeds the configured size limit.
    #[error("Input too large: {size} bytes (limit {limit})")]
    InputTooLarge { size: usize, limit: usize },
}

// =============================================================================
// Ingest Errors (top-level)
// =============================================================================

/// Top-level error returned by the [`crate::Ingestor`] entry points.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Document-level failure.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Failed to read input.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes could not be decoded as text.
    #[error("Failed to decode input: {0}")]
    Encoding(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IngestError {
    /// The document-level kind, if this is one.
    pub fn document(&self) -> Option<&DocumentError> {
        match self {
            IngestError::Document(e) => Some(e),
            _ => None,
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable holds a value of the wrong shape.
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for per-row operations.
pub type RowResult<T> = Result<T, RowError>;

/// Result type for document parsing.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type for pipeline entry points.
pub type IngestResult<T> = Result<T, IngestError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let doc_err = DocumentError::EmptyDocument;
        let ingest_err: IngestError = doc_err.into();
        assert!(ingest_err.to_string().contains("empty"));
        assert_eq!(ingest_err.document(), Some(&DocumentError::EmptyDocument));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "users.csv");
        let ingest_err: IngestError = io_err.into();
        assert!(ingest_err.to_string().contains("users.csv"));
        assert!(ingest_err.document().is_none());
    }

    #[test]
    fn test_row_error_format() {
        let err = RowError::MissingRequiredFields {
            fields: vec!["name.lastName".into(), "age".into()],
        };
        assert_eq!(err.to_string(), "Missing required fields: name.lastName, age");

        let err = RowError::ColumnCountMismatch { expected: 3, actual: 2 };
        let msg = err.to_string();
        assert!(msg.contains("Expected 3"));
        assert!(msg.contains("got 2"));
    }

    #[test]
    fn test_no_valid_rows_distinct_from_empty() {
        let empty = DocumentError::EmptyDocument;
        let none = DocumentError::NoValidRows { skipped: 0 };
        assert_ne!(empty, none);
        assert_ne!(empty.to_string(), none.to_string());
    }
}
