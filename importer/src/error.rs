//! Error types for the trade import workflow.
//!
//! The hierarchy mirrors the stages of an import:
//!
//! - [`CsvError`] - reading and shaping the CSV file
//! - [`FormatError`] - per-field formatting of a row
//! - [`PreviewError`] - edits against the preview grid
//! - [`SubmitError`] - the bulk request itself
//! - [`ConfigError`] - building a [`crate::config::ClientContext`]
//! - [`WorkflowError`] - top-level workflow operations
//!
//! Lower-level errors convert into [`WorkflowError`] via `From`,
//! so `?` works across stage boundaries.

use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors that block the preview entirely.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// No rows after trimming.
    #[error("CSV file is empty")]
    EmptyFile,

    /// First row does not match the expected header.
    #[error("CSV header mismatch: {0}")]
    HeaderMismatch(String),
}

// =============================================================================
// Format Errors
// =============================================================================

/// Errors from the per-field formatters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Datetime cell is not `DD-MM-YYYY HH:MM`.
    #[error("Invalid datetime '{0}', expected DD-MM-YYYY HH:MM")]
    InvalidTimestamp(String),
}

// =============================================================================
// Preview Errors
// =============================================================================

/// Errors from editing the preview grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    /// Row index past the end of the preview.
    #[error("Row {index} out of range (preview has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// Field key is not one of the trade keys.
    #[error("Unknown trade field: {0}")]
    UnknownField(String),
}

// =============================================================================
// Submit Errors
// =============================================================================

/// Errors from posting a batch to the bulk endpoint.
///
/// A per-row validation rejection is not an error: it is a
/// [`crate::submit::BulkResponse::Rejected`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// No response from the server.
    #[error("Could not reach the server: {0}")]
    Transport(String),

    /// Non-2xx response that is not a per-row error array.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Response body that could not be understood, or that does not line up
    /// with the submitted batch.
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    /// Payload could not be serialized.
    #[error("Failed to serialize trades: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for SubmitError {
    fn from(err: serde_json::Error) -> Self {
        SubmitError::Serialize(err.to_string())
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors building a client context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Required setting not provided.
    #[error("Missing setting: {0}")]
    Missing(&'static str),

    /// Setting present but unusable.
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

// =============================================================================
// Workflow Errors (top-level)
// =============================================================================

/// Errors returned by [`crate::workflow::ImportWorkflow`] operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// CSV could not be previewed.
    #[error(transparent)]
    Csv(#[from] CsvError),

    /// Grid edit rejected.
    #[error(transparent)]
    Preview(#[from] PreviewError),

    /// Bulk request failed.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// A batch is already being submitted.
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Preview is empty.
    #[error("Nothing to submit, preview a file first")]
    NothingToSubmit,

    /// Operation not allowed in the current state.
    #[error("Cannot {action} while {state}")]
    InvalidState { action: &'static str, state: &'static str },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for grid edits.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Result type for bulk submission.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let wf: WorkflowError = CsvError::EmptyFile.into();
        assert!(wf.to_string().contains("empty"));

        let wf: WorkflowError = SubmitError::Transport("connection refused".into()).into();
        assert!(wf.to_string().contains("connection refused"));

        let wf: WorkflowError = PreviewError::UnknownField("ticker".into()).into();
        assert!(wf.to_string().contains("ticker"));
    }

    #[test]
    fn test_header_mismatch_format() {
        let err = CsvError::HeaderMismatch("expected 'Trade ID' in column 1".into());
        assert_eq!(
            err.to_string(),
            "CSV header mismatch: expected 'Trade ID' in column 1"
        );
    }

    #[test]
    fn test_server_error_format() {
        let err = SubmitError::Server {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "Server error (500): boom");
    }

    #[test]
    fn test_invalid_state_format() {
        let err = WorkflowError::InvalidState {
            action: "edit a row",
            state: "submitting",
        };
        assert_eq!(err.to_string(), "Cannot edit a row while submitting");
    }
}
