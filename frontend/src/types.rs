//! Common types used across the frontend application.

use std::fmt;

use tradeload::WorkflowError;

// =============================================================================
// Notices
// =============================================================================

/// Severity of a banner shown above the page content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    /// Bootstrap alert class.
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "alert alert-success",
            NoticeLevel::Warning => "alert alert-warning",
            NoticeLevel::Error => "alert alert-danger",
        }
    }
}

/// A dismissible banner.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, text: text.into() }
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// The selected file could not be read.
    File(String),
    /// The import workflow refused an action.
    Workflow(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::File(msg) => write!(f, "File error: {}", msg),
            AppError::Workflow(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<WorkflowError> for AppError {
    fn from(e: WorkflowError) -> Self {
        AppError::Workflow(e.to_string())
    }
}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_error_message_kept() {
        let err: AppError = WorkflowError::NothingToSubmit.into();
        assert_eq!(err.to_string(), WorkflowError::NothingToSubmit.to_string());
    }

    #[test]
    fn test_notice_classes() {
        assert_eq!(Notice::success("ok").level.css_class(), "alert alert-success");
        assert_eq!(NoticeLevel::Error.css_class(), "alert alert-danger");
    }
}
