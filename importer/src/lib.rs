//! # Tradeload - CSV bulk-trade import for a portfolio tracker
//!
//! Turns a broker trade-book export into candidate trades, lets the user
//! fix them, and posts them in one batch to the tracker's bulk endpoint.
//! Per-row validation errors from the server are mapped back onto the rows
//! until the batch is accepted.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│   Preview   │────▶│    Bulk     │
//! │  (broker)   │     │ + formatter │     │ (edit/del)  │     │  submitter  │
//! └─────────────┘     └─────────────┘     └──────▲──────┘     └──────┬──────┘
//!                                                │    per-row errors │
//!                                                └───────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tradeload::{BulkSubmitter, ClientContext, ImportWorkflow};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut workflow = ImportWorkflow::new("/portfolio/api/portfolios/1/");
//!     workflow.select_file("tradebook.csv").unwrap();
//!     workflow.load_preview(&std::fs::read_to_string("tradebook.csv").unwrap()).unwrap();
//!
//!     let submitter = BulkSubmitter::new(ClientContext::from_env().unwrap()).unwrap();
//!     let state = workflow.submit_with(&submitter).await;
//!     println!("{:?}", state);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`models`] - Candidate trades, header schema, error maps
//! - [`format`] - Datetime and operation-code formatting
//! - [`parser`] - CSV to preview set
//! - [`preview`] - Editable preview grid
//! - [`submit`] - Bulk request and response classification
//! - [`annotate`] - Row/cell status for display
//! - [`workflow`] - Import state machine
//! - [`config`] - Client context (API origin, CSRF token)

// Core modules
pub mod error;
pub mod models;
pub mod config;

// Parsing
pub mod format;
pub mod parser;

// Editing and display
pub mod preview;
pub mod annotate;

// Submission
pub mod submit;
pub mod workflow;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    ConfigError, CsvError, FormatError, PreviewError, SubmitError, WorkflowError, WorkflowResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    header_line, page_count, CandidateTrade, FieldErrorMap, HeaderSpec, Page, RowId,
    SubmissionResult, TradeField, NON_FIELD_ERRORS, TRADE_HEADERS,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use format::{format_operation, format_timestamp};
pub use parser::{parse, parse_bytes, parse_file};

// =============================================================================
// Re-exports - Preview and annotations
// =============================================================================

pub use annotate::{annotate, render_report, RowAnnotation, RowStatus};
pub use preview::{page_slice, PreviewRow, PreviewSet};

// =============================================================================
// Re-exports - Submission
// =============================================================================

pub use config::ClientContext;
#[cfg(feature = "http")]
pub use submit::BulkSubmitter;
pub use submit::{interpret_response, BulkResponse};
pub use workflow::{ImportState, ImportWorkflow};
