//! Import workflow state machine.
//!
//! ```text
//! Idle ─select_file─▶ FileSelected ─load_preview─▶ Previewed ◀─┐ edit / delete
//!                          ▲   (parse error)          │        │
//!                          └──────────────────────────┤        │
//!                                                begin_submit  │
//!                                                     ▼        │
//!                                                Submitting ───┤ transport error
//!                                                     │        │
//!                                  complete_submit ───┴─▶ PartiallyFailed
//!                                                     │
//!                                                     ▼
//!                                                 Succeeded
//! ```
//!
//! The workflow owns the preview set. At most one batch is in flight:
//! [`ImportWorkflow::begin_submit`] refuses to start another one.

use std::fmt;

use serde::Serialize;

use crate::annotate::{annotate, RowAnnotation};
use crate::error::{SubmitError, SubmitResult, WorkflowError, WorkflowResult};
use crate::models::{has_row_errors, CandidateTrade, HeaderSpec, RowId, TRADE_HEADERS};
use crate::parser::{parse, parse_bytes};
use crate::preview::PreviewSet;
use crate::submit::BulkResponse;

/// Where the import currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportState {
    Idle,
    FileSelected,
    Previewed,
    Submitting,
    /// Terminal: the batch was accepted.
    Succeeded,
    /// Server reported row errors; the user fixes and resubmits.
    PartiallyFailed,
}

impl ImportState {
    pub fn name(&self) -> &'static str {
        match self {
            ImportState::Idle => "idle",
            ImportState::FileSelected => "file selected",
            ImportState::Previewed => "previewing",
            ImportState::Submitting => "submitting",
            ImportState::Succeeded => "succeeded",
            ImportState::PartiallyFailed => "partially failed",
        }
    }

    /// States in which rows may be edited and the batch submitted.
    pub fn is_editable(&self) -> bool {
        matches!(self, ImportState::Previewed | ImportState::PartiallyFailed)
    }
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct InFlight {
    submitted: Vec<RowId>,
    resume: ImportState,
}

/// One CSV import, from file selection to accepted batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportWorkflow {
    headers: Vec<HeaderSpec>,
    portfolio: String,
    state: ImportState,
    file_name: Option<String>,
    preview: PreviewSet,
    message: Option<String>,
    in_flight: Option<InFlight>,
    created: usize,
}

impl ImportWorkflow {
    /// Workflow for the broker trade-book layout, importing into `portfolio`.
    pub fn new(portfolio: impl Into<String>) -> Self {
        Self::with_headers(portfolio, &TRADE_HEADERS)
    }

    pub fn with_headers(portfolio: impl Into<String>, headers: &[HeaderSpec]) -> Self {
        Self {
            headers: headers.to_vec(),
            portfolio: portfolio.into(),
            state: ImportState::Idle,
            file_name: None,
            preview: PreviewSet::new(),
            message: None,
            in_flight: None,
            created: 0,
        }
    }

    pub fn state(&self) -> ImportState {
        self.state
    }

    pub fn preview(&self) -> &PreviewSet {
        &self.preview
    }

    pub fn portfolio(&self) -> &str {
        &self.portfolio
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Message to show above the grid: parse error, transport error or
    /// submission summary.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Trades created by the accepted batch.
    pub fn created_count(&self) -> usize {
        self.created
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the submit action should be enabled.
    pub fn can_submit(&self) -> bool {
        self.state.is_editable() && !self.preview.is_empty()
    }

    /// The modal stays open until the batch is accepted or the user closes it.
    pub fn is_open(&self) -> bool {
        !matches!(self.state, ImportState::Idle | ImportState::Succeeded)
    }

    pub fn annotations(&self) -> Vec<RowAnnotation> {
        annotate(&self.preview)
    }

    fn guard_not_submitting(&self, action: &'static str) -> WorkflowResult<()> {
        if self.state == ImportState::Submitting {
            return Err(WorkflowError::InvalidState {
                action,
                state: self.state.name(),
            });
        }
        Ok(())
    }

    /// A file was picked. Any previous preview is dropped.
    pub fn select_file(&mut self, name: impl Into<String>) -> WorkflowResult<()> {
        self.guard_not_submitting("select a file")?;
        let name = name.into();
        log::info!("Selected file '{}'", name);
        self.file_name = Some(name);
        self.preview = PreviewSet::new();
        self.message = None;
        self.created = 0;
        self.state = ImportState::FileSelected;
        Ok(())
    }

    /// Build the preview from the selected file's text.
    ///
    /// On failure the workflow stays on `FileSelected` with no preview and
    /// the error kept as the message.
    pub fn load_preview(&mut self, text: &str) -> WorkflowResult<usize> {
        self.check_can_preview()?;
        let parsed = parse(text, &self.headers, &self.portfolio);
        self.finish_preview(parsed)
    }

    /// Same as [`load_preview`](Self::load_preview) for undecoded file bytes.
    pub fn load_preview_bytes(&mut self, bytes: &[u8]) -> WorkflowResult<usize> {
        self.check_can_preview()?;
        let parsed = parse_bytes(bytes, &self.headers, &self.portfolio);
        self.finish_preview(parsed)
    }

    fn check_can_preview(&self) -> WorkflowResult<()> {
        match self.state {
            ImportState::FileSelected | ImportState::Previewed | ImportState::PartiallyFailed => Ok(()),
            other => Err(WorkflowError::InvalidState {
                action: "preview a file",
                state: other.name(),
            }),
        }
    }

    fn finish_preview(&mut self, parsed: crate::error::CsvResult<PreviewSet>) -> WorkflowResult<usize> {
        match parsed {
            Ok(preview) => {
                let rows = preview.len();
                self.preview = preview;
                self.message = None;
                self.state = ImportState::Previewed;
                Ok(rows)
            }
            Err(e) => {
                log::warn!("Preview failed: {}", e);
                self.preview = PreviewSet::new();
                self.message = Some(e.to_string());
                self.state = ImportState::FileSelected;
                Err(e.into())
            }
        }
    }

    fn check_editable(&self, action: &'static str) -> WorkflowResult<()> {
        if self.state.is_editable() {
            Ok(())
        } else {
            Err(WorkflowError::InvalidState {
                action,
                state: self.state.name(),
            })
        }
    }

    pub fn edit_field(&mut self, index: usize, key: &str, value: impl Into<String>) -> WorkflowResult<()> {
        self.check_editable("edit a row")?;
        self.preview.edit_field(index, key, value)?;
        Ok(())
    }

    pub fn delete_row(&mut self, index: usize) -> WorkflowResult<()> {
        self.check_editable("delete a row")?;
        let removed = self.preview.delete_row(index)?;
        log::debug!("Deleted row {} ({})", index, removed.id);
        Ok(())
    }

    /// Start a submission and return the payload to post.
    pub fn begin_submit(&mut self) -> WorkflowResult<Vec<CandidateTrade>> {
        if self.in_flight.is_some() {
            return Err(WorkflowError::SubmissionInFlight);
        }
        self.check_editable("submit")?;
        if self.preview.is_empty() {
            return Err(WorkflowError::NothingToSubmit);
        }

        self.in_flight = Some(InFlight {
            submitted: self.preview.ids(),
            resume: self.state,
        });
        self.message = None;
        self.state = ImportState::Submitting;
        Ok(self.preview.payload())
    }

    /// Record the outcome of the request started by [`begin_submit`](Self::begin_submit).
    pub fn complete_submit(&mut self, outcome: SubmitResult<BulkResponse>) -> WorkflowResult<ImportState> {
        let in_flight = self.in_flight.take().ok_or(WorkflowError::InvalidState {
            action: "complete a submission",
            state: self.state.name(),
        })?;

        let outcome = match outcome {
            Ok(BulkResponse::Rejected(result))
                if !has_row_errors(&result) && result.len() != in_flight.submitted.len() =>
            {
                Err(SubmitError::InvalidResponse(format!(
                    "batch rejected without row errors: {} error entries for {} trades",
                    result.len(),
                    in_flight.submitted.len()
                )))
            }
            other => other,
        };

        match outcome {
            Ok(BulkResponse::Created(created)) => {
                log::info!("Import accepted: {} trades created", created.len());
                self.created = created.len();
                self.preview = PreviewSet::new();
                self.message = Some(format!("{} trades imported", self.created));
                self.state = ImportState::Succeeded;
            }
            Ok(BulkResponse::Rejected(result)) => {
                self.preview.apply_result(&in_flight.submitted, &result);
                if has_row_errors(&result) {
                    let failing = self.preview.error_count();
                    self.message = Some(format!(
                        "{} of {} trades need attention",
                        failing,
                        self.preview.len()
                    ));
                    self.state = ImportState::PartiallyFailed;
                } else {
                    self.created = in_flight.submitted.len();
                    self.message = Some(format!("{} trades imported", self.created));
                    self.state = ImportState::Succeeded;
                }
            }
            Err(e) => {
                self.message = Some(e.to_string());
                self.state = in_flight.resume;
                return Err(e.into());
            }
        }

        Ok(self.state)
    }

    /// Post the current preview with `submitter` and record the outcome.
    #[cfg(feature = "http")]
    pub async fn submit_with(
        &mut self,
        submitter: &crate::submit::BulkSubmitter,
    ) -> WorkflowResult<ImportState> {
        let payload = self.begin_submit()?;
        let outcome = submitter.submit(&payload).await;
        self.complete_submit(outcome)
    }

    /// Close the modal and forget everything.
    pub fn reset(&mut self) {
        let headers = std::mem::take(&mut self.headers);
        let portfolio = std::mem::take(&mut self.portfolio);
        *self = Self::with_headers(portfolio, &headers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::RowStatus;
    use crate::error::CsvError;
    use crate::submit::interpret_response;
    use crate::models::{header_line, FieldErrorMap};
    use serde_json::json;

    fn csv(n: usize) -> String {
        let mut lines = vec![header_line(&TRADE_HEADERS)];
        for i in 0..n {
            lines.push(format!("T{i},NSE,21-03-2024 14:30,INE00{i},Sec {i},B,10,100,1,0.5"));
        }
        lines.join("\n")
    }

    fn previewed(n: usize) -> ImportWorkflow {
        let mut wf = ImportWorkflow::new("/portfolio/api/portfolios/1/");
        wf.select_file("trades.csv").unwrap();
        wf.load_preview(&csv(n)).unwrap();
        wf
    }

    fn error_at(n: usize, index: usize) -> Vec<FieldErrorMap> {
        let mut result = vec![FieldErrorMap::new(); n];
        result[index].insert("isin".into(), vec!["Unknown ISIN.".into()]);
        result
    }

    #[test]
    fn test_happy_path() {
        let mut wf = previewed(3);
        assert_eq!(wf.state(), ImportState::Previewed);
        assert!(wf.can_submit());

        let payload = wf.begin_submit().unwrap();
        assert_eq!(payload.len(), 3);
        assert_eq!(wf.state(), ImportState::Submitting);
        assert!(!wf.can_submit());

        let created = vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})];
        let state = wf.complete_submit(Ok(BulkResponse::Created(created))).unwrap();
        assert_eq!(state, ImportState::Succeeded);
        assert!(wf.preview().is_empty());
        assert_eq!(wf.created_count(), 3);
        assert!(!wf.is_open());
    }

    #[test]
    fn test_preview_requires_file() {
        let mut wf = ImportWorkflow::new("/p/1/");
        assert!(matches!(
            wf.load_preview(&csv(1)),
            Err(WorkflowError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_preview_failure_returns_to_file_selected() {
        let mut wf = previewed(2);
        let err = wf.load_preview("Wrong,Header\n1,2").unwrap_err();

        assert!(matches!(err, WorkflowError::Csv(CsvError::HeaderMismatch(_))));
        assert_eq!(wf.state(), ImportState::FileSelected);
        assert!(wf.preview().is_empty());
        assert!(wf.message().unwrap().contains("header mismatch"));
        assert!(!wf.can_submit());
    }

    #[test]
    fn test_empty_file() {
        let mut wf = ImportWorkflow::new("/p/1/");
        wf.select_file("empty.csv").unwrap();
        assert!(matches!(
            wf.load_preview_bytes(b""),
            Err(WorkflowError::Csv(CsvError::EmptyFile))
        ));
        assert_eq!(wf.state(), ImportState::FileSelected);
    }

    #[test]
    fn test_header_only_cannot_submit() {
        let mut wf = previewed(0);
        assert!(matches!(wf.begin_submit(), Err(WorkflowError::NothingToSubmit)));
        assert_eq!(wf.state(), ImportState::Previewed);
    }

    #[test]
    fn test_second_submit_refused() {
        let mut wf = previewed(2);
        wf.begin_submit().unwrap();
        assert!(matches!(wf.begin_submit(), Err(WorkflowError::SubmissionInFlight)));
        assert!(wf.is_submitting());
    }

    #[test]
    fn test_edits_refused_while_submitting() {
        let mut wf = previewed(2);
        wf.begin_submit().unwrap();
        assert!(matches!(
            wf.edit_field(0, "price", "1"),
            Err(WorkflowError::InvalidState { .. })
        ));
        assert!(matches!(wf.delete_row(0), Err(WorkflowError::InvalidState { .. })));
        assert!(wf.select_file("other.csv").is_err());
    }

    #[test]
    fn test_complete_without_begin() {
        let mut wf = previewed(1);
        assert!(matches!(
            wf.complete_submit(Ok(BulkResponse::Created(vec![]))),
            Err(WorkflowError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_all_empty_maps_succeeds() {
        let mut wf = previewed(3);
        wf.begin_submit().unwrap();
        let state = wf
            .complete_submit(Ok(BulkResponse::Rejected(vec![FieldErrorMap::new(); 3])))
            .unwrap();

        assert_eq!(state, ImportState::Succeeded);
        assert!(wf
            .annotations()
            .iter()
            .all(|a| a.status == RowStatus::Success));
    }

    #[test]
    fn test_empty_rejection_array_is_not_success() {
        let mut wf = previewed(3);
        let before = wf.preview().clone();
        wf.begin_submit().unwrap();

        let err = wf.complete_submit(interpret_response(400, "[]")).unwrap_err();

        assert!(matches!(err, WorkflowError::Submit(SubmitError::InvalidResponse(_))));
        assert_eq!(wf.state(), ImportState::Previewed);
        assert_eq!(wf.created_count(), 0);
        assert_eq!(wf.preview(), &before);
        assert!(wf.message().unwrap().contains("0 error entries for 3 trades"));
        assert!(wf.can_submit());
    }

    #[test]
    fn test_short_rejection_array_is_not_success() {
        let mut wf = previewed(3);
        wf.begin_submit().unwrap();

        let err = wf
            .complete_submit(Ok(BulkResponse::Rejected(vec![FieldErrorMap::new(); 2])))
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Submit(SubmitError::InvalidResponse(_))));
        assert_eq!(wf.state(), ImportState::Previewed);
        assert!(wf.is_open());
        assert!(wf
            .annotations()
            .iter()
            .all(|a| a.status == RowStatus::Pending));
    }

    #[test]
    fn test_partial_failure_then_fix_and_resubmit() {
        let mut wf = previewed(4);
        wf.begin_submit().unwrap();
        let state = wf
            .complete_submit(Ok(BulkResponse::Rejected(error_at(4, 2))))
            .unwrap();

        assert_eq!(state, ImportState::PartiallyFailed);
        assert!(wf.is_open());
        assert_eq!(wf.preview().len(), 4);
        let notes = wf.annotations();
        for (i, note) in notes.iter().enumerate() {
            let expected = if i == 2 { RowStatus::Error } else { RowStatus::Success };
            assert_eq!(note.status, expected);
        }
        assert_eq!(wf.message(), Some("1 of 4 trades need attention"));

        wf.edit_field(2, "isin", "INE002A01018").unwrap();
        let payload = wf.begin_submit().unwrap();
        assert_eq!(payload[2].isin, "INE002A01018");

        let state = wf.complete_submit(Ok(BulkResponse::Created(vec![json!({}); 4]))).unwrap();
        assert_eq!(state, ImportState::Succeeded);
    }

    #[test]
    fn test_delete_after_failure_keeps_errors_on_their_rows() {
        let mut wf = previewed(4);
        wf.begin_submit().unwrap();
        wf.complete_submit(Ok(BulkResponse::Rejected(error_at(4, 3)))).unwrap();

        wf.delete_row(0).unwrap();

        let notes = wf.annotations();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[2].status, RowStatus::Error);
        assert_eq!(wf.preview().get(2).unwrap().trade.trade_id, "T3");
        assert_eq!(notes[0].status, RowStatus::Success);
    }

    #[test]
    fn test_transport_failure_preserves_grid() {
        let mut wf = previewed(3);
        wf.begin_submit().unwrap();
        wf.complete_submit(Ok(BulkResponse::Rejected(error_at(3, 1)))).unwrap();
        let before = wf.preview().clone();

        wf.begin_submit().unwrap();
        let err = wf
            .complete_submit(Err(SubmitError::Transport("connection refused".into())))
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Submit(SubmitError::Transport(_))));
        assert_eq!(wf.state(), ImportState::PartiallyFailed);
        assert_eq!(wf.preview(), &before);
        assert!(wf.message().unwrap().contains("connection refused"));
        assert!(wf.can_submit());
    }

    #[test]
    fn test_reset() {
        let mut wf = previewed(2);
        wf.reset();
        assert_eq!(wf.state(), ImportState::Idle);
        assert!(wf.preview().is_empty());
        assert_eq!(wf.portfolio(), "/portfolio/api/portfolios/1/");
        assert_eq!(wf.file_name(), None);

        wf.select_file("again.csv").unwrap();
        assert_eq!(wf.load_preview(&csv(1)).unwrap(), 1);
    }
}
