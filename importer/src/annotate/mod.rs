//! Row and cell annotations derived from validation feedback.
//!
//! Pure presentation data: the frontend maps it to table classes and the
//! CLI to a text report. Neither needs to look at raw error maps.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::models::{RowId, TradeField, NON_FIELD_ERRORS};
use crate::preview::{PreviewRow, PreviewSet};

/// Display state of one preview row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// Not validated yet.
    Pending,
    /// Validated without messages.
    Success,
    /// At least one field or row-level message.
    Error,
}

impl RowStatus {
    /// Bootstrap table-row class.
    pub fn css_class(&self) -> &'static str {
        match self {
            RowStatus::Pending => "",
            RowStatus::Success => "table-success",
            RowStatus::Error => "table-danger",
        }
    }
}

/// Everything needed to paint one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowAnnotation {
    pub id: RowId,
    pub status: RowStatus,
    /// Field key to its messages joined for display under the cell.
    pub cell_messages: BTreeMap<String, String>,
    /// Full-width message shown beneath the row.
    pub row_message: Option<String>,
}

impl RowAnnotation {
    pub fn cell_message(&self, field: TradeField) -> Option<&str> {
        self.cell_messages.get(field.key()).map(String::as_str)
    }
}

/// Annotate a single row. `validated` tells whether a server result has
/// been applied to the set the row belongs to.
pub fn annotate_row(row: &PreviewRow, validated: bool) -> RowAnnotation {
    let mut cell_messages = BTreeMap::new();
    let mut row_message = None;

    let status = match &row.errors {
        Some(errors) if !errors.is_empty() => {
            for (key, messages) in errors {
                let joined = messages.join(" ");
                if key == NON_FIELD_ERRORS {
                    row_message = Some(joined);
                } else {
                    cell_messages.insert(key.clone(), joined);
                }
            }
            RowStatus::Error
        }
        Some(_) => RowStatus::Success,
        None if validated => RowStatus::Success,
        None => RowStatus::Pending,
    };

    RowAnnotation {
        id: row.id,
        status,
        cell_messages,
        row_message,
    }
}

/// Annotate every row of the preview, in row order.
pub fn annotate(preview: &PreviewSet) -> Vec<RowAnnotation> {
    preview
        .iter()
        .map(|row| annotate_row(row, preview.is_validated()))
        .collect()
}

/// Plain-text report of the preview and its annotations.
pub fn render_report(preview: &PreviewSet) -> String {
    let mut out = String::new();

    for (index, (row, note)) in preview.iter().zip(annotate(preview)).enumerate() {
        let marker = match note.status {
            RowStatus::Pending => "  ",
            RowStatus::Success => "✓ ",
            RowStatus::Error => "✗ ",
        };
        let _ = writeln!(
            out,
            "{}{:>3}  {} {} {} {} x {} @ {}",
            marker,
            index + 1,
            row.trade.trade_id,
            row.trade.timestamp,
            row.trade.operation,
            row.trade.name,
            row.trade.quantity,
            row.trade.price,
        );
        for field in TradeField::ALL {
            if let Some(message) = note.cell_message(field) {
                let _ = writeln!(
                    out,
                    "        {} '{}': {}",
                    field.label(),
                    row.trade.get(field),
                    message
                );
            }
        }
        // Keys the server sent that are not trade fields.
        for (key, message) in &note.cell_messages {
            if TradeField::from_key(key).is_none() {
                let _ = writeln!(out, "        {}: {}", key, message);
            }
        }
        if let Some(message) = &note.row_message {
            let _ = writeln!(out, "        {}", message);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateTrade, FieldErrorMap};

    fn preview(n: usize) -> PreviewSet {
        let mut set = PreviewSet::new();
        for i in 0..n {
            let mut trade = CandidateTrade::new("/p/1/");
            trade.trade_id = format!("T{i}");
            set.push(trade);
        }
        set
    }

    fn map(entries: &[(&str, &[&str])]) -> FieldErrorMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_pending_before_submission() {
        let notes = annotate(&preview(2));
        assert!(notes.iter().all(|n| n.status == RowStatus::Pending));
        assert_eq!(notes[0].status.css_class(), "");
    }

    #[test]
    fn test_all_empty_maps_render_success() {
        let mut set = preview(3);
        let ids = set.ids();
        set.apply_result(&ids, &vec![FieldErrorMap::new(); 3]);

        let notes = annotate(&set);
        assert_eq!(notes.iter().filter(|n| n.status == RowStatus::Error).count(), 0);
        assert!(notes.iter().all(|n| n.status.css_class() == "table-success"));
    }

    #[test]
    fn test_only_failing_row_is_error() {
        let mut set = preview(4);
        let ids = set.ids();
        let mut result = vec![FieldErrorMap::new(); 4];
        result[2] = map(&[("quantity", &["Ensure this value is greater than 0."])]);
        set.apply_result(&ids, &result);

        let notes = annotate(&set);
        for (i, note) in notes.iter().enumerate() {
            let expected = if i == 2 { RowStatus::Error } else { RowStatus::Success };
            assert_eq!(note.status, expected, "row {i}");
        }
        assert_eq!(
            notes[2].cell_message(TradeField::Quantity),
            Some("Ensure this value is greater than 0.")
        );
        assert_eq!(notes[2].cell_message(TradeField::Price), None);
    }

    #[test]
    fn test_missing_entry_renders_success() {
        let mut set = preview(3);
        let ids = set.ids();
        set.apply_result(&ids, &[FieldErrorMap::new()]);

        assert!(annotate(&set).iter().all(|n| n.status == RowStatus::Success));
    }

    #[test]
    fn test_messages_joined_and_non_field_row() {
        let mut set = preview(1);
        let ids = set.ids();
        set.apply_result(
            &ids,
            &[map(&[
                ("price", &["A valid number is required.", "Must be positive."]),
                (NON_FIELD_ERRORS, &["Could not find a stock with isin 'INE999'."]),
            ])],
        );

        let note = &annotate(&set)[0];
        assert_eq!(note.status, RowStatus::Error);
        assert_eq!(
            note.cell_message(TradeField::Price),
            Some("A valid number is required. Must be positive.")
        );
        assert_eq!(
            note.row_message.as_deref(),
            Some("Could not find a stock with isin 'INE999'.")
        );
        assert!(!note.cell_messages.contains_key(NON_FIELD_ERRORS));
    }

    #[test]
    fn test_only_non_field_errors_is_error() {
        let mut set = preview(1);
        let ids = set.ids();
        set.apply_result(&ids, &[map(&[(NON_FIELD_ERRORS, &["Duplicate trade."])])]);

        let note = &annotate(&set)[0];
        assert_eq!(note.status, RowStatus::Error);
        assert!(note.cell_messages.is_empty());
    }

    #[test]
    fn test_local_format_error_before_submission() {
        let mut set = PreviewSet::new();
        set.push(CandidateTrade::new("/p/1/"));
        set.push_with_errors(
            CandidateTrade::new("/p/1/"),
            map(&[("timestamp", &["Invalid datetime 'x', expected DD-MM-YYYY HH:MM"])]),
        );

        let notes = annotate(&set);
        assert_eq!(notes[0].status, RowStatus::Pending);
        assert_eq!(notes[1].status, RowStatus::Error);
    }

    #[test]
    fn test_report() {
        let mut set = preview(2);
        let ids = set.ids();
        set.apply_result(
            &ids,
            &[
                FieldErrorMap::new(),
                map(&[("isin", &["Unknown ISIN."]), ("stock", &["Required."])]),
            ],
        );

        let report = render_report(&set);
        assert!(report.contains("✓   1  T0"));
        assert!(report.contains("✗   2  T1"));
        assert!(report.contains("ISIN '': Unknown ISIN."));
        assert!(report.contains("stock: Required."));
    }
}
