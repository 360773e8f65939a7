//! Editable preview grid of candidate trades.
//!
//! Rows keep CSV order. Each row carries a stable [`RowId`] and the
//! validation messages last attached to it, so deleting a row never
//! shifts another row's errors onto the wrong trade.

use serde::Serialize;

use crate::error::{PreviewError, PreviewResult};
use crate::models::{page_count, CandidateTrade, FieldErrorMap, RowId, TradeField};

/// One row of the preview grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRow {
    pub id: RowId,
    pub trade: CandidateTrade,
    /// `None` until the row has been validated (locally or by the server).
    pub errors: Option<FieldErrorMap>,
}

impl PreviewRow {
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// Ordered, index-addressed set of candidate trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreviewSet {
    rows: Vec<PreviewRow>,
    next_id: u64,
    /// Set once a server result has been applied.
    validated: bool,
}

impl PreviewSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trade, returning its new id.
    pub fn push(&mut self, trade: CandidateTrade) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        self.rows.push(PreviewRow {
            id,
            trade,
            errors: None,
        });
        id
    }

    /// Append a trade that already failed local formatting.
    pub fn push_with_errors(&mut self, trade: CandidateTrade, errors: FieldErrorMap) -> RowId {
        let id = self.push(trade);
        if let Some(row) = self.rows.last_mut() {
            row.errors = Some(errors);
        }
        id
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[PreviewRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreviewRow> {
        self.rows.iter()
    }

    pub fn get(&self, index: usize) -> Option<&PreviewRow> {
        self.rows.get(index)
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    /// Whether a server result has been applied to this set.
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Replace one cell. The row is not re-validated until the next submission.
    pub fn edit_field(&mut self, index: usize, key: &str, value: impl Into<String>) -> PreviewResult<()> {
        let field = TradeField::from_key(key).ok_or_else(|| PreviewError::UnknownField(key.to_string()))?;
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(PreviewError::RowOutOfRange { index, len })?;
        row.trade.set(field, value);
        Ok(())
    }

    /// Remove a row; later rows move up by one. Its errors go with it.
    pub fn delete_row(&mut self, index: usize) -> PreviewResult<PreviewRow> {
        if index >= self.rows.len() {
            return Err(PreviewError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Trades in row order, as sent to the bulk endpoint.
    pub fn payload(&self) -> Vec<CandidateTrade> {
        self.rows.iter().map(|row| row.trade.clone()).collect()
    }

    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|row| row.id).collect()
    }

    /// Drop every attached message and forget previous validation.
    pub fn clear_errors(&mut self) {
        for row in &mut self.rows {
            row.errors = None;
        }
        self.validated = false;
    }

    /// Attach a server result to the rows that were submitted.
    ///
    /// `submitted[i]` is the id of the row sent at index `i`; `result[i]` is
    /// its error map. Previous messages are discarded first. Rows deleted
    /// since submission are skipped.
    pub fn apply_result(&mut self, submitted: &[RowId], result: &[FieldErrorMap]) {
        self.clear_errors();
        for (id, errors) in submitted.iter().zip(result) {
            if let Some(index) = self.position(*id) {
                self.rows[index].errors = Some(errors.clone());
            }
        }
        if result.len() != submitted.len() {
            log::warn!(
                "Server returned {} error entries for {} submitted rows",
                result.len(),
                submitted.len()
            );
        }
        self.validated = true;
    }

    pub fn error_count(&self) -> usize {
        self.rows.iter().filter(|row| row.has_errors()).count()
    }

    /// Indices of rows whose trade id, ISIN, security name or exchange
    /// contains `term`, ignoring case. A blank term matches every row.
    pub fn search(&self, term: &str) -> Vec<usize> {
        let needle = term.trim().to_lowercase();
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                needle.is_empty()
                    || [
                        TradeField::TradeId,
                        TradeField::Isin,
                        TradeField::Name,
                        TradeField::Exchange,
                    ]
                    .iter()
                    .any(|field| row.trade.get(*field).to_lowercase().contains(&needle))
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Rows on 1-based page `page`, `page_size` per page.
    pub fn page(&self, page: usize, page_size: usize) -> &[PreviewRow] {
        page_slice(&self.rows, page, page_size)
    }

    pub fn page_count(&self, page_size: usize) -> usize {
        page_count(self.rows.len(), page_size)
    }
}

/// Slice of `items` on 1-based page `page`. Out-of-range pages are empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
