//! Domain models for the trade import workflow.
//!
//! - [`HeaderSpec`] / [`TRADE_HEADERS`] - the expected CSV schema
//! - [`TradeField`] - the fixed keys of a candidate trade
//! - [`CandidateTrade`] - one parsed row awaiting review
//! - [`RowId`] - stable identity of a preview row
//! - [`FieldErrorMap`] / [`SubmissionResult`] - server validation feedback
//! - [`Page`] - paginated list envelope of the collaborator endpoints

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// CSV Schema
// =============================================================================

/// One expected CSV column: its header label and the trade key it fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSpec {
    /// Header text as it appears in the file.
    pub label: &'static str,
    /// Trade field the column maps onto.
    pub field: TradeField,
}

impl HeaderSpec {
    pub const fn new(label: &'static str, field: TradeField) -> Self {
        Self { label, field }
    }

    /// Wire key of the mapped field.
    pub fn key(&self) -> &'static str {
        self.field.key()
    }
}

/// Broker trade-book export layout, in column order.
pub const TRADE_HEADERS: [HeaderSpec; 10] = [
    HeaderSpec::new("Trade ID", TradeField::TradeId),
    HeaderSpec::new("Exchange", TradeField::Exchange),
    HeaderSpec::new("Datetime", TradeField::Timestamp),
    HeaderSpec::new("ISIN", TradeField::Isin),
    HeaderSpec::new("Security", TradeField::Name),
    HeaderSpec::new("Buy/Sell", TradeField::Operation),
    HeaderSpec::new("Quantity", TradeField::Quantity),
    HeaderSpec::new("Price", TradeField::Price),
    HeaderSpec::new("Brokerage", TradeField::Brokerage),
    HeaderSpec::new("Service Tax", TradeField::Tax),
];

/// The expected header line, comma separated.
pub fn header_line(headers: &[HeaderSpec]) -> String {
    headers
        .iter()
        .map(|h| h.label)
        .collect::<Vec<_>>()
        .join(",")
}

// =============================================================================
// Trade Fields
// =============================================================================

/// Fixed keys of a [`CandidateTrade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TradeField {
    TradeId,
    Exchange,
    Timestamp,
    Isin,
    Name,
    Operation,
    Quantity,
    Price,
    Brokerage,
    Tax,
    Portfolio,
}

impl TradeField {
    /// All fields, in display order.
    pub const ALL: [TradeField; 11] = [
        TradeField::TradeId,
        TradeField::Exchange,
        TradeField::Timestamp,
        TradeField::Isin,
        TradeField::Name,
        TradeField::Operation,
        TradeField::Quantity,
        TradeField::Price,
        TradeField::Brokerage,
        TradeField::Tax,
        TradeField::Portfolio,
    ];

    /// Key used on the wire and in server error maps.
    pub fn key(&self) -> &'static str {
        match self {
            Self::TradeId => "trade_id",
            Self::Exchange => "exchange",
            Self::Timestamp => "timestamp",
            Self::Isin => "isin",
            Self::Name => "name",
            Self::Operation => "operation",
            Self::Quantity => "quantity",
            Self::Price => "price",
            Self::Brokerage => "brokerage",
            Self::Tax => "tax",
            Self::Portfolio => "portfolio",
        }
    }

    /// Parse a wire key. `portfolio_reference` is accepted as an alias.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "trade_id" => Some(Self::TradeId),
            "exchange" => Some(Self::Exchange),
            "timestamp" => Some(Self::Timestamp),
            "isin" => Some(Self::Isin),
            "name" => Some(Self::Name),
            "operation" => Some(Self::Operation),
            "quantity" => Some(Self::Quantity),
            "price" => Some(Self::Price),
            "brokerage" => Some(Self::Brokerage),
            "tax" => Some(Self::Tax),
            "portfolio" | "portfolio_reference" => Some(Self::Portfolio),
            _ => None,
        }
    }

    /// Column title for grids and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TradeId => "Trade ID",
            Self::Exchange => "Exchange",
            Self::Timestamp => "Datetime",
            Self::Isin => "ISIN",
            Self::Name => "Security",
            Self::Operation => "Buy/Sell",
            Self::Quantity => "Quantity",
            Self::Price => "Price",
            Self::Brokerage => "Brokerage",
            Self::Tax => "Service Tax",
            Self::Portfolio => "Portfolio",
        }
    }
}

impl fmt::Display for TradeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Candidate Trade
// =============================================================================

/// A parsed trade awaiting review and submission.
///
/// All values stay strings: the server owns numeric and reference
/// validation, and a bad cell must survive until the user fixes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTrade {
    pub trade_id: String,
    pub exchange: String,
    /// `YYYY-MM-DDTHH:MM:SS` once formatted.
    pub timestamp: String,
    pub isin: String,
    pub name: String,
    /// `BUY` or `SELL` once formatted; unknown codes pass through.
    pub operation: String,
    pub quantity: String,
    pub price: String,
    pub brokerage: String,
    pub tax: String,
    /// Portfolio URL the trade belongs to.
    #[serde(rename = "portfolio")]
    pub portfolio_reference: String,
}

impl CandidateTrade {
    pub fn new(portfolio_reference: impl Into<String>) -> Self {
        Self {
            portfolio_reference: portfolio_reference.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: TradeField) -> &str {
        match field {
            TradeField::TradeId => &self.trade_id,
            TradeField::Exchange => &self.exchange,
            TradeField::Timestamp => &self.timestamp,
            TradeField::Isin => &self.isin,
            TradeField::Name => &self.name,
            TradeField::Operation => &self.operation,
            TradeField::Quantity => &self.quantity,
            TradeField::Price => &self.price,
            TradeField::Brokerage => &self.brokerage,
            TradeField::Tax => &self.tax,
            TradeField::Portfolio => &self.portfolio_reference,
        }
    }

    pub fn set(&mut self, field: TradeField, value: impl Into<String>) {
        let slot = match field {
            TradeField::TradeId => &mut self.trade_id,
            TradeField::Exchange => &mut self.exchange,
            TradeField::Timestamp => &mut self.timestamp,
            TradeField::Isin => &mut self.isin,
            TradeField::Name => &mut self.name,
            TradeField::Operation => &mut self.operation,
            TradeField::Quantity => &mut self.quantity,
            TradeField::Price => &mut self.price,
            TradeField::Brokerage => &mut self.brokerage,
            TradeField::Tax => &mut self.tax,
            TradeField::Portfolio => &mut self.portfolio_reference,
        };
        *slot = value.into();
    }
}

// =============================================================================
// Row Identity
// =============================================================================

/// Stable identity of a preview row, assigned at parse time.
///
/// Survives deletions of other rows, unlike the row's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Validation Feedback
// =============================================================================

/// Key of row-level (cross-field) messages in a [`FieldErrorMap`].
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field key to messages for one row. Empty means the row validated.
pub type FieldErrorMap = BTreeMap<String, Vec<String>>;

/// One [`FieldErrorMap`] per submitted row, aligned by index.
pub type SubmissionResult = Vec<FieldErrorMap>;

/// Whether any row in a result carries a message.
pub fn has_row_errors(result: &SubmissionResult) -> bool {
    result.iter().any(|map| !map.is_empty())
}

// =============================================================================
// Paginated Lists
// =============================================================================

/// Paginated list envelope returned by the account, portfolio, trade and
/// transaction endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Number of pages of `page_size` items needed for `count` items.
    pub fn total_pages(&self, page_size: usize) -> usize {
        page_count(self.count, page_size)
    }
}

/// Number of pages needed to show `total` items, `page_size` per page.
///
/// Zero items still make one (empty) page.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}
