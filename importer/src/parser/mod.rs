//! Broker CSV to preview-set parser.
//!
//! Splits on line breaks, then on commas. Quoted fields are not supported:
//! a comma inside a security name shifts the remaining cells of that row.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::format::{format_operation, format_timestamp};
use crate::models::{CandidateTrade, FieldErrorMap, HeaderSpec, TradeField};
use crate::preview::PreviewSet;

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
///
/// Unknown labels fall back to Windows-1252, which maps every byte.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoder = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15,
        label => encoding_rs::Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
            log::warn!("Unknown encoding '{}', decoding as windows-1252", label);
            encoding_rs::WINDOWS_1252
        }),
    };
    decoder.decode(bytes).0.into_owned()
}

/// Text of a file: strict UTF-8 when the bytes allow it, otherwise the
/// encoding chardet guesses.
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }
    let mut encoding = detect_encoding(bytes);
    if encoding == "utf-8" {
        // Not valid UTF-8 whatever chardet says.
        encoding = "windows-1252".to_string();
    }
    log::debug!("Detected encoding: {}", encoding);
    decode_content(bytes, &encoding)
}

/// Split text into trimmed comma-separated cells, skipping blank lines.
pub fn split_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

/// Check the header row against the expected labels, in order.
fn check_header(found: &[String], expected: &[HeaderSpec]) -> CsvResult<()> {
    let matches = found.len() == expected.len()
        && found.iter().zip(expected).all(|(cell, header)| cell == header.label);

    if matches {
        return Ok(());
    }

    let expected_line = expected.iter().map(|h| h.label).collect::<Vec<_>>().join(",");
    Err(CsvError::HeaderMismatch(format!(
        "expected '{}', found '{}'",
        expected_line,
        found.join(",")
    )))
}

/// Build one candidate trade from a data row.
///
/// Missing cells become empty strings; extra cells are ignored. A Datetime
/// that cannot be formatted keeps its raw value and yields a field error.
fn map_row(
    cells: &[String],
    headers: &[HeaderSpec],
    portfolio: &str,
) -> (CandidateTrade, FieldErrorMap) {
    let mut trade = CandidateTrade::new(portfolio);
    let mut errors = FieldErrorMap::new();

    for (i, header) in headers.iter().enumerate() {
        let raw = cells.get(i).map(String::as_str).unwrap_or("");

        let value = match header.field {
            TradeField::Timestamp => match format_timestamp(raw) {
                Ok(formatted) => formatted,
                Err(e) => {
                    errors
                        .entry(header.key().to_string())
                        .or_default()
                        .push(e.to_string());
                    raw.to_string()
                }
            },
            TradeField::Operation => format_operation(raw),
            _ => raw.to_string(),
        };

        trade.set(header.field, value);
    }

    (trade, errors)
}

/// Parse CSV text into a preview set.
///
/// The first non-blank row must match `headers` exactly. Every following
/// row becomes one candidate trade for `portfolio`, in file order.
///
/// # Example
/// ```
/// use tradeload::{parse, TRADE_HEADERS};
///
/// let csv = "Trade ID,Exchange,Datetime,ISIN,Security,Buy/Sell,Quantity,Price,Brokerage,Service Tax\n\
///            T1,NSE,21-03-2024 14:30,INE001,Acme,B,10,100,1,0.5";
/// let preview = parse(csv, &TRADE_HEADERS, "/portfolio/api/portfolios/1/").unwrap();
///
/// assert_eq!(preview.len(), 1);
/// assert_eq!(preview.rows()[0].trade.operation, "BUY");
/// ```
pub fn parse(text: &str, headers: &[HeaderSpec], portfolio: &str) -> CsvResult<PreviewSet> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rows = split_rows(text);

    let (header, data) = rows.split_first().ok_or(CsvError::EmptyFile)?;
    check_header(header, headers)?;

    let mut preview = PreviewSet::new();
    for cells in data {
        let (trade, errors) = map_row(cells, headers, portfolio);
        if errors.is_empty() {
            preview.push(trade);
        } else {
            log::debug!("Trade '{}' has format errors: {:?}", trade.trade_id, errors);
            preview.push_with_errors(trade, errors);
        }
    }

    log::info!("Parsed {} candidate trades", preview.len());
    Ok(preview)
}

/// Parse raw file bytes, auto-detecting the text encoding.
pub fn parse_bytes(bytes: &[u8], headers: &[HeaderSpec], portfolio: &str) -> CsvResult<PreviewSet> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }
    let content = decode_bytes(bytes);
    parse(&content, headers, portfolio)
}

/// Read and parse a CSV file from disk.
pub fn parse_file<P: AsRef<Path>>(
    path: P,
    headers: &[HeaderSpec],
    portfolio: &str,
) -> CsvResult<PreviewSet> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, headers, portfolio)
}
