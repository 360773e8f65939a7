//! Bulk submission of candidate trades.
//!
//! One POST carries the whole batch. The server either creates every trade
//! (2xx, array of created resources) or rejects the batch with an array of
//! per-row error maps aligned with the request.
//!
//! [`interpret_response`] is transport-agnostic so the browser build can
//! reuse it behind its own HTTP client.

use serde_json::Value;

use crate::error::{SubmitError, SubmitResult};
use crate::models::{FieldErrorMap, SubmissionResult, NON_FIELD_ERRORS};

#[cfg(feature = "http")]
pub use client::BulkSubmitter;

/// Classified outcome of a bulk request that got a response.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkResponse {
    /// Every trade was created.
    Created(Vec<Value>),
    /// Validation failed; one error map per submitted row.
    Rejected(SubmissionResult),
}

/// Longest server body quoted in an error message.
const MAX_ERROR_BODY: usize = 300;

/// Classify a bulk endpoint response from its status code and body.
pub fn interpret_response(status: u16, body: &str) -> SubmitResult<BulkResponse> {
    let parsed = if body.trim().is_empty() {
        None
    } else {
        serde_json::from_str::<Value>(body).ok()
    };

    if (200..300).contains(&status) {
        return match parsed {
            None if body.trim().is_empty() => Ok(BulkResponse::Created(Vec::new())),
            Some(Value::Array(created)) => Ok(BulkResponse::Created(created)),
            Some(other) => Err(SubmitError::InvalidResponse(format!(
                "expected an array of created trades, got {}",
                json_kind(&other)
            ))),
            None => Err(SubmitError::InvalidResponse(truncate(body))),
        };
    }

    match parsed {
        Some(Value::Array(items)) => Ok(BulkResponse::Rejected(
            items.iter().map(error_map_from_value).collect(),
        )),
        Some(Value::Object(obj)) => {
            // Whole-batch rejection, e.g. a body that was not a list.
            let map = error_map_from_value(&Value::Object(obj));
            let message = map
                .iter()
                .map(|(key, messages)| {
                    if key == NON_FIELD_ERRORS {
                        messages.join(" ")
                    } else {
                        format!("{}: {}", key, messages.join(" "))
                    }
                })
                .collect::<Vec<_>>()
                .join("; ");
            Err(SubmitError::Server { status, message })
        }
        _ => Err(SubmitError::Server {
            status,
            message: truncate(body),
        }),
    }
}

/// Turn one element of an error array into a field error map.
///
/// Lists of strings are kept; a bare string becomes a one-item list; any
/// other value is rendered as JSON. Non-object elements yield an empty map.
pub fn error_map_from_value(value: &Value) -> FieldErrorMap {
    let Some(obj) = value.as_object() else {
        return FieldErrorMap::new();
    };

    obj.iter()
        .map(|(key, messages)| {
            let messages = match messages {
                Value::Array(items) => items.iter().map(message_text).collect(),
                other => vec![message_text(other)],
            };
            (key.clone(), messages)
        })
        .collect()
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(feature = "http")]
mod client {
    use std::time::Duration;

    use reqwest::header::CONTENT_TYPE;

    use super::{interpret_response, BulkResponse};
    use crate::config::{ClientContext, CSRF_HEADER};
    use crate::error::{SubmitError, SubmitResult};
    use crate::models::CandidateTrade;

    /// Native bulk submitter over reqwest.
    pub struct BulkSubmitter {
        client: reqwest::Client,
        context: ClientContext,
    }

    impl BulkSubmitter {
        pub fn new(context: ClientContext) -> SubmitResult<Self> {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(context.timeout_secs))
                .build()
                .map_err(|e| SubmitError::Transport(format!("Failed to build HTTP client: {}", e)))?;
            Ok(Self { client, context })
        }

        pub fn context(&self) -> &ClientContext {
            &self.context
        }

        /// Post the batch once. No retry.
        pub async fn submit(&self, trades: &[CandidateTrade]) -> SubmitResult<BulkResponse> {
            let body = serde_json::to_string(trades)?;
            let url = self.context.bulk_url();
            log::info!("Submitting {} trades to {}", trades.len(), url);

            let mut request = self
                .client
                .post(&url)
                .header(CONTENT_TYPE, "application/json")
                .body(body);
            if let Some(token) = &self.context.csrf_token {
                request = request.header(CSRF_HEADER, token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| SubmitError::Transport(e.to_string()))?;
            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|e| SubmitError::Transport(format!("Failed to read response: {}", e)))?;

            let outcome = interpret_response(status, &text);
            match &outcome {
                Ok(BulkResponse::Created(created)) => {
                    log::info!("Server created {} trades", created.len())
                }
                Ok(BulkResponse::Rejected(rows)) => log::warn!(
                    "Server rejected the batch: {} of {} rows have errors",
                    rows.iter().filter(|m| !m.is_empty()).count(),
                    rows.len()
                ),
                Err(e) => log::error!("Bulk submission failed: {}", e),
            }
            outcome
        }
    }
}
