//! Bulk trade submission from the browser.
//!
//! Same request as the native submitter, sent with gloo-net. The response
//! goes through the shared [`interpret_response`] classifier.

use gloo_net::http::Request;
use tradeload::config::CSRF_HEADER;
use tradeload::{interpret_response, BulkResponse, CandidateTrade, ClientContext, SubmitError};

/// Post the batch once. No retry.
pub async fn submit_trades(
    context: &ClientContext,
    trades: &[CandidateTrade],
) -> Result<BulkResponse, SubmitError> {
    let url = context.bulk_url();
    log::info!("📤 Submitting {} trades to {}", trades.len(), url);

    let mut builder = Request::post(&url);
    if let Some(token) = &context.csrf_token {
        builder = builder.header(CSRF_HEADER, token);
    }
    let request = builder
        .json(&trades)
        .map_err(|e| SubmitError::Serialize(e.to_string()))?;

    let response = request
        .send()
        .await
        .map_err(|e| SubmitError::Transport(format!("HTTP request failed: {}", e)))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| SubmitError::Transport(format!("Failed to read response: {}", e)))?;

    let outcome = interpret_response(status, &text);
    match &outcome {
        Ok(BulkResponse::Created(created)) => log::info!("✅ {} trades created", created.len()),
        Ok(BulkResponse::Rejected(_)) => log::warn!("⚠️ Batch rejected with row errors"),
        Err(e) => log::error!("❌ Bulk submission failed: {}", e),
    }
    outcome
}
