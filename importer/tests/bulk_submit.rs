//! End-to-end import against an in-process mock of the bulk endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tradeload::{
    header_line, BulkSubmitter, ClientContext, ImportState, ImportWorkflow, RowStatus,
    SubmitError, WorkflowError, TRADE_HEADERS,
};

const PORTFOLIO: &str = "/portfolio/api/portfolios/7/";
const TOKEN: &str = "test-csrf-token";

#[derive(Clone, Default)]
struct Received {
    batches: Arc<Mutex<Vec<Vec<Value>>>>,
}

/// Mimics the tracker's list serializer: all-or-nothing, errors aligned by index.
async fn bulk_trades(
    State(received): State<Received>,
    headers: HeaderMap,
    Json(trades): Json<Vec<Value>>,
) -> Response {
    if headers.get("x-csrftoken").and_then(|v| v.to_str().ok()) != Some(TOKEN) {
        return (StatusCode::FORBIDDEN, "<h1>CSRF verification failed.</h1>").into_response();
    }
    received.batches.lock().unwrap().push(trades.clone());

    let errors: Vec<Value> = trades
        .iter()
        .map(|trade| {
            let mut row = serde_json::Map::new();
            let op = trade["operation"].as_str().unwrap_or("");
            if op != "BUY" && op != "SELL" {
                row.insert(
                    "operation".into(),
                    json!([format!("\"{}\" is not a valid choice.", op)]),
                );
            }
            if trade["isin"].as_str().unwrap_or("").is_empty() {
                row.insert(
                    "non_field_errors".into(),
                    json!(["Either ISIN or Stock Symbol must be provided."]),
                );
            }
            Value::Object(row)
        })
        .collect();

    if errors.iter().any(|e| e.as_object().is_some_and(|o| !o.is_empty())) {
        return (StatusCode::BAD_REQUEST, Json(Value::Array(errors))).into_response();
    }

    let created: Vec<Value> = trades
        .iter()
        .enumerate()
        .map(|(i, t)| json!({"id": i + 1, "trade_id": t["trade_id"]}))
        .collect();
    (StatusCode::CREATED, Json(Value::Array(created))).into_response()
}

async fn spawn_server() -> (String, Received) {
    let received = Received::default();
    let app = Router::new()
        .route("/portfolio/api/bulk-trades/", post(bulk_trades))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), received)
}

fn csv(rows: &[&str]) -> String {
    let mut lines = vec![header_line(&TRADE_HEADERS)];
    lines.extend(rows.iter().map(|r| r.to_string()));
    lines.join("\n")
}

fn workflow(rows: &[&str]) -> ImportWorkflow {
    let mut wf = ImportWorkflow::new(PORTFOLIO);
    wf.select_file("tradebook.csv").unwrap();
    wf.load_preview(&csv(rows)).unwrap();
    wf
}

fn submitter(base_url: &str) -> BulkSubmitter {
    BulkSubmitter::new(ClientContext::new(base_url).with_csrf_token(TOKEN).with_timeout_secs(5))
        .unwrap()
}

#[tokio::test]
async fn test_import_accepted() {
    let (url, received) = spawn_server().await;
    let mut wf = workflow(&[
        "T1,NSE,21-03-2024 14:30,INE001,Acme,B,10,100,1,0.5",
        "T2,NSE,22-03-2024 09:15,INE002,Beta,S,4,250,1,0.5",
    ]);

    let state = wf.submit_with(&submitter(&url)).await.unwrap();

    assert_eq!(state, ImportState::Succeeded);
    assert_eq!(wf.created_count(), 2);
    assert!(wf.preview().is_empty());

    let batches = received.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    let first = &batches[0][0];
    assert_eq!(first["trade_id"], "T1");
    assert_eq!(first["timestamp"], "2024-03-21T14:30:00");
    assert_eq!(first["operation"], "BUY");
    assert_eq!(first["quantity"], "10");
    assert_eq!(first["portfolio"], PORTFOLIO);
    assert_eq!(batches[0][1]["operation"], "SELL");
}

#[tokio::test]
async fn test_import_rejected_then_corrected() {
    let (url, received) = spawn_server().await;
    let submitter = submitter(&url);
    let mut wf = workflow(&[
        "T1,NSE,21-03-2024 14:30,INE001,Acme,B,10,100,1,0.5",
        "T2,NSE,22-03-2024 09:15,INE002,Beta,X,4,250,1,0.5",
        "T3,NSE,23-03-2024 11:00,,Gamma,S,1,90,1,0.5",
    ]);

    let state = wf.submit_with(&submitter).await.unwrap();
    assert_eq!(state, ImportState::PartiallyFailed);
    assert_eq!(wf.preview().len(), 3);

    let notes = wf.annotations();
    assert_eq!(notes[0].status, RowStatus::Success);
    assert_eq!(notes[1].status, RowStatus::Error);
    assert_eq!(
        notes[1].cell_messages["operation"],
        "\"X\" is not a valid choice."
    );
    assert_eq!(notes[2].status, RowStatus::Error);
    assert_eq!(
        notes[2].row_message.as_deref(),
        Some("Either ISIN or Stock Symbol must be provided.")
    );

    // Fix one row, drop the other, resubmit.
    wf.edit_field(1, "operation", "SELL").unwrap();
    wf.delete_row(2).unwrap();
    let state = wf.submit_with(&submitter).await.unwrap();

    assert_eq!(state, ImportState::Succeeded);
    assert_eq!(wf.created_count(), 2);
    let batches = received.batches.lock().unwrap();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[1].len(), 2);
}

#[tokio::test]
async fn test_missing_csrf_token() {
    let (url, _) = spawn_server().await;
    let submitter = BulkSubmitter::new(ClientContext::new(&url)).unwrap();
    let mut wf = workflow(&["T1,NSE,21-03-2024 14:30,INE001,Acme,B,10,100,1,0.5"]);

    let err = wf.submit_with(&submitter).await.unwrap_err();

    match err {
        WorkflowError::Submit(SubmitError::Server { status, message }) => {
            assert_eq!(status, 403);
            assert!(message.contains("CSRF"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(wf.state(), ImportState::Previewed);
    assert_eq!(wf.preview().len(), 1);
}

#[tokio::test]
async fn test_transport_failure_keeps_preview() {
    // Reserve a port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut wf = workflow(&["T1,NSE,21-03-2024 14:30,INE001,Acme,B,10,100,1,0.5"]);
    let before = wf.preview().clone();

    let err = wf
        .submit_with(&submitter(&format!("http://{}", addr)))
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Submit(SubmitError::Transport(_))));
    assert_eq!(wf.state(), ImportState::Previewed);
    assert_eq!(wf.preview(), &before);
    assert!(wf.message().is_some());
    assert!(wf.can_submit());
}
