//! Fix operation API routes.
//!
//! The POST endpoints run an operation to completion and respond with the
//! terminal report. The SSE endpoints additionally stream every progress
//! event as it is emitted, then a final `completed` (or `error`) event;
//! closing the connection does not interrupt the run, it only stops the
//! delivery of further events.

use super::metrics::record_fix_operation;
use super::state::{GuardedCoordinator, ServerState};
use crate::fixes::FixError;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::warn;

fn error_response(err: FixError) -> Response {
    match &err {
        FixError::UnknownOperation(_) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
            .into_response(),
        FixError::ConnectionFailed => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

async fn run_fix(
    State(coordinator): State<GuardedCoordinator>,
    Path(operation): Path<String>,
) -> Response {
    let start = Instant::now();
    match coordinator.run(&operation, |_| {}).await {
        Ok(report) => {
            record_fix_operation(&operation, "success", start.elapsed());
            Json(report).into_response()
        }
        Err(err) => {
            warn!("Fix operation {} rejected: {}", operation, err);
            record_fix_operation(&operation, "rejected", start.elapsed());
            error_response(err)
        }
    }
}

async fn run_comprehensive(State(coordinator): State<GuardedCoordinator>) -> Response {
    let start = Instant::now();
    match coordinator.run_comprehensive(|_| {}).await {
        Ok(report) => {
            record_fix_operation("comprehensive", "success", start.elapsed());
            Json(report).into_response()
        }
        Err(err) => {
            warn!("Comprehensive fix rejected: {}", err);
            record_fix_operation("comprehensive", "rejected", start.elapsed());
            error_response(err)
        }
    }
}

fn event_stream(
    receiver: mpsc::UnboundedReceiver<Event>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::unfold(receiver, |mut receiver| async move {
        receiver.recv().await.map(|event| (Ok(event), receiver))
    })
}

fn progress_event(event: &crate::fixes::ProgressEvent) -> Event {
    let json = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Event::default().event("progress").data(json)
}

async fn stream_fix(
    State(coordinator): State<GuardedCoordinator>,
    Path(operation): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let start = Instant::now();
        let sender = tx.clone();
        let result = coordinator
            .run(&operation, |event| {
                let _ = sender.send(progress_event(event));
            })
            .await;
        match result {
            Ok(report) => {
                record_fix_operation(&operation, "success", start.elapsed());
                let json = serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string());
                let _ = tx.send(Event::default().event("completed").data(json));
            }
            Err(err) => {
                record_fix_operation(&operation, "rejected", start.elapsed());
                let _ = tx.send(Event::default().event("error").data(err.to_string()));
            }
        }
    });

    Sse::new(event_stream(rx)).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

async fn stream_comprehensive(
    State(coordinator): State<GuardedCoordinator>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let start = Instant::now();
        let sender = tx.clone();
        let result = coordinator
            .run_comprehensive(|event| {
                let _ = sender.send(progress_event(event));
            })
            .await;
        match result {
            Ok(report) => {
                record_fix_operation("comprehensive", "success", start.elapsed());
                let json = serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string());
                let _ = tx.send(Event::default().event("completed").data(json));
            }
            Err(err) => {
                record_fix_operation("comprehensive", "rejected", start.elapsed());
                let _ = tx.send(Event::default().event("error").data(err.to_string()));
            }
        }
    });

    Sse::new(event_stream(rx)).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

pub fn make_fix_routes(state: ServerState) -> Router {
    Router::new()
        .route("/fix/comprehensive", post(run_comprehensive))
        .route("/fix/comprehensive/stream", get(stream_comprehensive))
        .route("/fix/{operation}", post(run_fix))
        .route("/fix/{operation}/stream", get(stream_fix))
        .with_state(state)
}
