//! HTTP surface: the invoice form, the submission endpoint, and the
//! heartbeat that keeps the idle supervisor from stopping the process.

pub mod idle;

use crate::core::pipeline::InvoicePipeline;
use crate::domain::model::{InvoiceSubmission, SubmissionReceipt};
use crate::domain::ports::SheetStore;
use crate::utils::error::{RelayError, Result};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
pub use idle::IdleSupervisor;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// Request bodies are buffered for logging; anything past this is not an
/// invoice submission.
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub struct AppState<S: SheetStore> {
    pub pipeline: InvoicePipeline<S>,
    pub supervisor: Arc<IdleSupervisor>,
}

impl<S: SheetStore> AppState<S> {
    pub fn new(pipeline: InvoicePipeline<S>, supervisor: Arc<IdleSupervisor>) -> Self {
        Self {
            pipeline,
            supervisor,
        }
    }
}

pub fn router<S: SheetStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(serve_form))
        .route("/create_invoice", post(create_invoice::<S>))
        .route("/heartbeat", get(heartbeat::<S>))
        .nest_service("/static", ServeDir::new("static"))
        .layer(middleware::from_fn(log_requests))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Binds, starts the idle checker, and serves until the supervisor trips.
/// In-flight requests are not awaited once the shutdown signal fires.
pub async fn run<S: SheetStore + 'static>(
    state: Arc<AppState<S>>,
    addr: SocketAddr,
) -> Result<()> {
    let supervisor = Arc::clone(&state.supervisor);
    tokio::spawn(async move { supervisor.run().await });

    let mut shutdown_rx = state.supervisor.subscribe();
    let shutdown = async move {
        let _ = shutdown_rx.changed().await;
    };

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn serve_form() -> Html<&'static str> {
    Html(include_str!("../../static/app.html"))
}

async fn heartbeat<S: SheetStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<serde_json::Value> {
    state.supervisor.touch();
    Json(json!({"status": "alive"}))
}

async fn create_invoice<S: SheetStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(submission): Json<InvoiceSubmission>,
) -> std::result::Result<Json<SubmissionReceipt>, ApiError> {
    let receipt = state.pipeline.submit(submission).await?;
    Ok(Json(receipt))
}

/// Logs non-empty request bodies and reports the handling time back to the
/// client in an `X-Process-Time` header.
async fn log_requests(request: Request, next: Next) -> Response {
    let start = std::time::Instant::now();

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
    };
    if let Ok(text) = std::str::from_utf8(&bytes) {
        if !text.trim().is_empty() {
            tracing::info!("Request: {}", text);
        }
    }
    let request = Request::from_parts(parts, Body::from(bytes));

    let mut response = next.run(request).await;

    let elapsed = start.elapsed().as_secs_f64();
    if let Ok(value) = HeaderValue::from_str(&elapsed.to_string()) {
        response.headers_mut().insert("x-process-time", value);
    }
    response
}

/// Maps pipeline errors onto the HTTP surface: validation problems are the
/// client's, remote-sheet failures are a bad gateway, the rest is ours.
pub struct ApiError(RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            RelayError::Validation { field, reason } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"error": "validation", "field": field, "reason": reason}),
            ),
            err if err.is_remote() => {
                tracing::error!("Remote sheet failure: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({"error": "remote_unavailable", "message": err.to_string()}),
                )
            }
            err => {
                tracing::error!("Internal error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "internal", "message": err.to_string()}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
