//! # Board HTTP API (axum)
//!
//! Wrong delete passwords answer `200 incorrect password`, not an error
//! status. Clients rely on that.

pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod replies;
pub mod threads;

use std::sync::Arc;

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
    Router,
};
use domains::DeleteOutcome;
use services::{ReplyService, ThreadService};
use tower_http::trace::TraceLayer;

use crate::metrics::BoardMetrics;
use error::ApiError;

pub(crate) const REPORTED: &str = "reported";
pub(crate) const SUCCESS: &str = "success";
pub(crate) const INCORRECT_PASSWORD: &str = "incorrect password";

const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub threads: ThreadService,
    pub replies: ReplyService,
    pub metrics: Arc<BoardMetrics>,
}

impl AppState {
    pub fn new(threads: ThreadService, replies: ReplyService) -> Self {
        Self {
            threads,
            replies,
            metrics: Arc::new(BoardMetrics::new()),
        }
    }

    fn delete_response(&self, outcome: DeleteOutcome, entity: &str) -> &'static str {
        match outcome {
            DeleteOutcome::Deleted => SUCCESS,
            DeleteOutcome::IncorrectPassword => {
                self.metrics.observe_credential_mismatch(entity);
                INCORRECT_PASSWORD
            }
        }
    }
}

/// Builds the full application router.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let board_routes = Router::new()
        .route(
            "/api/threads/{board}",
            get(threads::list)
                .post(threads::create)
                .put(threads::report)
                .delete(threads::delete),
        )
        .route(
            "/api/replies/{board}",
            get(replies::fetch)
                .post(replies::create)
                .put(replies::report)
                .delete(replies::redact),
        )
        .route_layer(from_fn_with_state(
            state.metrics.clone(),
            middleware::track_requests,
        ));

    Router::new()
        .merge(board_routes)
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_policy(allowed_origins))
        .with_state(state)
}

async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics
        .render()
        .map_err(|_| ApiError::internal("failed to encode metrics"))?;
    Ok(([(CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)], body))
}

async fn health() -> &'static str {
    "ok"
}
