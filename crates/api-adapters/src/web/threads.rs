//! `/api/threads/{board}` handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use domains::{CreatedThread, ThreadWithReplies};
use services::ListOptions;

use super::dto::{DeleteThreadBody, NewThreadBody, ThreadRefBody};
use super::error::ApiError;
use super::extract::{field, Payload};
use super::{AppState, REPORTED};

/// GET - the ten freshest threads with three reply previews each.
pub async fn list(
    State(state): State<AppState>,
    Path(board): Path<String>,
) -> Result<Json<Vec<ThreadWithReplies>>, ApiError> {
    let threads = state
        .threads
        .list_recent(&board, ListOptions::default())
        .await?;
    Ok(Json(threads))
}

/// POST - start a thread.
pub async fn create(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(body): Payload<NewThreadBody>,
) -> Result<Json<CreatedThread>, ApiError> {
    let thread = state
        .threads
        .create(&board, field(&body.text), field(&body.delete_password))
        .await?;
    Ok(Json(CreatedThread::from(&thread)))
}

/// PUT - flag a thread.
pub async fn report(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(body): Payload<ThreadRefBody>,
) -> Result<&'static str, ApiError> {
    state.threads.report(&board, field(&body.thread_id)).await?;
    Ok(REPORTED)
}

/// DELETE - remove a thread given its delete password.
pub async fn delete(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(body): Payload<DeleteThreadBody>,
) -> Result<&'static str, ApiError> {
    let outcome = state
        .threads
        .delete(&board, field(&body.thread_id), field(&body.delete_password))
        .await?;
    Ok(state.delete_response(outcome, "thread"))
}
