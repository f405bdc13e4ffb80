//! `/api/replies/{board}` handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use domains::{CreatedReply, ThreadWithReplies};

use super::dto::{DeleteReplyBody, NewReplyBody, ReplyRefBody, ThreadQuery};
use super::error::ApiError;
use super::extract::{field, Payload, QueryParams};
use super::{AppState, REPORTED};

/// GET `?thread_id=` - one thread with every reply.
pub async fn fetch(
    State(state): State<AppState>,
    Path(board): Path<String>,
    QueryParams(query): QueryParams<ThreadQuery>,
) -> Result<Json<ThreadWithReplies>, ApiError> {
    let thread = state
        .replies
        .fetch_with_replies(&board, field(&query.thread_id))
        .await?;
    Ok(Json(thread))
}

/// POST - reply to a thread and bump it.
pub async fn create(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(body): Payload<NewReplyBody>,
) -> Result<Json<CreatedReply>, ApiError> {
    let reply = state
        .replies
        .create(
            &board,
            field(&body.thread_id),
            field(&body.text),
            field(&body.delete_password),
        )
        .await?;
    Ok(Json(CreatedReply::from(&reply)))
}

/// PUT - flag a reply.
pub async fn report(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(body): Payload<ReplyRefBody>,
) -> Result<&'static str, ApiError> {
    state
        .replies
        .report(&board, field(&body.thread_id), field(&body.reply_id))
        .await?;
    Ok(REPORTED)
}

/// DELETE - redact a reply given its delete password.
pub async fn redact(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(body): Payload<DeleteReplyBody>,
) -> Result<&'static str, ApiError> {
    let outcome = state
        .replies
        .redact(
            &board,
            field(&body.thread_id),
            field(&body.reply_id),
            field(&body.delete_password),
        )
        .await?;
    Ok(state.delete_response(outcome, "reply"))
}
