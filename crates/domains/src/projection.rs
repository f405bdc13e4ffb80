//! # Projections
//!
//! Field-visibility shapes returned to clients. Records are never serialized
//! directly; each endpoint picks one of these views so the credential digest
//! can never leak.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Reply, ReplyId, Thread, ThreadId};

/// A reply as shown inside a thread: no `reported`, no password, no back-reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyPreview {
    #[serde(rename = "_id")]
    pub id: ReplyId,
    pub text: String,
    pub created_on: DateTime<Utc>,
}

impl From<&Reply> for ReplyPreview {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id,
            text: reply.text.clone(),
            created_on: reply.created_on,
        }
    }
}

/// A thread with its (possibly capped) replies populated.
///
/// Strips `reported`, `delete_password` and `board`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadWithReplies {
    #[serde(rename = "_id")]
    pub id: ThreadId,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub bumped_on: DateTime<Utc>,
    pub replies: Vec<ReplyPreview>,
}

impl ThreadWithReplies {
    /// Builds the view from a thread and the replies already fetched for it.
    /// `replies` must arrive in the order they should be shown.
    pub fn project(thread: &Thread, replies: &[Reply]) -> Self {
        Self {
            id: thread.id,
            text: thread.text.clone(),
            created_on: thread.created_on,
            bumped_on: thread.bumped_on,
            replies: replies.iter().map(ReplyPreview::from).collect(),
        }
    }
}

/// Response body for a freshly created thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedThread {
    #[serde(rename = "_id")]
    pub id: ThreadId,
    pub board: String,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub bumped_on: DateTime<Utc>,
    pub reported: bool,
    pub replies: Vec<ReplyId>,
}

impl From<&Thread> for CreatedThread {
    fn from(thread: &Thread) -> Self {
        Self {
            id: thread.id,
            board: thread.board.clone(),
            text: thread.text.clone(),
            created_on: thread.created_on,
            bumped_on: thread.bumped_on,
            reported: thread.reported,
            replies: thread.replies.clone(),
        }
    }
}

/// Response body for a freshly created reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedReply {
    #[serde(rename = "_id")]
    pub id: ReplyId,
    pub thread: ThreadId,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub reported: bool,
}

impl From<&Reply> for CreatedReply {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id,
            thread: reply.thread,
            text: reply.text.clone(),
            created_on: reply.created_on,
            reported: reply.reported,
        }
    }
}
