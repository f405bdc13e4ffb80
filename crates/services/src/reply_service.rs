//! # ReplyService
//!
//! Reads a thread with all its replies, and creates, reports and redacts
//! replies. A reply is never removed: deleting one replaces its text.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    CredentialGuard, DeleteOutcome, DomainError, Reply, ReplyRepository, Result,
    ThreadRepository, ThreadWithReplies, REDACTED_TEXT,
};
use tracing::{debug, info, warn};

use crate::thread_service::THREAD_NOT_FOUND;
use crate::validation;

const THREAD_NOT_ON_BOARD: &str = "No such thread exists in that board";
const REPLY_NOT_FOUND: &str = "No such reply exists in that thread";
const THREAD_OR_REPLY_NOT_FOUND: &str = "no such thread or reply exists";

#[derive(Clone)]
pub struct ReplyService {
    threads: Arc<dyn ThreadRepository>,
    replies: Arc<dyn ReplyRepository>,
    guard: Arc<dyn CredentialGuard>,
}

impl ReplyService {
    pub fn new(
        threads: Arc<dyn ThreadRepository>,
        replies: Arc<dyn ReplyRepository>,
        guard: Arc<dyn CredentialGuard>,
    ) -> Self {
        Self {
            threads,
            replies,
            guard,
        }
    }

    /// One thread with every reply it references, newest first.
    pub async fn fetch_with_replies(
        &self,
        board: &str,
        raw_thread_id: &str,
    ) -> Result<ThreadWithReplies> {
        let id = validation::thread_id(raw_thread_id)?;

        let thread = self
            .threads
            .find_thread(board, id)
            .await?
            .ok_or_else(|| DomainError::NotFound(THREAD_NOT_FOUND.to_string()))?;
        let replies = self.replies.replies_by_ids(&thread.replies, None).await?;

        debug!(board, thread_id = %id, replies = replies.len(), "fetched thread");
        Ok(ThreadWithReplies::project(&thread, &replies))
    }

    /// Posts a reply and bumps its thread.
    ///
    /// The reply insert and the thread update are two store operations; a
    /// thread deleted in between leaves the new reply orphaned.
    pub async fn create(
        &self,
        board: &str,
        raw_thread_id: &str,
        text: &str,
        raw_password: &str,
    ) -> Result<Reply> {
        validation::require(&[board, raw_thread_id, text, raw_password])?;
        let thread_id = validation::thread_id(raw_thread_id)?;

        let thread = self
            .threads
            .find_thread(board, thread_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(THREAD_NOT_FOUND.to_string()))?;

        let digest = self.guard.hash(raw_password).await?;
        let reply = Reply::new(thread.id, text, digest, Utc::now());
        self.replies.insert_reply(reply.clone()).await?;

        if !self
            .threads
            .attach_reply(thread.id, reply.id, reply.created_on)
            .await?
        {
            warn!(
                board,
                thread_id = %thread.id,
                reply_id = %reply.id,
                "thread vanished before reply was attached"
            );
            return Err(DomainError::NotFound(THREAD_NOT_FOUND.to_string()));
        }

        info!(board, thread_id = %thread.id, reply_id = %reply.id, "reply created");
        Ok(reply)
    }

    pub async fn report(&self, board: &str, raw_thread_id: &str, raw_reply_id: &str) -> Result<()> {
        let thread_id = validation::thread_id(raw_thread_id)?;
        let reply_id = validation::reply_id(raw_reply_id)?;

        if self.threads.find_thread(board, thread_id).await?.is_none() {
            return Err(DomainError::NotFound(THREAD_NOT_ON_BOARD.to_string()));
        }
        if !self.replies.report_reply(thread_id, reply_id).await? {
            return Err(DomainError::NotFound(REPLY_NOT_FOUND.to_string()));
        }

        info!(board, thread_id = %thread_id, reply_id = %reply_id, "reply reported");
        Ok(())
    }

    /// Replaces a reply's text with `[deleted]` if `raw_password` matches.
    /// Redacting an already redacted reply succeeds again.
    pub async fn redact(
        &self,
        board: &str,
        raw_thread_id: &str,
        raw_reply_id: &str,
        raw_password: &str,
    ) -> Result<DeleteOutcome> {
        let thread_id = validation::thread_id(raw_thread_id)?;
        let reply_id = validation::reply_id(raw_reply_id)?;
        validation::require(&[raw_password])?;

        let thread = self.threads.find_thread(board, thread_id).await?;
        let reply = self.replies.find_reply(thread_id, reply_id).await?;
        let reply = match (thread, reply) {
            (Some(_), Some(reply)) => reply,
            _ => return Err(DomainError::NotFound(THREAD_OR_REPLY_NOT_FOUND.to_string())),
        };

        if !self.guard.verify(raw_password, &reply.delete_password).await {
            warn!(
                board,
                thread_id = %thread_id,
                reply_id = %reply_id,
                "reply delete rejected: incorrect password"
            );
            return Ok(DeleteOutcome::IncorrectPassword);
        }

        if !self
            .replies
            .set_reply_text(thread_id, reply_id, REDACTED_TEXT)
            .await?
        {
            return Err(DomainError::NotFound(THREAD_OR_REPLY_NOT_FOUND.to_string()));
        }

        info!(board, thread_id = %thread_id, reply_id = %reply_id, "reply redacted");
        Ok(DeleteOutcome::Deleted)
    }
}
