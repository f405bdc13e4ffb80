//! # ThreadService
//!
//! Lists, creates, reports and deletes threads on a board.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    CredentialGuard, DeleteOutcome, DomainError, ReplyRepository, Result, Thread,
    ThreadRepository, ThreadWithReplies,
};
use tracing::{debug, info, warn};

use crate::validation;

/// Board index cap.
pub const RECENT_THREADS_LIMIT: usize = 10;
/// Reply previews shown per thread on the board index.
pub const PREVIEW_REPLIES_LIMIT: usize = 3;

pub(crate) const THREAD_NOT_FOUND: &str = "No such thread exists on this board";

/// Caps applied by [`ThreadService::list_recent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: usize,
    pub reply_limit: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: RECENT_THREADS_LIMIT,
            reply_limit: PREVIEW_REPLIES_LIMIT,
        }
    }
}

#[derive(Clone)]
pub struct ThreadService {
    threads: Arc<dyn ThreadRepository>,
    replies: Arc<dyn ReplyRepository>,
    guard: Arc<dyn CredentialGuard>,
}

impl ThreadService {
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

    /// Freshest threads of a board, each with its newest replies as previews.
    pub async fn list_recent(
        &self,
        board: &str,
        options: ListOptions,
    ) -> Result<Vec<ThreadWithReplies>> {
        let threads = self.threads.list_threads(board, options.limit).await?;

        let mut views = Vec::with_capacity(threads.len());
        for thread in &threads {
            let previews = self
                .replies
                .replies_by_ids(&thread.replies, Some(options.reply_limit))
                .await?;
            views.push(ThreadWithReplies::project(thread, &previews));
        }

        debug!(board, count = views.len(), "listed recent threads");
        Ok(views)
    }

    pub async fn create(&self, board: &str, text: &str, raw_password: &str) -> Result<Thread> {
        validation::require(&[board, text, raw_password])?;

        let digest = self.guard.hash(raw_password).await?;
        let thread = Thread::new(board, text, digest, Utc::now());
        self.threads.insert_thread(thread.clone()).await?;

        info!(board, thread_id = %thread.id, "thread created");
        Ok(thread)
    }

    /// Flags a thread for moderation. Reporting twice is harmless.
    pub async fn report(&self, board: &str, raw_thread_id: &str) -> Result<()> {
        let id = validation::thread_id(raw_thread_id)?;

        if !self.threads.report_thread(board, id).await? {
            return Err(DomainError::NotFound(THREAD_NOT_FOUND.to_string()));
        }

        info!(board, thread_id = %id, "thread reported");
        Ok(())
    }

    /// Removes a thread if `raw_password` matches its delete password.
    ///
    /// Replies are left in place.
    pub async fn delete(
        &self,
        board: &str,
        raw_thread_id: &str,
        raw_password: &str,
    ) -> Result<DeleteOutcome> {
        let id = validation::thread_id(raw_thread_id)?;
        validation::require(&[raw_password])?;

        let thread = self
            .threads
            .find_thread(board, id)
            .await?
            .ok_or_else(|| DomainError::NotFound(THREAD_NOT_FOUND.to_string()))?;

        if !self.guard.verify(raw_password, &thread.delete_password).await {
            warn!(board, thread_id = %id, "thread delete rejected: incorrect password");
            return Ok(DeleteOutcome::IncorrectPassword);
        }

        // Someone else may have deleted it between the lookup and now.
        if !self.threads.delete_thread(board, id).await? {
            return Err(DomainError::NotFound(THREAD_NOT_FOUND.to_string()));
        }

        info!(board, thread_id = %id, "thread deleted");
        Ok(DeleteOutcome::Deleted)
    }
}
