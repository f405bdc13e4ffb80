//! # Core Traits (Ports)
//!
//! Any storage or credential adapter must implement these traits to be wired
//! into the services.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{PasswordDigest, Reply, ReplyId, Thread, ThreadId};

/// Persistence contract for threads.
///
/// Every lookup except `attach_reply` is scoped by board: a thread id that
/// exists on another board is "not found".
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    async fn insert_thread(&self, thread: Thread) -> Result<()>;

    async fn find_thread(&self, board: &str, id: ThreadId) -> Result<Option<Thread>>;

    /// Threads of `board`, freshest `bumped_on` first (ties: newest id first),
    /// at most `limit` of them.
    async fn list_threads(&self, board: &str, limit: usize) -> Result<Vec<Thread>>;

    /// Sets `reported`. Returns false when nothing matched.
    async fn report_thread(&self, board: &str, id: ThreadId) -> Result<bool>;

    /// Removes the thread record only; its replies stay behind.
    async fn delete_thread(&self, board: &str, id: ThreadId) -> Result<bool>;

    /// Appends `reply` to the thread's reply list and moves `bumped_on`
    /// forward to `created_on`, as one store operation.
    async fn attach_reply(
        &self,
        id: ThreadId,
        reply: ReplyId,
        created_on: DateTime<Utc>,
    ) -> Result<bool>;
}

/// Persistence contract for replies.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReplyRepository: Send + Sync {
    async fn insert_reply(&self, reply: Reply) -> Result<()>;

    async fn find_reply(&self, thread: ThreadId, id: ReplyId) -> Result<Option<Reply>>;

    /// Follows a thread's reply references: the replies among `ids` that
    /// still exist, newest `created_on` first, capped at `limit` when given.
    async fn replies_by_ids(&self, ids: &[ReplyId], limit: Option<usize>) -> Result<Vec<Reply>>;

    async fn report_reply(&self, thread: ThreadId, id: ReplyId) -> Result<bool>;

    async fn set_reply_text(&self, thread: ThreadId, id: ReplyId, text: &str) -> Result<bool>;
}

/// Hash-on-write, verify-on-delete contract for per-entity delete passwords.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CredentialGuard: Send + Sync {
    /// Salted, slow, one-way digest of `raw`.
    async fn hash(&self, raw: &str) -> Result<PasswordDigest>;

    /// Runs the full hash-and-compare. A mismatch is `false`, never an error.
    async fn verify(&self, raw: &str, digest: &PasswordDigest) -> bool;
}
