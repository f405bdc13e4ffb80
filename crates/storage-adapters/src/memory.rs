//! # MemoryStore
//!
//! Process-local implementation of both repositories, backed by `DashMap`.
//! Each mutation runs under the shard lock of the entry it touches, so a
//! reply attach is atomic with respect to other attaches on the same thread.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use domains::{Reply, ReplyId, ReplyRepository, Result, Thread, ThreadId, ThreadRepository};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    threads: Arc<DashMap<ThreadId, Thread>>,
    replies: Arc<DashMap<ReplyId, Reply>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies still stored for `thread`, including ones whose thread is gone.
    pub fn replies_of(&self, thread: ThreadId) -> Vec<Reply> {
        self.replies
            .iter()
            .filter(|r| r.thread == thread)
            .map(|r| r.value().clone())
            .collect()
    }
}

#[async_trait]
impl ThreadRepository for MemoryStore {
    async fn insert_thread(&self, thread: Thread) -> Result<()> {
        self.threads.insert(thread.id, thread);
        Ok(())
    }

    async fn find_thread(&self, board: &str, id: ThreadId) -> Result<Option<Thread>> {
        Ok(self
            .threads
            .get(&id)
            .filter(|t| t.board == board)
            .map(|t| t.value().clone()))
    }

    async fn list_threads(&self, board: &str, limit: usize) -> Result<Vec<Thread>> {
        let mut threads: Vec<Thread> = self
            .threads
            .iter()
            .filter(|t| t.board == board)
            .map(|t| t.value().clone())
            .collect();
        threads.sort_by_key(|t| Reverse((t.bumped_on, t.id)));
        threads.truncate(limit);
        Ok(threads)
    }

    async fn report_thread(&self, board: &str, id: ThreadId) -> Result<bool> {
        match self.threads.get_mut(&id) {
            Some(mut thread) if thread.board == board => {
                thread.reported = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_thread(&self, board: &str, id: ThreadId) -> Result<bool> {
        Ok(self
            .threads
            .remove_if(&id, |_, thread| thread.board == board)
            .is_some())
    }

    async fn attach_reply(
        &self,
        id: ThreadId,
        reply: ReplyId,
        created_on: DateTime<Utc>,
    ) -> Result<bool> {
        match self.threads.get_mut(&id) {
            Some(mut thread) => {
                thread.attach_reply(reply, created_on);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ReplyRepository for MemoryStore {
    async fn insert_reply(&self, reply: Reply) -> Result<()> {
        self.replies.insert(reply.id, reply);
        Ok(())
    }

    async fn find_reply(&self, thread: ThreadId, id: ReplyId) -> Result<Option<Reply>> {
        Ok(self
            .replies
            .get(&id)
            .filter(|r| r.thread == thread)
            .map(|r| r.value().clone()))
    }

    async fn replies_by_ids(&self, ids: &[ReplyId], limit: Option<usize>) -> Result<Vec<Reply>> {
        let mut replies: Vec<Reply> = ids
            .iter()
            .filter_map(|id| self.replies.get(id).map(|r| r.value().clone()))
            .collect();
        replies.sort_by_key(|r| Reverse((r.created_on, r.id)));
        if let Some(limit) = limit {
            replies.truncate(limit);
        }
        Ok(replies)
    }

    async fn report_reply(&self, thread: ThreadId, id: ReplyId) -> Result<bool> {
        match self.replies.get_mut(&id) {
            Some(mut reply) if reply.thread == thread => {
                reply.reported = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_reply_text(&self, thread: ThreadId, id: ReplyId, text: &str) -> Result<bool> {
        match self.replies.get_mut(&id) {
            Some(mut reply) if reply.thread == thread => {
                reply.text = text.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domains::PasswordDigest;

    fn thread(board: &str, bumped_on: DateTime<Utc>) -> Thread {
        Thread::new(board, "text", PasswordDigest::new("d"), bumped_on)
    }

    #[tokio::test]
    async fn list_is_scoped_sorted_and_capped() {
        let store = MemoryStore::new();
        let base = Utc::now();
        for i in 0..12 {
            store
                .insert_thread(thread("b", base + Duration::seconds(i)))
                .await
                .unwrap();
        }
        store
            .insert_thread(thread("other", base + Duration::hours(1)))
            .await
            .unwrap();

        let listed = store.list_threads("b", 10).await.unwrap();
        assert_eq!(listed.len(), 10);
        assert!(listed.iter().all(|t| t.board == "b"));
        assert!(listed.windows(2).all(|w| w[0].bumped_on >= w[1].bumped_on));
        assert_eq!(listed[0].bumped_on, base + Duration::seconds(11));
    }

    #[tokio::test]
    async fn ties_break_on_id() {
        let store = MemoryStore::new();
        let at = Utc::now();
        let older = thread("b", at);
        let newer = thread("b", at);
        store.insert_thread(older.clone()).await.unwrap();
        store.insert_thread(newer.clone()).await.unwrap();

        let listed = store.list_threads("b", 10).await.unwrap();
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[tokio::test]
    async fn lookups_respect_board_and_report_sets_flag() {
        let store = MemoryStore::new();
        let t = thread("b", Utc::now());
        store.insert_thread(t.clone()).await.unwrap();

        assert!(store.find_thread("c", t.id).await.unwrap().is_none());
        assert!(!store.report_thread("c", t.id).await.unwrap());
        assert!(!store.delete_thread("c", t.id).await.unwrap());
        assert!(!store.find_thread("b", t.id).await.unwrap().unwrap().reported);

        for _ in 0..2 {
            assert!(store.report_thread("b", t.id).await.unwrap());
            assert!(store.find_thread("b", t.id).await.unwrap().unwrap().reported);
        }
    }

    #[tokio::test]
    async fn deleting_thread_orphans_replies() {
        let store = MemoryStore::new();
        let t = thread("b", Utc::now());
        store.insert_thread(t.clone()).await.unwrap();
        let reply = Reply::new(t.id, "r", PasswordDigest::new("d"), Utc::now());
        store.insert_reply(reply.clone()).await.unwrap();
        store.attach_reply(t.id, reply.id, reply.created_on).await.unwrap();

        assert!(store.delete_thread("b", t.id).await.unwrap());
        assert!(store.find_thread("b", t.id).await.unwrap().is_none());
        assert_eq!(store.replies_of(t.id).len(), 1);
        assert!(!store.attach_reply(t.id, ReplyId::generate(), Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn replies_follow_references_newest_first() {
        let store = MemoryStore::new();
        let t = ThreadId::generate();
        let base = Utc::now();
        let mut ids = Vec::new();
        for i in 0..5 {
            let created_on = base + Duration::seconds(i);
            let r = Reply::new(t, format!("r{i}"), PasswordDigest::new("d"), created_on);
            ids.push(r.id);
            store.insert_reply(r).await.unwrap();
        }
        // A reply of the same thread that the thread never referenced.
        store
            .insert_reply(Reply::new(
                t,
                "stray",
                PasswordDigest::new("d"),
                base + Duration::hours(1),
            ))
            .await
            .unwrap();

        let capped = store.replies_by_ids(&ids, Some(3)).await.unwrap();
        let texts: Vec<_> = capped.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["r4", "r3", "r2"]);

        let all = store.replies_by_ids(&ids, None).await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn reply_mutations_require_matching_thread() {
        let store = MemoryStore::new();
        let t = ThreadId::generate();
        let r = Reply::new(t, "r", PasswordDigest::new("d"), Utc::now());
        store.insert_reply(r.clone()).await.unwrap();

        let elsewhere = ThreadId::generate();
        assert!(!store.report_reply(elsewhere, r.id).await.unwrap());
        assert!(!store.set_reply_text(elsewhere, r.id, "x").await.unwrap());
        assert!(store.find_reply(elsewhere, r.id).await.unwrap().is_none());

        assert!(store.report_reply(t, r.id).await.unwrap());
        assert!(store.set_reply_text(t, r.id, "[deleted]").await.unwrap());
        let stored = store.find_reply(t, r.id).await.unwrap().unwrap();
        assert!(stored.reported);
        assert_eq!(stored.text, "[deleted]");
        assert_eq!(stored.created_on, r.created_on);
    }

    #[tokio::test]
    async fn concurrent_attaches_keep_every_reply() {
        let store = MemoryStore::new();
        let t = thread("b", Utc::now());
        store.insert_thread(t.clone()).await.unwrap();

        let id = t.id;
        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.attach_reply(id, ReplyId::generate(), Utc::now()).await
            }));
        }
        for h in handles {
            assert!(h.await.unwrap().unwrap());
        }

        let stored = store.find_thread("b", t.id).await.unwrap().unwrap();
        assert_eq!(stored.replies.len(), 32);
    }
}
