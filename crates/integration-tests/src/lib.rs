//! Shared fixtures for the cross-crate tests: real services wired over the
//! in-memory store and a cheap Argon2 guard.

use std::sync::Arc;

use argon2::Params;
use auth_adapters::Argon2Guard;
use domains::{Reply, Thread};
use services::{ReplyService, ThreadService};
use storage_adapters::MemoryStore;

pub const BOARD: &str = "b1";
pub const PASSWORD: &str = "pw";

/// Services and the store they share.
pub struct Harness {
    pub store: MemoryStore,
    pub threads: ThreadService,
    pub replies: ReplyService,
}

impl Harness {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let shared = Arc::new(store.clone());
        let guard = Arc::new(cheap_guard());
        Self {
            threads: ThreadService::new(shared.clone(), shared.clone(), guard.clone()),
            replies: ReplyService::new(shared.clone(), shared, guard),
            store,
        }
    }

    #[cfg(feature = "web-axum")]
    pub fn router(&self) -> axum::Router {
        use api_adapters::web::{router, AppState};

        router(
            AppState::new(self.threads.clone(), self.replies.clone()),
            &[],
        )
    }

    pub async fn thread(&self, text: &str) -> Thread {
        self.threads.create(BOARD, text, PASSWORD).await.unwrap()
    }

    pub async fn reply(&self, thread: &Thread, text: &str) -> Reply {
        self.replies
            .create(BOARD, &thread.id.to_string(), text, PASSWORD)
            .await
            .unwrap()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Argon2id with the smallest cost the crate accepts.
pub fn cheap_guard() -> Argon2Guard {
    Argon2Guard::with_params(Params::new(1024, 1, 1, None).unwrap())
}
