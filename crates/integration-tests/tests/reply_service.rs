//! ReplyService over the in-memory store with real Argon2 hashing.

use std::sync::Arc;

use domains::{DeleteOutcome, DomainError, ReplyId, ThreadId, REDACTED_TEXT};
use integration_tests::{Harness, BOARD, PASSWORD};
use services::ListOptions;

#[tokio::test]
async fn reply_bumps_thread_to_its_own_timestamp() {
    let h = Harness::new();
    let thread = h.thread("op").await;
    let reply = h.reply(&thread, "hello").await;

    assert_eq!(reply.thread, thread.id);
    assert!(!reply.reported);
    assert!(reply.created_on >= thread.created_on);

    let view = h
        .replies
        .fetch_with_replies(BOARD, &thread.id.to_string())
        .await
        .unwrap();
    assert_eq!(view.bumped_on, reply.created_on);
    assert_eq!(view.created_on, thread.created_on);
    assert_eq!(view.replies.len(), 1);
    assert_eq!(view.replies[0].id, reply.id);
}

#[tokio::test]
async fn reply_to_unknown_or_foreign_thread_fails() {
    let h = Harness::new();
    let err = h
        .replies
        .create(BOARD, &ThreadId::generate().to_string(), "hi", PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    let thread = h.thread("op").await;
    let err = h
        .replies
        .create("elsewhere", &thread.id.to_string(), "hi", PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
    assert!(h.store.replies_of(thread.id).is_empty());
}

#[tokio::test]
async fn reply_create_validates_fields_first() {
    let h = Harness::new();
    let thread = h.thread("op").await;

    let err = h
        .replies
        .create(BOARD, &thread.id.to_string(), "", PASSWORD)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Validation("Missing required fields".into()));

    let err = h.replies.create(BOARD, "zzz", "hi", PASSWORD).await.unwrap_err();
    assert_eq!(err, DomainError::InvalidIdentifier("thread_id"));
}

#[tokio::test]
async fn full_fetch_returns_every_reply_newest_first() {
    let h = Harness::new();
    let thread = h.thread("op").await;
    for i in 0..6 {
        h.reply(&thread, &format!("r{i}")).await;
    }

    let view = h
        .replies
        .fetch_with_replies(BOARD, &thread.id.to_string())
        .await
        .unwrap();
    let texts: Vec<&str> = view.replies.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, ["r5", "r4", "r3", "r2", "r1", "r0"]);
}

#[tokio::test]
async fn report_reply_is_idempotent_and_scoped() {
    let h = Harness::new();
    let thread = h.thread("op").await;
    let reply = h.reply(&thread, "r").await;
    let (tid, rid) = (thread.id.to_string(), reply.id.to_string());

    h.replies.report(BOARD, &tid, &rid).await.unwrap();
    h.replies.report(BOARD, &tid, &rid).await.unwrap();
    assert!(h.store.replies_of(thread.id)[0].reported);

    let err = h
        .replies
        .report(BOARD, &tid, &ReplyId::generate().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn redact_keeps_reply_and_replaces_text() {
    let h = Harness::new();
    let thread = h.thread("op").await;
    let reply = h.reply(&thread, "secret").await;
    let (tid, rid) = (thread.id.to_string(), reply.id.to_string());

    let outcome = h.replies.redact(BOARD, &tid, &rid, "guess").await.unwrap();
    assert_eq!(outcome, DeleteOutcome::IncorrectPassword);
    assert_eq!(h.store.replies_of(thread.id)[0].text, "secret");

    for _ in 0..2 {
        let outcome = h.replies.redact(BOARD, &tid, &rid, PASSWORD).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
    }

    let view = h.replies.fetch_with_replies(BOARD, &tid).await.unwrap();
    assert_eq!(view.replies.len(), 1);
    assert_eq!(view.replies[0].text, REDACTED_TEXT);
    assert!(h.store.replies_of(thread.id)[0].is_redacted());
}

#[tokio::test]
async fn redact_needs_the_reply_in_that_thread() {
    let h = Harness::new();
    let a = h.thread("a").await;
    let b = h.thread("b").await;
    let reply = h.reply(&a, "in a").await;

    let err = h
        .replies
        .redact(BOARD, &b.id.to_string(), &reply.id.to_string(), PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn concurrent_replies_all_attach() {
    let h = Arc::new(Harness::new());
    let thread = h.thread("hot").await;

    let mut tasks = Vec::new();
    for i in 0..8 {
        let h = h.clone();
        let thread = thread.clone();
        tasks.push(tokio::spawn(async move {
            h.reply(&thread, &format!("r{i}")).await
        }));
    }
    let mut latest = thread.created_on;
    for task in tasks {
        latest = latest.max(task.await.unwrap().created_on);
    }

    let view = h
        .replies
        .fetch_with_replies(BOARD, &thread.id.to_string())
        .await
        .unwrap();
    assert_eq!(view.replies.len(), 8);
    assert_eq!(view.bumped_on, latest);

    let listed = h.threads.list_recent(BOARD, ListOptions::default()).await.unwrap();
    assert_eq!(listed[0].replies.len(), 3);
}
