//! # Domain Models
//!
//! These structs are the records a store persists for each board.
//! We use UUID v7 so ids are globally unique and ordered by creation time.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Result};

/// Text a reply carries once its author has deleted it.
pub const REDACTED_TEXT: &str = "[deleted]";

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Allocates a fresh, time-ordered id.
            pub fn generate() -> Self {
                Self(Uuid::now_v7())
            }

            /// Parses a client-supplied id, rejecting anything that is not a UUID.
            pub fn parse(raw: &str) -> Result<Self> {
                Uuid::parse_str(raw.trim())
                    .map(Self)
                    .map_err(|_| DomainError::InvalidIdentifier($field))
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`Thread`].
    ThreadId,
    "thread_id"
);
entity_id!(
    /// Identifier of a [`Reply`].
    ReplyId,
    "reply_id"
);

/// Returns true when `raw` would be accepted by `ThreadId::parse`/`ReplyId::parse`.
pub fn is_well_formed_id(raw: &str) -> bool {
    Uuid::parse_str(raw.trim()).is_ok()
}

/// A one-way hashed delete password in PHC string form.
///
/// Never compared for equality: checks go through a `CredentialGuard`.
#[derive(Clone)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// A conversation opener scoped to one board.
#[derive(Debug, Clone)]
pub struct Thread {
    pub id: ThreadId,
    /// Partition key; every lookup is scoped by it.
    pub board: String,
    pub text: String,
    pub created_on: DateTime<Utc>,
    /// Freshness sort key. Moves forward with every new reply.
    pub bumped_on: DateTime<Utc>,
    pub reported: bool,
    pub delete_password: PasswordDigest,
    /// Reply ids in insertion (chronological) order.
    pub replies: Vec<ReplyId>,
}

impl Thread {
    pub fn new(
        board: impl Into<String>,
        text: impl Into<String>,
        delete_password: PasswordDigest,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ThreadId::generate(),
            board: board.into(),
            text: text.into(),
            created_on: now,
            bumped_on: now,
            reported: false,
            delete_password,
            replies: Vec::new(),
        }
    }

    /// Appends a reply and bumps the thread to the reply's creation time.
    ///
    /// `bumped_on` never moves backwards, so a late-arriving older reply
    /// cannot un-bump a thread.
    pub fn attach_reply(&mut self, reply: ReplyId, created_on: DateTime<Utc>) {
        self.replies.push(reply);
        if created_on > self.bumped_on {
            self.bumped_on = created_on;
        }
    }
}

/// A response inside a thread.
#[derive(Debug, Clone)]
pub struct Reply {
    pub id: ReplyId,
    /// Back-reference to the owning thread. Not enforced by the store.
    pub thread: ThreadId,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub reported: bool,
    pub delete_password: PasswordDigest,
}

impl Reply {
    pub fn new(
        thread: ThreadId,
        text: impl Into<String>,
        delete_password: PasswordDigest,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReplyId::generate(),
            thread,
            text: text.into(),
            created_on: now,
            reported: false,
            delete_password,
        }
    }

    pub fn is_redacted(&self) -> bool {
        self.text == REDACTED_TEXT
    }
}

/// Result of a password-gated delete (thread removal or reply redaction).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    IncorrectPassword,
}
