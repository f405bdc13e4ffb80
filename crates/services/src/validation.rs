//! Input checks that run before any store access.

use domains::{DomainError, ReplyId, Result, ThreadId};

pub const MISSING_FIELDS: &str = "Missing required fields";

/// Fails with `Validation` if any field is empty. Whitespace counts as content.
pub fn require(fields: &[&str]) -> Result<()> {
    if fields.iter().any(|f| f.is_empty()) {
        return Err(DomainError::Validation(MISSING_FIELDS.to_string()));
    }
    Ok(())
}

pub fn thread_id(raw: &str) -> Result<ThreadId> {
    ThreadId::parse(raw)
}

pub fn reply_id(raw: &str) -> Result<ReplyId> {
    ReplyId::parse(raw)
}
