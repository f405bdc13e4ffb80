//! # auth-adapters
//!
//! Argon2-based implementation of `CredentialGuard`.
//! Delete passwords are a possession check, not an identity: there are no
//! accounts and no sessions, only a digest stored next to each thread/reply.

mod argon2_guard;

pub use argon2_guard::Argon2Guard;
