//! # storage-adapters
//!
//! Implementations of the `ThreadRepository` and `ReplyRepository` ports.
//! The in-memory store is always compiled; Postgres sits behind `db-postgres`.

pub mod memory;
#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::MemoryStore;
#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;
