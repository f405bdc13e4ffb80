//! The central domain types and port definitions for the message board.

pub mod error;
pub mod models;
pub mod projection;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use projection::*;
pub use traits::*;
