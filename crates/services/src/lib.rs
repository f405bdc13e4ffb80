//! # services
//!
//! Board use cases on top of the `domains` ports. Every operation validates
//! its input before touching a store, and checks a delete password only once
//! the target is known to exist.

pub mod reply_service;
pub mod thread_service;
pub mod validation;

pub use reply_service::ReplyService;
pub use thread_service::{ListOptions, ThreadService, PREVIEW_REPLIES_LIMIT, RECENT_THREADS_LIMIT};
