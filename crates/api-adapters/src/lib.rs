//! # api-adapters
//!
//! The web routing layer for the message board. Handlers only translate
//! between HTTP and the services; all rules live in `services`.

pub mod metrics;
#[cfg(feature = "web-axum")]
pub mod web;
