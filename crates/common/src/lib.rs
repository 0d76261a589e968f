//! Common utilities shared across connector crates.
//!
//! - **Configuration**: hierarchical dot-separated settings (`config`).
//! - **Resilience**: retry with exponential backoff (`retry`).
//! - **HTTP**: outbound client helpers (`http`).
//! - **Logging**: tracing subscriber setup (`logging`).
pub mod config;
pub mod http;
pub mod logging;
pub mod retry;

pub use crate::config::Config;
pub use crate::retry::{retry_async, RetrySettings};
