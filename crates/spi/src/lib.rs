//! Service provider interfaces for the dataspace connector.
//!
//! Every pluggable component is a [`ServiceExtension`] that registers and
//! resolves services through the [`ServiceExtensionContext`]. The traits in
//! this crate are the seams between those components.
pub mod command;
pub mod context;
pub mod dataplane;
pub mod extension;
pub mod features;
pub mod health;
pub mod message;
pub mod security;
pub mod store;
pub mod transfer;
pub mod types;
pub mod validation;
pub mod web;

pub use context::ServiceExtensionContext;
pub use extension::{InjectionPoint, ServiceExtension};
