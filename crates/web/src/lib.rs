//! HTTP hosting for connector APIs.
//!
//! Every API registers its routers under a context alias. Each alias maps to
//! a port and a base path through `web.http.<alias>.port|path` settings.
pub mod cors;
pub mod error;
pub mod extension;
pub mod port_mapping;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use extension::WebServerExtension;
pub use port_mapping::{context_alias_or_default, PortMapping, WebServerConfiguration};
pub use server::WebServer;
