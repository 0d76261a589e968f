//! Connector core: extension runtime and built-in services.
//!
//! ```text
//! BaseRuntime ──> ExtensionLoader ──> ServiceExtension (sorted by features)
//!      │                                   │
//!      └── ServiceExtensionContext <───────┘ register/get services
//! ```
//!
//! [`CoreServicesExtension`] is always booted first and provides retry
//! settings, the HTTP client, health checks and the message dispatcher
//! registry. [`transfer::TransferCoreExtension`] adds the transfer process
//! manager on top of a transfer process store.
pub mod command;
pub mod dispatcher;
pub mod health;
pub mod loader;
pub mod runtime;
pub mod services;
pub mod transfer;
pub mod vault;

pub use command::CommandHandlerRegistry;
pub use health::HealthCheckServiceImpl;
pub use loader::ExtensionLoader;
pub use runtime::{BaseRuntime, BaseRuntimeBuilder, RunningRuntime};
pub use services::CoreServicesExtension;
pub use vault::InMemoryVault;
