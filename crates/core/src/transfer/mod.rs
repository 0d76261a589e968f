//! Transfer process management: command handlers, the process manager and
//! the extension that wires them together.
pub mod extension;
pub mod handlers;
pub mod manager;

pub use extension::TransferCoreExtension;
pub use handlers::{CancelTransferCommandHandler, TransferProcessCommandHandler};
pub use manager::{CommandQueueWorker, TransferProcessManagerImpl};
