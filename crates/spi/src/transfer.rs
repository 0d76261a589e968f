//! Transfer process management contracts.
use crate::command::Command;
use crate::types::DataRequest;
use dsc_error::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInitiateResult {
    pub process_id: String,
}

pub trait TransferProcessManager: Send + Sync {
    fn initiate_consumer_request(&self, data_request: DataRequest) -> Result<TransferInitiateResult>;

    fn initiate_provider_request(&self, data_request: DataRequest) -> Result<TransferInitiateResult>;

    /// Queues a command; commands are processed sequentially.
    fn enqueue_command(&self, command: Box<dyn Command>) -> Result<()>;
}

/// A command that targets a single transfer process.
pub trait TransferProcessCommand: Command {
    fn transfer_process_id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelTransferCommand {
    command_id: String,
    transfer_process_id: String,
}

impl CancelTransferCommand {
    pub fn new(transfer_process_id: impl Into<String>) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            transfer_process_id: transfer_process_id.into(),
        }
    }
}

impl Command for CancelTransferCommand {
    fn command_id(&self) -> &str {
        &self.command_id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl TransferProcessCommand for CancelTransferCommand {
    fn transfer_process_id(&self) -> &str {
        &self.transfer_process_id
    }
}
