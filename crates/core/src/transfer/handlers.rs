use dsc_error::{ConnectorError, ErrorCode, ErrorContext, Result};
use dsc_spi::command::CommandHandler;
use dsc_spi::store::TransferProcessStore;
use dsc_spi::transfer::{CancelTransferCommand, TransferProcessCommand};
use dsc_spi::types::TransferProcess;
use std::sync::Arc;

/// The process-specific part of a [`TransferProcessCommandHandler`].
pub trait TransferProcessModifier: Send + Sync {
    type Command: TransferProcessCommand;

    /// Mutates the process; returns `true` when it must be persisted.
    fn modify(&self, process: &mut TransferProcess, command: &Self::Command) -> bool;
}

/// Loads the targeted process, applies the modifier and stores the result.
pub struct TransferProcessCommandHandler<M> {
    store: Arc<dyn TransferProcessStore>,
    modifier: M,
}

impl<M: TransferProcessModifier> TransferProcessCommandHandler<M> {
    pub fn with_modifier(store: Arc<dyn TransferProcessStore>, modifier: M) -> Self {
        Self { store, modifier }
    }
}

impl<M: TransferProcessModifier> CommandHandler<M::Command> for TransferProcessCommandHandler<M> {
    fn handle(&self, command: &M::Command) -> Result<()> {
        let id = command.transfer_process_id();
        let Some(mut process) = self.store.find(id) else {
            return Err(ConnectorError::new(
                ErrorCode::TransferProcessNotFound,
                format!("Could not find TransferProcess with ID [{}]", id),
            )
            .with_context(ErrorContext::ObjectNotFound {
                object_type: "TransferProcess".to_string(),
                id: id.to_string(),
            }));
        };

        if self.modifier.modify(&mut process, command) {
            self.store.update(process)?;
        }
        Ok(())
    }
}

pub struct CancelTransfer;

impl TransferProcessModifier for CancelTransfer {
    type Command = CancelTransferCommand;

    fn modify(&self, process: &mut TransferProcess, _command: &CancelTransferCommand) -> bool {
        process.transition_error("Cancelled");
        true
    }
}

pub type CancelTransferCommandHandler = TransferProcessCommandHandler<CancelTransfer>;

impl CancelTransferCommandHandler {
    pub fn new(store: Arc<dyn TransferProcessStore>) -> Self {
        Self::with_modifier(store, CancelTransfer)
    }
}
