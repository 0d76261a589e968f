use crate::command::CommandHandlerRegistry;
use dsc_error::{ConnectorError, Result};
use dsc_spi::command::Command;
use dsc_spi::store::TransferProcessStore;
use dsc_spi::transfer::{TransferInitiateResult, TransferProcessManager};
use dsc_spi::types::{DataRequest, TransferProcess, TransferProcessKind};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Creates transfer processes and feeds queued commands to a single worker.
pub struct TransferProcessManagerImpl {
    store: Arc<dyn TransferProcessStore>,
    registry: Arc<CommandHandlerRegistry>,
    command_tx: mpsc::UnboundedSender<Box<dyn Command>>,
    command_rx: Mutex<Option<mpsc::UnboundedReceiver<Box<dyn Command>>>>,
    initiation: Mutex<()>,
}

impl TransferProcessManagerImpl {
    pub fn new(
        store: Arc<dyn TransferProcessStore>,
        registry: Arc<CommandHandlerRegistry>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        Self {
            store,
            registry,
            command_tx,
            command_rx: Mutex::new(Some(command_rx)),
            initiation: Mutex::new(()),
        }
    }

    /// Spawns the command worker. Commands enqueued earlier are processed
    /// first. Returns `None` if the worker was already started.
    pub fn start(&self) -> Option<CommandQueueWorker> {
        let mut command_rx = self
            .command_rx
            .lock()
            .expect("command queue lock poisoned")
            .take()?;
        let registry = Arc::clone(&self.registry);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => {
                        debug!("Command queue worker stopped");
                        return;
                    }
                    next = command_rx.recv() => {
                        let Some(command) = next else { return };
                        if let Err(e) = registry.dispatch(command.as_ref()) {
                            error!(
                                command_id = command.command_id(),
                                error = %e,
                                "Command failed"
                            );
                        }
                    }
                }
            }
        });

        Some(CommandQueueWorker {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    fn initiate(
        &self,
        mut data_request: DataRequest,
        kind: TransferProcessKind,
    ) -> Result<TransferInitiateResult> {
        let _guard = self.initiation.lock().expect("initiation lock poisoned");

        if let Some(process_id) = self.store.process_id_for_transfer_id(&data_request.id) {
            debug!(
                request_id = %data_request.id,
                process_id = %process_id,
                "Transfer process already exists for request"
            );
            return Ok(TransferInitiateResult { process_id });
        }

        let process_id = uuid::Uuid::new_v4().to_string();
        data_request.process_id = Some(process_id.clone());
        let request_id = data_request.id.clone();

        let mut process = TransferProcess::new(process_id.clone(), kind, Some(data_request));
        process.transition_initial()?;
        self.store.create(process)?;

        info!(
            request_id = %request_id,
            process_id = %process_id,
            kind = ?kind,
            "Transfer process initiated"
        );
        Ok(TransferInitiateResult { process_id })
    }
}

impl TransferProcessManager for TransferProcessManagerImpl {
    fn initiate_consumer_request(&self, data_request: DataRequest) -> Result<TransferInitiateResult> {
        self.initiate(data_request, TransferProcessKind::Consumer)
    }

    fn initiate_provider_request(&self, data_request: DataRequest) -> Result<TransferInitiateResult> {
        self.initiate(data_request, TransferProcessKind::Provider)
    }

    fn enqueue_command(&self, command: Box<dyn Command>) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| ConnectorError::internal("Command queue is closed"))
    }
}

/// Handle to the command worker task.
#[derive(Debug)]
pub struct CommandQueueWorker {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl CommandQueueWorker {
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "Command queue worker failed during shutdown");
            }
        }
    }
}

impl Drop for CommandQueueWorker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::CancelTransferCommandHandler;
    use dsc_spi::transfer::CancelTransferCommand;
    use dsc_spi::types::{DataAddress, TransferProcessStates};
    use dsc_stores::InMemoryTransferProcessStore;
    use std::time::Duration;

    fn manager() -> (Arc<InMemoryTransferProcessStore>, TransferProcessManagerImpl) {
        let store = Arc::new(InMemoryTransferProcessStore::new());
        let registry = Arc::new(CommandHandlerRegistry::new());
        registry
            .register::<CancelTransferCommand, _>(CancelTransferCommandHandler::new(store.clone()));
        let manager = TransferProcessManagerImpl::new(store.clone(), registry);
        (store, manager)
    }

    fn request(id: &str) -> DataRequest {
        DataRequest::new(id, "asset-1", DataAddress::new("file"))
    }

    #[test]
    fn test_initiate_creates_initial_process() {
        let (store, manager) = manager();
        let result = manager.initiate_consumer_request(request("req-1")).unwrap();

        let process = store.find(&result.process_id).unwrap();
        assert_eq!(process.current_state(), Some(TransferProcessStates::Initial));
        assert_eq!(process.kind, TransferProcessKind::Consumer);
        assert_eq!(
            process.data_request.unwrap().process_id.as_deref(),
            Some(result.process_id.as_str())
        );
    }

    #[test]
    fn test_initiate_is_idempotent_per_request() {
        let (_store, manager) = manager();
        let first = manager.initiate_provider_request(request("req-1")).unwrap();
        let second = manager.initiate_provider_request(request("req-1")).unwrap();
        assert_eq!(first, second);

        let other = manager.initiate_provider_request(request("req-2")).unwrap();
        assert_ne!(first, other);
    }

    #[tokio::test]
    async fn test_enqueued_commands_are_processed() {
        let (store, manager) = manager();
        let process_id = manager
            .initiate_provider_request(request("req-1"))
            .unwrap()
            .process_id;

        // queued before the worker runs
        manager
            .enqueue_command(Box::new(CancelTransferCommand::new(&process_id)))
            .unwrap();
        manager
            .enqueue_command(Box::new(CancelTransferCommand::new("missing")))
            .unwrap();

        let worker = manager.start().unwrap();
        assert!(manager.start().is_none());

        let mut state = None;
        for _ in 0..50 {
            state = store.find(&process_id).and_then(|p| p.current_state());
            if state == Some(TransferProcessStates::Error) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(state, Some(TransferProcessStates::Error));

        worker.shutdown().await;
    }
}
