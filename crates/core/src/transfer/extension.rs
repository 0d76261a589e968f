use super::handlers::CancelTransferCommandHandler;
use super::manager::{CommandQueueWorker, TransferProcessManagerImpl};
use crate::command::CommandHandlerRegistry;
use async_trait::async_trait;
use dsc_error::Result;
use dsc_spi::features;
use dsc_spi::store::TransferProcessStore;
use dsc_spi::transfer::{CancelTransferCommand, TransferProcessManager};
use dsc_spi::{InjectionPoint, ServiceExtension, ServiceExtensionContext};
use std::sync::Arc;

#[derive(Default)]
pub struct TransferCoreExtension {
    manager: Option<Arc<TransferProcessManagerImpl>>,
    worker: Option<CommandQueueWorker>,
}

impl TransferCoreExtension {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServiceExtension for TransferCoreExtension {
    fn name(&self) -> &str {
        "Core Transfer Services"
    }

    fn provides(&self) -> Vec<&'static str> {
        vec![
            features::TRANSFER_PROCESS_MANAGER,
            features::COMMAND_HANDLER_REGISTRY,
        ]
    }

    fn requires(&self) -> Vec<InjectionPoint> {
        vec![InjectionPoint::required(features::TRANSFER_PROCESS_STORE)]
    }

    fn initialize(&mut self, context: &mut ServiceExtensionContext) -> Result<()> {
        let store = context.get_service::<dyn TransferProcessStore>()?;

        let registry = Arc::new(CommandHandlerRegistry::new());
        registry.register::<CancelTransferCommand, _>(CancelTransferCommandHandler::new(
            store.clone(),
        ));
        context.register_service(registry.clone());

        let manager = Arc::new(TransferProcessManagerImpl::new(store, registry));
        context.register_service::<dyn TransferProcessManager>(manager.clone());
        self.manager = Some(manager);
        Ok(())
    }

    async fn start(&mut self) -> Result<()> {
        if let Some(manager) = &self.manager {
            self.worker = manager.start();
        }
        Ok(())
    }

    async fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.shutdown().await;
        }
    }
}
