use crate::{
    CriterionToPredicateConverter, InMemoryAssetLoader, InMemoryContractDefinitionStore,
    InMemoryContractNegotiationStore, InMemoryNodeDirectory, InMemoryTransferProcessStore,
};
use async_trait::async_trait;
use dsc_error::Result;
use dsc_spi::features;
use dsc_spi::store::{
    AssetIndex, AssetLoader, ContractDefinitionStore, ContractNegotiationStore,
    DataAddressResolver, FederatedCacheNodeDirectory, TransferProcessStore,
};
use dsc_spi::{ServiceExtension, ServiceExtensionContext};
use std::sync::Arc;

/// Registers in-memory implementations of every store.
pub struct InMemoryStoresExtension {
    node_directory: bool,
}

impl Default for InMemoryStoresExtension {
    fn default() -> Self {
        Self {
            node_directory: true,
        }
    }
}

impl InMemoryStoresExtension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaves the node directory to another extension.
    pub fn without_node_directory(mut self) -> Self {
        self.node_directory = false;
        self
    }
}

#[async_trait]
impl ServiceExtension for InMemoryStoresExtension {
    fn name(&self) -> &str {
        "In-Memory Stores"
    }

    fn provides(&self) -> Vec<&'static str> {
        let mut provided = vec![
            features::ASSET_INDEX,
            features::CONTRACT_DEFINITION_STORE,
            features::CONTRACT_NEGOTIATION_STORE,
            features::TRANSFER_PROCESS_STORE,
        ];
        if self.node_directory {
            provided.push(features::NODE_DIRECTORY);
        }
        provided
    }

    fn initialize(&mut self, context: &mut ServiceExtensionContext) -> Result<()> {
        let loader = Arc::new(InMemoryAssetLoader::new(CriterionToPredicateConverter::new()));
        context.register_service::<dyn AssetIndex>(loader.clone());
        context.register_service::<dyn DataAddressResolver>(loader.clone());
        context.register_service::<dyn AssetLoader>(loader);

        context.register_service::<dyn ContractDefinitionStore>(Arc::new(
            InMemoryContractDefinitionStore::new(),
        ));
        context.register_service::<dyn ContractNegotiationStore>(Arc::new(
            InMemoryContractNegotiationStore::new(),
        ));
        context.register_service::<dyn TransferProcessStore>(Arc::new(
            InMemoryTransferProcessStore::new(),
        ));
        if self.node_directory {
            context.register_service::<dyn FederatedCacheNodeDirectory>(Arc::new(
                InMemoryNodeDirectory::new(),
            ));
        }
        tracing::debug!(node_directory = self.node_directory, "In-memory stores registered");
        Ok(())
    }
}
