//! Persistence contracts for connector state.
//!
//! In-memory implementations live in `dsc-stores`; the node directory has a
//! document-store backed implementation in `dsc-node-directory`.
use crate::types::{
    Asset, AssetSelectorExpression, ContractAgreement, ContractDefinition, DataAddress,
    FederatedCacheNode, QuerySpec, TransferProcess,
};
use async_trait::async_trait;
use dsc_error::Result;

pub trait AssetIndex: Send + Sync {
    /// Returns every asset matching all criteria of the selector.
    fn query_assets(&self, selector: &AssetSelectorExpression) -> Result<Vec<Asset>>;

    fn find_by_id(&self, asset_id: &str) -> Option<Asset>;
}

pub trait DataAddressResolver: Send + Sync {
    fn resolve_for_asset(&self, asset_id: &str) -> Result<DataAddress>;
}

pub trait AssetLoader: Send + Sync {
    fn accept(&self, asset: Asset, address: DataAddress) -> Result<()>;
}

pub trait ContractDefinitionStore: Send + Sync {
    fn find_all(&self, spec: &QuerySpec) -> Result<Vec<ContractDefinition>>;

    fn find_by_id(&self, id: &str) -> Option<ContractDefinition>;

    /// Inserts or replaces by id.
    fn save(&self, definition: ContractDefinition) -> Result<()>;

    /// Inserts only when the id is free; otherwise fails with an
    /// object-exists error and leaves the stored definition untouched.
    fn create(&self, definition: ContractDefinition) -> Result<()>;

    fn delete_by_id(&self, id: &str) -> Option<ContractDefinition>;
}

pub trait ContractNegotiationStore: Send + Sync {
    fn find_contract_agreement(&self, agreement_id: &str) -> Option<ContractAgreement>;

    fn save_agreement(&self, agreement: ContractAgreement) -> Result<()>;
}

pub trait TransferProcessStore: Send + Sync {
    fn find(&self, id: &str) -> Option<TransferProcess>;

    /// Looks up the process created for a data request id.
    fn process_id_for_transfer_id(&self, transfer_id: &str) -> Option<String>;

    fn create(&self, process: TransferProcess) -> Result<()>;

    fn update(&self, process: TransferProcess) -> Result<()>;

    fn delete(&self, id: &str) -> Result<()>;

    /// Up to `max` processes in `state`, oldest state change first.
    fn next_for_state(&self, state: i32, max: usize) -> Vec<TransferProcess>;
}

#[async_trait]
pub trait FederatedCacheNodeDirectory: Send + Sync {
    async fn get_all(&self) -> Result<Vec<FederatedCacheNode>>;

    async fn insert(&self, node: FederatedCacheNode) -> Result<()>;
}
