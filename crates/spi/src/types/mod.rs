//! Domain types shared by every connector component.
pub mod asset;
pub mod contract;
pub mod dataplane;
pub mod node;
pub mod query;
pub mod transfer;

pub use asset::{Asset, DataAddress};
pub use contract::{AssetSelectorExpression, ContractAgreement, ContractDefinition, Criterion};
pub use dataplane::{DataFlowRequest, DataFlowState};
pub use node::FederatedCacheNode;
pub use query::{QuerySpec, SortOrder, DEFAULT_LIMIT};
pub use transfer::{DataRequest, TransferProcess, TransferProcessKind, TransferProcessStates};
