//! In-memory stores for assets, contract definitions, agreements, transfer
//! processes and federation nodes.
pub mod asset;
pub mod contract_definition;
pub mod extension;
pub mod negotiation;
pub mod node_directory;
pub mod transfer_process;

pub use asset::{CriterionToPredicateConverter, InMemoryAssetLoader};
pub use contract_definition::InMemoryContractDefinitionStore;
pub use extension::InMemoryStoresExtension;
pub use negotiation::InMemoryContractNegotiationStore;
pub use node_directory::InMemoryNodeDirectory;
pub use transfer_process::InMemoryTransferProcessStore;
