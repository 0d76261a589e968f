//! Executes data flows handed over by the control plane.
//!
//! - **Operators**: readers, writers and stream publishers per address type (`operators`, `registry`).
//! - **Manager**: bounded queue drained by worker tasks (`manager`).
//! - **Control API**: `POST /transfer`, `GET /transfer/{processId}` (`control_api`).
//! - **Validation**: JWT checks for the validation endpoint (`validation`).
pub mod control_api;
pub mod extension;
pub mod manager;
pub mod operators;
pub mod registry;
pub mod validation;

pub use extension::{DataPlaneExtension, DataPlaneValidationExtension};
pub use manager::{DataPlaneManagerImpl, DataPlaneWorkers};
pub use registry::DataOperatorRegistryImpl;
pub use validation::{ContractValidationRule, TokenValidationService};
