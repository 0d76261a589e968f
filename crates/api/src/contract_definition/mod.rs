//! `/contractdefinitions` management resource.
mod api;
mod dto;
mod transform;

pub use api::{create_contract_definition_router, ContractDefinitionQuery};
pub use dto::ContractDefinitionDto;
pub use transform::{from_dto, to_dto};
