use dsc_spi::types::Criterion;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContractDefinitionDto {
    #[validate(length(min = 1, message = "id must not be blank"))]
    pub id: String,
    #[validate(length(min = 1, message = "accessPolicyId must not be blank"))]
    pub access_policy_id: String,
    #[validate(length(min = 1, message = "contractPolicyId must not be blank"))]
    pub contract_policy_id: String,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}
