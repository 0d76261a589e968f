use super::dto::ContractDefinitionDto;
use dsc_error::{ConnectorError, Result};
use dsc_spi::types::{AssetSelectorExpression, ContractDefinition};
use validator::{Validate, ValidationErrors};

/// Validates the DTO and turns it into a domain object.
pub fn from_dto(dto: ContractDefinitionDto) -> Result<ContractDefinition> {
    dto.validate()
        .map_err(|e| ConnectorError::invalid_request(messages(&e)))?;

    let mut errors = Vec::new();
    for criterion in &dto.criteria {
        // unknown operators surface here instead of at query time
        if let Err(e) = criterion.matches(None) {
            errors.push(e.message);
        }
    }
    if !errors.is_empty() {
        return Err(ConnectorError::invalid_request(errors));
    }

    Ok(ContractDefinition {
        id: dto.id,
        access_policy_id: dto.access_policy_id,
        contract_policy_id: dto.contract_policy_id,
        selector_expression: AssetSelectorExpression::new(dto.criteria),
    })
}

pub fn to_dto(definition: ContractDefinition) -> ContractDefinitionDto {
    ContractDefinitionDto {
        id: definition.id,
        access_policy_id: definition.access_policy_id,
        contract_policy_id: definition.contract_policy_id,
        criteria: definition.selector_expression.criteria,
    }
}

fn messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages
}
