use super::dto::ContractDefinitionDto;
use super::transform::{from_dto, to_dto};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use dsc_error::ConnectorError;
use dsc_spi::store::ContractDefinitionStore;
use dsc_spi::types::{QuerySpec, SortOrder, DEFAULT_LIMIT};
use dsc_web::ApiResult;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

type Store = Arc<dyn ContractDefinitionStore>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDefinitionQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub sort: Option<String>,
    pub sort_field: Option<String>,
    pub filter: Option<String>,
}

impl ContractDefinitionQuery {
    fn into_spec(self) -> ApiResult<QuerySpec> {
        let sort_order = match self.sort.as_deref() {
            Some(sort) => sort.parse::<SortOrder>()?,
            None => SortOrder::Asc,
        };
        let spec = QuerySpec {
            offset: self.offset.unwrap_or(0),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            sort_order,
            sort_field: self.sort_field,
            filter: self.filter,
        };
        spec.filter_expression()?;
        Ok(spec)
    }
}

pub fn create_contract_definition_router(store: Store) -> Router {
    Router::new()
        .route(
            "/contractdefinitions",
            get(list_contract_definitions).post(create_contract_definition),
        )
        .route(
            "/contractdefinitions/{id}",
            get(get_contract_definition).delete(delete_contract_definition),
        )
        .with_state(store)
}

async fn list_contract_definitions(
    State(store): State<Store>,
    Query(query): Query<ContractDefinitionQuery>,
) -> ApiResult<Json<Vec<ContractDefinitionDto>>> {
    let spec = query.into_spec()?;
    debug!(?spec, "Listing contract definitions");
    let definitions = store.find_all(&spec)?;
    Ok(Json(definitions.into_iter().map(to_dto).collect()))
}

async fn get_contract_definition(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContractDefinitionDto>> {
    store
        .find_by_id(&id)
        .map(|definition| Json(to_dto(definition)))
        .ok_or_else(|| ConnectorError::not_found("ContractDefinition", id).into())
}

async fn create_contract_definition(
    State(store): State<Store>,
    payload: Result<Json<ContractDefinitionDto>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(dto) =
        payload.map_err(|e| ConnectorError::invalid_request(vec![e.body_text()]))?;
    let definition = from_dto(dto)?;

    let id = definition.id.clone();
    store.create(definition)?;
    info!("Created contract definition {}", id);
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_contract_definition(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    match store.delete_by_id(&id) {
        Some(_) => {
            info!("Deleted contract definition {}", id);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ConnectorError::not_found("ContractDefinition", id).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let spec = ContractDefinitionQuery::default().into_spec().unwrap();
        assert_eq!(spec, QuerySpec::none());
    }

    #[test]
    fn test_invalid_sort_is_rejected() {
        let query = ContractDefinitionQuery {
            sort: Some("UP".into()),
            ..Default::default()
        };
        assert_eq!(query.into_spec().unwrap_err().status(), StatusCode::BAD_REQUEST);
    }
}
