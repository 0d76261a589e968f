use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use dsc_error::ConnectorError;
use dsc_spi::dataplane::DataPlaneManager;
use dsc_spi::types::{DataFlowRequest, DataFlowState};
use dsc_web::ApiResult;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

type Manager = Arc<dyn DataPlaneManager>;

#[derive(Debug, Serialize)]
pub struct DataFlowStateDto {
    pub state: DataFlowState,
}

pub fn create_control_router(manager: Manager) -> Router {
    Router::new()
        .route("/transfer", post(initiate_transfer))
        .route("/transfer/{process_id}", get(transfer_state))
        .with_state(manager)
}

async fn initiate_transfer(
    State(manager): State<Manager>,
    payload: Result<Json<DataFlowRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(request) =
        payload.map_err(|e| ConnectorError::invalid_request(vec![e.body_text()]))?;
    manager.validate(&request)?;

    let process_id = request.process_id.clone();
    manager.initiate_transfer(request).await?;
    info!(process_id = %process_id, "Data flow accepted");
    Ok(StatusCode::OK)
}

async fn transfer_state(
    State(manager): State<Manager>,
    Path(process_id): Path<String>,
) -> Json<DataFlowStateDto> {
    Json(DataFlowStateDto {
        state: manager.transfer_state(&process_id),
    })
}
