use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use dsc_spi::health::{HealthCheckService, HealthStatus};
use std::sync::Arc;

type Health = Arc<dyn HealthCheckService>;

/// `/check/*` endpoints. Unhealthy statuses are answered with 503.
pub fn create_observability_router(health: Health) -> Router {
    Router::new()
        .route("/check/health", get(health_check))
        .route("/check/liveness", get(liveness))
        .route("/check/readiness", get(readiness))
        .route("/check/startup", get(startup))
        .with_state(health)
}

fn respond(status: HealthStatus) -> (StatusCode, Json<HealthStatus>) {
    let code = if status.is_system_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

async fn health_check(State(health): State<Health>) -> (StatusCode, Json<HealthStatus>) {
    let mut results = health.is_live().component_results;
    results.extend(health.is_ready().component_results);
    results.extend(health.has_started().component_results);
    respond(HealthStatus::from_results(results))
}

async fn liveness(State(health): State<Health>) -> (StatusCode, Json<HealthStatus>) {
    respond(health.is_live())
}

async fn readiness(State(health): State<Health>) -> (StatusCode, Json<HealthStatus>) {
    respond(health.is_ready())
}

async fn startup(State(health): State<Health>) -> (StatusCode, Json<HealthStatus>) {
    respond(health.has_started())
}
