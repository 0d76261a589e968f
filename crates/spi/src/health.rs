use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl HealthCheckResult {
    pub fn success() -> Self {
        Self {
            is_healthy: true,
            component: None,
            failure: None,
        }
    }

    pub fn failed(failure: impl Into<String>) -> Self {
        Self {
            is_healthy: false,
            component: None,
            failure: Some(failure.into()),
        }
    }

    pub fn for_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }
}

/// Aggregate over all providers of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub is_system_healthy: bool,
    pub component_results: Vec<HealthCheckResult>,
}

impl HealthStatus {
    pub fn from_results(component_results: Vec<HealthCheckResult>) -> Self {
        Self {
            is_system_healthy: component_results.iter().all(|r| r.is_healthy),
            component_results,
        }
    }
}

pub type HealthCheckProvider = Arc<dyn Fn() -> HealthCheckResult + Send + Sync>;

pub trait HealthCheckService: Send + Sync {
    fn add_liveness_provider(&self, provider: HealthCheckProvider);

    fn add_readiness_provider(&self, provider: HealthCheckProvider);

    fn add_startup_status_provider(&self, provider: HealthCheckProvider);

    fn is_live(&self) -> HealthStatus;

    fn is_ready(&self) -> HealthStatus;

    fn has_started(&self) -> HealthStatus;

    /// Re-evaluates every provider immediately.
    fn refresh(&self);
}
