use async_trait::async_trait;
use axum::http::request::Parts;
use axum::Router;
use dsc_error::Result;
use std::sync::Arc;

pub const DEFAULT_CONTEXT_ALIAS: &str = "default";

/// Runs before every request of the context it is registered for.
#[async_trait]
pub trait RequestFilter: Send + Sync {
    async fn filter(&self, request: &Parts) -> Result<()>;
}

pub trait WebService: Send + Sync {
    fn register_resource(&self, context_alias: &str, router: Router);

    fn register_filter(&self, context_alias: &str, filter: Arc<dyn RequestFilter>);
}
