use crate::directory::DocumentNodeDirectory;
use crate::store::SqliteDocumentStore;
use async_trait::async_trait;
use dsc_common::RetrySettings;
use dsc_error::Result;
use dsc_spi::health::{HealthCheckResult, HealthCheckService};
use dsc_spi::store::FederatedCacheNodeDirectory;
use dsc_spi::{features, InjectionPoint, ServiceExtension, ServiceExtensionContext};
use std::sync::Arc;
use tracing::{info, warn};

pub const DATABASE_PATH_SETTING: &str = "edc.node.directory.sqlite.path";
pub const CONTAINER_SETTING: &str = "edc.node.directory.container";
pub const PARTITION_KEY_SETTING: &str = "edc.node.directory.partition-key";

pub const DEFAULT_DATABASE_PATH: &str = "node-directory.db";
pub const DEFAULT_CONTAINER: &str = "nodes";
pub const DEFAULT_PARTITION_KEY: &str = "dataspaceconnector";

const HEALTH_COMPONENT: &str = "Node Directory";

/// Registers a [`DocumentNodeDirectory`] backed by SQLite.
///
/// Readiness reports the outcome of the latest store operation; `start`
/// runs a connection check so the first report reflects a real round trip.
#[derive(Default)]
pub struct NodeDirectoryExtension {
    store: Option<Arc<SqliteDocumentStore>>,
}

impl NodeDirectoryExtension {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServiceExtension for NodeDirectoryExtension {
    fn name(&self) -> &str {
        "Node Directory"
    }

    fn provides(&self) -> Vec<&'static str> {
        vec![features::NODE_DIRECTORY]
    }

    fn requires(&self) -> Vec<InjectionPoint> {
        vec![
            InjectionPoint::required(features::RETRY_SETTINGS),
            InjectionPoint::optional(features::HEALTH_CHECK),
        ]
    }

    fn initialize(&mut self, context: &mut ServiceExtensionContext) -> Result<()> {
        let path = context.get_setting_string(DATABASE_PATH_SETTING, DEFAULT_DATABASE_PATH);
        let container = context.get_setting_string(CONTAINER_SETTING, DEFAULT_CONTAINER);
        let partition_key = context.get_setting_string(PARTITION_KEY_SETTING, DEFAULT_PARTITION_KEY);

        let store = Arc::new(SqliteDocumentStore::open(&path, &container)?);
        if let Some(health) = context.find_service::<dyn HealthCheckService>() {
            let checked = store.clone();
            health.add_readiness_provider(Arc::new(move || {
                match checked.last_failure() {
                    None => HealthCheckResult::success(),
                    Some(failure) => HealthCheckResult::failed(failure),
                }
                .for_component(HEALTH_COMPONENT)
            }));
        }

        let retry = *context.get_service::<RetrySettings>()?;
        context.register_service::<dyn FederatedCacheNodeDirectory>(Arc::new(
            DocumentNodeDirectory::new(store.clone(), partition_key.as_str(), retry),
        ));
        self.store = Some(store);
        info!(
            path = %path,
            container = %container,
            partition_key = %partition_key,
            "Node directory initialized"
        );
        Ok(())
    }

    async fn start(&mut self) -> Result<()> {
        if let Some(store) = &self.store {
            if let Err(e) = store.check_connection().await {
                warn!(error = %e, "Node directory connection check failed");
            }
        }
        Ok(())
    }
}
