use crate::control_api::create_control_router;
use crate::manager::{
    DataPlaneManagerImpl, DataPlaneWorkers, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS,
    QUEUE_CAPACITY_SETTING, WORKERS_SETTING,
};
use crate::operators::{FileDataReader, FileDataWriter, HttpDataReader, HttpDataWriter};
use crate::registry::DataOperatorRegistryImpl;
use crate::validation::{
    create_validation_router, ContractValidationRule, TokenValidationService,
    TOKEN_SECRET_SETTING,
};
use async_trait::async_trait;
use dsc_common::RetrySettings;
use dsc_error::{ConnectorError, Result};
use dsc_spi::dataplane::{DataOperatorRegistry, DataPlaneManager};
use dsc_spi::security::Vault;
use dsc_spi::store::ContractNegotiationStore;
use dsc_spi::validation::ValidationRule;
use dsc_spi::web::WebService;
use dsc_spi::{features, InjectionPoint, ServiceExtension, ServiceExtensionContext};
use dsc_web::context_alias_or_default;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;

pub const CONTROL_CONTEXT_ALIAS: &str = "control";
pub const VALIDATION_CONTEXT_ALIAS: &str = "validation";

/// Operator registry, transfer manager and the control API.
#[derive(Default)]
pub struct DataPlaneExtension {
    manager: Option<Arc<DataPlaneManagerImpl>>,
    workers: Option<DataPlaneWorkers>,
}

impl DataPlaneExtension {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServiceExtension for DataPlaneExtension {
    fn name(&self) -> &str {
        "Data Plane Framework"
    }

    fn provides(&self) -> Vec<&'static str> {
        vec![features::DATA_OPERATOR_REGISTRY, features::DATA_PLANE_MANAGER]
    }

    fn requires(&self) -> Vec<InjectionPoint> {
        vec![
            InjectionPoint::required(features::WEB_SERVICE),
            InjectionPoint::required(features::RETRY_SETTINGS),
            InjectionPoint::required(features::HTTP_CLIENT),
        ]
    }

    fn initialize(&mut self, context: &mut ServiceExtensionContext) -> Result<()> {
        let client = context.get_service::<reqwest::Client>()?;
        let registry = Arc::new(DataOperatorRegistryImpl::new());
        registry.register_reader(Arc::new(FileDataReader));
        registry.register_writer(Arc::new(FileDataWriter));
        registry.register_reader(Arc::new(HttpDataReader::new(client.as_ref().clone())));
        registry.register_writer(Arc::new(HttpDataWriter::new(client.as_ref().clone())));
        context.register_service::<dyn DataOperatorRegistry>(registry.clone());

        let queue_capacity = context.get_setting(QUEUE_CAPACITY_SETTING, DEFAULT_QUEUE_CAPACITY)?;
        let workers = context.get_setting(WORKERS_SETTING, DEFAULT_WORKERS)?;
        let retry = *context.get_service::<RetrySettings>()?;
        let manager = Arc::new(DataPlaneManagerImpl::new(
            registry,
            retry,
            queue_capacity,
            workers,
        ));
        context.register_service::<dyn DataPlaneManager>(manager.clone());

        let alias = context_alias_or_default(context.config(), CONTROL_CONTEXT_ALIAS);
        context
            .get_service::<dyn WebService>()?
            .register_resource(alias, create_control_router(manager.clone()));
        info!(
            queue_capacity,
            workers, "Data plane control API registered on context '{}'", alias
        );
        self.manager = Some(manager);
        Ok(())
    }

    async fn start(&mut self) -> Result<()> {
        if let Some(manager) = &self.manager {
            self.workers = manager.start();
        }
        Ok(())
    }

    async fn shutdown(&mut self) {
        if let Some(workers) = self.workers.take() {
            workers.shutdown().await;
        }
    }
}

/// Token validation service and the `/validation` endpoint.
#[derive(Default)]
pub struct DataPlaneValidationExtension;

impl DataPlaneValidationExtension {
    pub fn new() -> Self {
        Self
    }

    /// The configured secret wins over the vault entry of the same name.
    fn token_secret(context: &ServiceExtensionContext) -> Result<SecretString> {
        if let Some(secret) = context.config().get_string_opt(TOKEN_SECRET_SETTING) {
            return Ok(SecretString::from(secret));
        }
        context
            .find_service::<dyn Vault>()
            .and_then(|vault| vault.resolve_secret(TOKEN_SECRET_SETTING))
            .ok_or_else(|| ConnectorError::missing_setting(TOKEN_SECRET_SETTING))
    }
}

#[async_trait]
impl ServiceExtension for DataPlaneValidationExtension {
    fn name(&self) -> &str {
        "Data Plane Token Validation"
    }

    fn provides(&self) -> Vec<&'static str> {
        vec![features::TOKEN_VALIDATION]
    }

    fn requires(&self) -> Vec<InjectionPoint> {
        vec![
            InjectionPoint::required(features::WEB_SERVICE),
            InjectionPoint::required(features::CONTRACT_NEGOTIATION_STORE),
        ]
    }

    fn initialize(&mut self, context: &mut ServiceExtensionContext) -> Result<()> {
        let secret = Self::token_secret(context)?;
        let store = context.get_service::<dyn ContractNegotiationStore>()?;
        let rules: Vec<Arc<dyn ValidationRule>> = vec![Arc::new(ContractValidationRule::new(store))];
        let service = Arc::new(TokenValidationService::new(&secret, rules));
        context.register_service(service.clone());

        let alias = context_alias_or_default(context.config(), VALIDATION_CONTEXT_ALIAS);
        context
            .get_service::<dyn WebService>()?
            .register_resource(alias, create_validation_router(service));
        Ok(())
    }
}
