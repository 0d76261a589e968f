use crate::auth::{
    AuthenticationRequestFilter, AuthenticationService, TokenBasedAuthenticationService,
};
use crate::contract_definition::create_contract_definition_router;
use crate::observability::create_observability_router;
use async_trait::async_trait;
use dsc_common::Config;
use dsc_error::Result;
use dsc_spi::health::HealthCheckService;
use dsc_spi::store::ContractDefinitionStore;
use dsc_spi::web::{WebService, DEFAULT_CONTEXT_ALIAS};
use dsc_spi::{features, InjectionPoint, ServiceExtension, ServiceExtensionContext};
use dsc_web::context_alias_or_default;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{info, warn};

pub const API_AUTH_KEY_SETTING: &str = "edc.api.auth.key";
pub const DATA_CONTEXT_ALIAS: &str = "data";

/// Management APIs go to the `data` context once it has its own port.
pub fn api_context_alias(config: &Config) -> &'static str {
    context_alias_or_default(config, DATA_CONTEXT_ALIAS)
}

/// Registers the authentication service and guards the API context with it.
#[derive(Default)]
pub struct ApiCoreExtension;

impl ApiCoreExtension {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ServiceExtension for ApiCoreExtension {
    fn name(&self) -> &str {
        "API Core"
    }

    fn provides(&self) -> Vec<&'static str> {
        vec![features::AUTHENTICATION_SERVICE]
    }

    fn requires(&self) -> Vec<InjectionPoint> {
        vec![InjectionPoint::required(features::WEB_SERVICE)]
    }

    fn initialize(&mut self, context: &mut ServiceExtensionContext) -> Result<()> {
        let service = match context.find_service::<dyn AuthenticationService>() {
            Some(service) => service,
            None => {
                let api_key = match context.config().get_string_opt(API_AUTH_KEY_SETTING) {
                    Some(key) => key,
                    None => {
                        warn!(
                            "Setting {} not found, using a random API key",
                            API_AUTH_KEY_SETTING
                        );
                        uuid::Uuid::new_v4().to_string()
                    }
                };
                let service: Arc<dyn AuthenticationService> = Arc::new(
                    TokenBasedAuthenticationService::new(SecretString::from(api_key)),
                );
                context.register_service(service.clone());
                service
            }
        };

        let alias = api_context_alias(context.config());
        context
            .get_service::<dyn WebService>()?
            .register_filter(alias, Arc::new(AuthenticationRequestFilter::new(service)));
        info!("API authentication enabled for context '{}'", alias);
        Ok(())
    }
}

#[derive(Default)]
pub struct ContractDefinitionApiExtension;

impl ContractDefinitionApiExtension {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ServiceExtension for ContractDefinitionApiExtension {
    fn name(&self) -> &str {
        "Contract Definition API"
    }

    fn requires(&self) -> Vec<InjectionPoint> {
        vec![
            InjectionPoint::required(features::WEB_SERVICE),
            InjectionPoint::required(features::CONTRACT_DEFINITION_STORE),
            InjectionPoint::required(features::AUTHENTICATION_SERVICE),
        ]
    }

    fn initialize(&mut self, context: &mut ServiceExtensionContext) -> Result<()> {
        let store = context.get_service::<dyn ContractDefinitionStore>()?;
        context.get_service::<dyn WebService>()?.register_resource(
            api_context_alias(context.config()),
            create_contract_definition_router(store),
        );
        Ok(())
    }
}

/// Health endpoints on the default context.
#[derive(Default)]
pub struct ObservabilityApiExtension;

impl ObservabilityApiExtension {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ServiceExtension for ObservabilityApiExtension {
    fn name(&self) -> &str {
        "Observability API"
    }

    fn requires(&self) -> Vec<InjectionPoint> {
        vec![
            InjectionPoint::required(features::WEB_SERVICE),
            InjectionPoint::required(features::HEALTH_CHECK),
        ]
    }

    fn initialize(&mut self, context: &mut ServiceExtensionContext) -> Result<()> {
        let health = context.get_service::<dyn HealthCheckService>()?;
        context
            .get_service::<dyn WebService>()?
            .register_resource(DEFAULT_CONTEXT_ALIAS, create_observability_router(health));
        Ok(())
    }
}
