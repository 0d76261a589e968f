use crate::dispatcher::RemoteMessageDispatcherRegistryImpl;
use crate::health::{
    HealthCheckRefresher, HealthCheckServiceConfiguration, HealthCheckServiceImpl,
    DEFAULT_PERIOD_SECONDS, LIVENESS_PERIOD_SECONDS_SETTING, READINESS_PERIOD_SECONDS_SETTING,
    STARTUP_PERIOD_SECONDS_SETTING,
};
use async_trait::async_trait;
use dsc_common::{http, RetrySettings};
use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::features;
use dsc_spi::health::HealthCheckService;
use dsc_spi::message::RemoteMessageDispatcherRegistry;
use dsc_spi::{ServiceExtension, ServiceExtensionContext};
use std::sync::Arc;
use std::time::Duration;

/// Registers the services every other extension can rely on: retry
/// settings, the outbound HTTP client, health checks and the message
/// dispatcher registry.
#[derive(Default)]
pub struct CoreServicesExtension {
    health_check_service: Option<Arc<HealthCheckServiceImpl>>,
    refresher: Option<HealthCheckRefresher>,
}

impl CoreServicesExtension {
    pub fn new() -> Self {
        Self::default()
    }

    fn health_check_config(
        context: &ServiceExtensionContext,
    ) -> Result<HealthCheckServiceConfiguration> {
        let seconds = |key: &str| -> Result<Duration> {
            let period: u64 = context.get_setting(key, DEFAULT_PERIOD_SECONDS)?;
            if period == 0 {
                return Err(ConnectorError::new(
                    ErrorCode::InvalidSetting,
                    format!("Setting {} must be a positive number of seconds", key),
                ));
            }
            Ok(Duration::from_secs(period))
        };
        Ok(HealthCheckServiceConfiguration {
            liveness_period: seconds(LIVENESS_PERIOD_SECONDS_SETTING)?,
            readiness_period: seconds(READINESS_PERIOD_SECONDS_SETTING)?,
            startup_status_period: seconds(STARTUP_PERIOD_SECONDS_SETTING)?,
        })
    }
}

#[async_trait]
impl ServiceExtension for CoreServicesExtension {
    fn name(&self) -> &str {
        "Core Services"
    }

    fn provides(&self) -> Vec<&'static str> {
        vec![
            features::CORE,
            features::RETRY_SETTINGS,
            features::HTTP_CLIENT,
            features::HEALTH_CHECK,
            features::DISPATCHER_REGISTRY,
        ]
    }

    fn initialize(&mut self, context: &mut ServiceExtensionContext) -> Result<()> {
        context.register_service(Arc::new(http::default_http_client()?));
        context.register_service(Arc::new(RetrySettings::from_config(context.config())?));

        let health = Arc::new(HealthCheckServiceImpl::new(Self::health_check_config(
            context,
        )?));
        context.register_service::<dyn HealthCheckService>(health.clone());
        self.health_check_service = Some(health);

        let dispatchers: Arc<dyn RemoteMessageDispatcherRegistry> =
            Arc::new(RemoteMessageDispatcherRegistryImpl::new());
        context.register_service(dispatchers);
        Ok(())
    }

    async fn start(&mut self) -> Result<()> {
        if let Some(health) = &self.health_check_service {
            self.refresher = Some(health.start());
        }
        Ok(())
    }

    async fn shutdown(&mut self) {
        if let Some(refresher) = self.refresher.take() {
            refresher.shutdown().await;
        }
    }
}
