//! Connector server: assembles the runtime from every extension crate and
//! runs it until a shutdown signal arrives.
use anyhow::Context;
use dsc_api::{ApiCoreExtension, ContractDefinitionApiExtension, ObservabilityApiExtension};
use dsc_common::logging::{init_logging, LoggingSettings};
use dsc_common::Config;
use dsc_core::transfer::TransferCoreExtension;
use dsc_core::{BaseRuntime, BaseRuntimeBuilder};
use dsc_data_plane::validation::TOKEN_SECRET_SETTING;
use dsc_data_plane::{DataPlaneExtension, DataPlaneValidationExtension};
use dsc_node_directory::NodeDirectoryExtension;
use dsc_spi::ServiceExtension;
use dsc_stores::InMemoryStoresExtension;
use dsc_web::WebServerExtension;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config/connector.yaml";

pub struct ConnectorServer {
    config_path: String,
    log_json: bool,
    extra_extensions: Vec<Box<dyn ServiceExtension>>,
}

impl Default for ConnectorServer {
    fn default() -> Self {
        Self {
            config_path: DEFAULT_CONFIG_PATH.to_string(),
            log_json: false,
            extra_extensions: vec![],
        }
    }
}

impl ConnectorServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Forces JSON output on stdout regardless of `dsc.log.json`.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.log_json = enabled;
        self
    }

    pub fn with_extension(mut self, extension: impl ServiceExtension + 'static) -> Self {
        self.extra_extensions.push(Box::new(extension));
        self
    }

    /// The runtime a connector boots for `config`.
    ///
    /// Token validation is only wired in when a token secret is configured.
    pub fn runtime_builder(self, config: Config) -> BaseRuntimeBuilder {
        let validation = config.has_key(TOKEN_SECRET_SETTING);
        let mut builder = BaseRuntime::builder()
            .config(config)
            .extension(WebServerExtension::new())
            .extension(InMemoryStoresExtension::new().without_node_directory())
            .extension(NodeDirectoryExtension::new())
            .extension(TransferCoreExtension::new())
            .extension(ApiCoreExtension::new())
            .extension(ContractDefinitionApiExtension::new())
            .extension(ObservabilityApiExtension::new())
            .extension(DataPlaneExtension::new());
        if validation {
            builder = builder.extension(DataPlaneValidationExtension::new());
        }
        for extension in self.extra_extensions {
            builder = builder.boxed_extension(extension);
        }
        builder
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let config = dsc_common::config::from_file(&self.config_path)
            .with_context(|| format!("Failed to load configuration from {}", self.config_path))?;

        let mut logging = LoggingSettings::from_config(&config)?;
        logging.json |= self.log_json;
        init_logging(&logging);

        let runtime = self
            .runtime_builder(config)
            .build()
            .boot()
            .await
            .context("Connector failed to boot")?;
        info!(
            extensions = ?runtime.extension_names(),
            "Connector '{}' ready",
            runtime.name()
        );

        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for shutdown signal")?;
        info!("Shutdown signal received");
        runtime.shutdown().await;
        Ok(())
    }
}
