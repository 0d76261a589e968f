use crate::cors::CorsConfiguration;
use crate::port_mapping::WebServerConfiguration;
use crate::server::WebServer;
use async_trait::async_trait;
use dsc_error::Result;
use dsc_spi::web::WebService;
use dsc_spi::{features, ServiceExtension, ServiceExtensionContext};
use std::sync::Arc;
use tracing::info;

/// Provides the [`WebService`] other extensions register their routers with.
#[derive(Default)]
pub struct WebServerExtension {
    server: Option<Arc<WebServer>>,
}

impl WebServerExtension {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServiceExtension for WebServerExtension {
    fn name(&self) -> &str {
        "Web Server"
    }

    fn provides(&self) -> Vec<&'static str> {
        vec![features::WEB_SERVICE]
    }

    fn initialize(&mut self, context: &mut ServiceExtensionContext) -> Result<()> {
        let configuration = WebServerConfiguration::from_config(context.config())?;
        let cors = CorsConfiguration::from_config(context.config())?;
        for mapping in configuration.port_mappings() {
            info!("HTTP context '{}' configured: {}", mapping.name, mapping);
        }

        let server = Arc::new(WebServer::new(configuration, cors));
        context.register_service::<dyn WebService>(server.clone());
        context.register_service(server.clone());
        self.server = Some(server);
        Ok(())
    }

    async fn start(&mut self) -> Result<()> {
        if let Some(server) = &self.server {
            server.start().await?;
        }
        Ok(())
    }

    async fn shutdown(&mut self) {
        if let Some(server) = self.server.take() {
            server.shutdown().await;
        }
    }
}
