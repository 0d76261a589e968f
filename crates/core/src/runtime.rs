use crate::loader::ExtensionLoader;
use crate::services::CoreServicesExtension;
use crate::vault::InMemoryVault;
use dsc_common::Config;
use dsc_error::Result;
use dsc_spi::health::{HealthCheckResult, HealthCheckService};
use dsc_spi::security::Vault;
use dsc_spi::{ServiceExtension, ServiceExtensionContext};
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info};

type ServiceOverride = Box<dyn FnOnce(&mut ServiceExtensionContext) + Send>;

/// Collects configuration, extensions and service overrides, then boots them.
///
/// ```no_run
/// # async fn run() -> dsc_error::Result<()> {
/// let runtime = dsc_core::BaseRuntime::builder()
///     .config(dsc_common::config::from_map([("edc.connector.name", "provider")]))
///     .build()
///     .boot()
///     .await?;
/// runtime.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct BaseRuntime {
    config: Config,
    extensions: Vec<Box<dyn ServiceExtension>>,
    overrides: Vec<ServiceOverride>,
}

#[derive(Default)]
pub struct BaseRuntimeBuilder {
    config: Config,
    extensions: Vec<Box<dyn ServiceExtension>>,
    overrides: Vec<ServiceOverride>,
}

impl BaseRuntimeBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn extension(self, extension: impl ServiceExtension + 'static) -> Self {
        self.boxed_extension(Box::new(extension))
    }

    pub fn boxed_extension(mut self, extension: Box<dyn ServiceExtension>) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Registers a service before any extension initialises; extensions may
    /// still replace it. A registered `dyn Vault` replaces the default vault.
    pub fn service<T>(mut self, service: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.overrides
            .push(Box::new(move |context| context.register_service(service)));
        self
    }

    pub fn build(self) -> BaseRuntime {
        let mut extensions: Vec<Box<dyn ServiceExtension>> =
            vec![Box::new(CoreServicesExtension::new())];
        extensions.extend(self.extensions);
        BaseRuntime {
            config: self.config,
            extensions,
            overrides: self.overrides,
        }
    }
}

impl BaseRuntime {
    pub fn builder() -> BaseRuntimeBuilder {
        BaseRuntimeBuilder::default()
    }

    /// Boots every extension. On failure, extensions are shut down again and
    /// the error is returned.
    pub async fn boot(self) -> Result<RunningRuntime> {
        let mut context = ServiceExtensionContext::new(self.config);
        for service_override in self.overrides {
            service_override(&mut context);
        }
        let name = context.connector_id().to_string();

        if !context.has_service::<dyn Vault>() {
            debug!("No vault registered, using in-memory vault");
            context.register_service::<dyn Vault>(Arc::new(InMemoryVault::new()));
        }

        let mut extensions = match ExtensionLoader::sort_extensions(self.extensions) {
            Ok(extensions) => extensions,
            Err(e) => {
                error!(error = %e, "Error booting runtime");
                return Err(e);
            }
        };

        if let Err(e) = ExtensionLoader::boot_extensions(&mut extensions, &mut context).await {
            error!(error = %e, "Error booting runtime");
            shutdown_extensions(&mut extensions).await;
            return Err(e);
        }

        let startup_status = Arc::new(RwLock::new(HealthCheckResult::failed(
            "Startup not complete",
        )));
        if let Some(health) = context.find_service::<dyn HealthCheckService>() {
            let status = startup_status.clone();
            health.add_startup_status_provider(Arc::new(move || {
                status.read().expect("startup status lock poisoned").clone()
            }));
            *startup_status.write().expect("startup status lock poisoned") =
                HealthCheckResult::success();
            health.refresh();
        }

        info!("{} ready", name);
        Ok(RunningRuntime {
            name,
            context,
            extensions,
        })
    }
}

/// A booted runtime. Call [`RunningRuntime::shutdown`] to stop it.
pub struct RunningRuntime {
    name: String,
    context: ServiceExtensionContext,
    extensions: Vec<Box<dyn ServiceExtension>>,
}

impl RunningRuntime {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &ServiceExtensionContext {
        &self.context
    }

    pub fn service<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.context.get_service::<T>()
    }

    pub fn extension_names(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    /// Shuts extensions down in reverse boot order.
    pub async fn shutdown(mut self) {
        shutdown_extensions(&mut self.extensions).await;
    }
}

async fn shutdown_extensions(extensions: &mut [Box<dyn ServiceExtension>]) {
    for extension in extensions.iter_mut().rev() {
        extension.shutdown().await;
        info!("Shutdown {}", extension.name());
    }
    info!("Shutdown complete");
}
