use dsc_core::{BaseRuntimeBuilder, RunningRuntime};
use dsc_error::Result;
use dsc_spi::ServiceExtensionContext;
use std::sync::Arc;
use tracing::warn;

/// A booted runtime that shuts itself down when dropped.
pub struct TestRuntime {
    runtime: Option<RunningRuntime>,
}

impl TestRuntime {
    pub async fn boot(builder: BaseRuntimeBuilder) -> Result<Self> {
        crate::init_test_logging();
        let runtime = builder.build().boot().await?;
        Ok(Self {
            runtime: Some(runtime),
        })
    }

    /// Panics when the service is not registered.
    pub fn service<T>(&self) -> Arc<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match self.running().service::<T>() {
            Ok(service) => service,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn context(&self) -> &ServiceExtensionContext {
        self.running().context()
    }

    pub async fn shutdown(mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown().await;
        }
    }

    fn running(&self) -> &RunningRuntime {
        match &self.runtime {
            Some(runtime) => runtime,
            None => panic!("test runtime already shut down"),
        }
    }
}

impl Drop for TestRuntime {
    fn drop(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(runtime.shutdown());
            }
            Err(_) => warn!("TestRuntime dropped outside a tokio runtime, skipping shutdown"),
        }
    }
}
