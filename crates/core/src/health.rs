use dsc_spi::health::{HealthCheckProvider, HealthCheckResult, HealthCheckService, HealthStatus};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const LIVENESS_PERIOD_SECONDS_SETTING: &str = "edc.core.system.health.check.liveness-period";
pub const STARTUP_PERIOD_SECONDS_SETTING: &str = "edc.core.system.health.check.startup-period";
pub const READINESS_PERIOD_SECONDS_SETTING: &str = "edc.core.system.health.check.readiness-period";
pub const DEFAULT_PERIOD_SECONDS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthCheckServiceConfiguration {
    pub liveness_period: Duration,
    pub readiness_period: Duration,
    pub startup_status_period: Duration,
}

impl Default for HealthCheckServiceConfiguration {
    fn default() -> Self {
        let period = Duration::from_secs(DEFAULT_PERIOD_SECONDS);
        Self {
            liveness_period: period,
            readiness_period: period,
            startup_status_period: period,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum HealthCheckKind {
    Liveness,
    Readiness,
    Startup,
}

const ALL_KINDS: [HealthCheckKind; 3] = [
    HealthCheckKind::Liveness,
    HealthCheckKind::Readiness,
    HealthCheckKind::Startup,
];

/// Caches the aggregate status of each health check kind, re-evaluated on a timer
/// or on demand via [`HealthCheckService::refresh`].
pub struct HealthCheckServiceImpl {
    config: HealthCheckServiceConfiguration,
    providers: RwLock<HashMap<HealthCheckKind, Vec<HealthCheckProvider>>>,
    cache: RwLock<HashMap<HealthCheckKind, HealthStatus>>,
}

impl HealthCheckServiceImpl {
    pub fn new(config: HealthCheckServiceConfiguration) -> Self {
        Self {
            config,
            providers: RwLock::new(HashMap::new()),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Spawns the periodic refresh loop.
    #[must_use = "HealthCheckRefresher must be kept and shutdown() called on exit"]
    pub fn start(self: &Arc<Self>) -> HealthCheckRefresher {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let service = Arc::clone(self);

        let task = tokio::spawn(async move {
            let mut liveness = tokio::time::interval(service.config.liveness_period);
            let mut readiness = tokio::time::interval(service.config.readiness_period);
            let mut startup = tokio::time::interval(service.config.startup_status_period);
            for interval in [&mut liveness, &mut readiness, &mut startup] {
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            }

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Health check refresh loop stopped");
                        return;
                    }
                    _ = liveness.tick() => service.refresh_kind(HealthCheckKind::Liveness),
                    _ = readiness.tick() => service.refresh_kind(HealthCheckKind::Readiness),
                    _ = startup.tick() => service.refresh_kind(HealthCheckKind::Startup),
                }
            }
        });

        HealthCheckRefresher {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    fn add_provider(&self, kind: HealthCheckKind, provider: HealthCheckProvider) {
        self.providers
            .write()
            .expect("health providers lock poisoned")
            .entry(kind)
            .or_default()
            .push(provider);
    }

    fn refresh_kind(&self, kind: HealthCheckKind) {
        let providers = self
            .providers
            .read()
            .expect("health providers lock poisoned")
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        let status = HealthStatus::from_results(providers.iter().map(|p| p()).collect());
        if !status.is_system_healthy {
            tracing::warn!(kind = ?kind, "Health check reported failures");
        }
        self.cache
            .write()
            .expect("health cache lock poisoned")
            .insert(kind, status);
    }

    fn cached(&self, kind: HealthCheckKind) -> HealthStatus {
        self.cache
            .read()
            .expect("health cache lock poisoned")
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| HealthStatus::from_results(Vec::new()))
    }
}

impl HealthCheckService for HealthCheckServiceImpl {
    fn add_liveness_provider(&self, provider: HealthCheckProvider) {
        self.add_provider(HealthCheckKind::Liveness, provider);
    }

    fn add_readiness_provider(&self, provider: HealthCheckProvider) {
        self.add_provider(HealthCheckKind::Readiness, provider);
    }

    fn add_startup_status_provider(&self, provider: HealthCheckProvider) {
        self.add_provider(HealthCheckKind::Startup, provider);
    }

    fn is_live(&self) -> HealthStatus {
        self.cached(HealthCheckKind::Liveness)
    }

    fn is_ready(&self) -> HealthStatus {
        self.cached(HealthCheckKind::Readiness)
    }

    fn has_started(&self) -> HealthStatus {
        self.cached(HealthCheckKind::Startup)
    }

    fn refresh(&self) {
        for kind in ALL_KINDS {
            self.refresh_kind(kind);
        }
    }
}

/// Handle to the background refresh loop.
#[derive(Debug)]
pub struct HealthCheckRefresher {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl HealthCheckRefresher {
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Health check refresh task failed during shutdown");
            }
        }
    }
}

impl Drop for HealthCheckRefresher {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Convenience for providers that always report the same result.
pub fn constant_provider(result: HealthCheckResult) -> HealthCheckProvider {
    Arc::new(move || result.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_no_providers_is_healthy() {
        let service = HealthCheckServiceImpl::new(Default::default());
        service.refresh();
        assert!(service.is_live().is_system_healthy);
        assert!(service.is_ready().is_system_healthy);
        assert!(service.has_started().is_system_healthy);
    }

    #[test]
    fn test_refresh_aggregates_providers() {
        let service = HealthCheckServiceImpl::new(Default::default());
        service.add_readiness_provider(constant_provider(HealthCheckResult::success()));
        service.add_readiness_provider(constant_provider(HealthCheckResult::failed("not yet")));
        service.add_liveness_provider(constant_provider(HealthCheckResult::success()));

        // cached values are only updated on refresh
        assert!(service.is_ready().is_system_healthy);

        service.refresh();
        let ready = service.is_ready();
        assert!(!ready.is_system_healthy);
        assert_eq!(ready.component_results.len(), 2);
        assert!(service.is_live().is_system_healthy);
    }

    #[tokio::test]
    async fn test_refresh_loop_picks_up_changes() {
        let config = HealthCheckServiceConfiguration {
            liveness_period: Duration::from_millis(10),
            readiness_period: Duration::from_millis(10),
            startup_status_period: Duration::from_millis(10),
        };
        let service = Arc::new(HealthCheckServiceImpl::new(config));
        let healthy = Arc::new(AtomicBool::new(false));
        let flag = healthy.clone();
        service.add_liveness_provider(Arc::new(move || {
            if flag.load(Ordering::SeqCst) {
                HealthCheckResult::success()
            } else {
                HealthCheckResult::failed("down")
            }
        }));

        let refresher = service.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!service.is_live().is_system_healthy);

        healthy.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(service.is_live().is_system_healthy);

        refresher.shutdown().await;
    }
}
