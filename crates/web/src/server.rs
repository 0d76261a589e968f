use crate::cors::CorsConfiguration;
use crate::error::ApiError;
use crate::port_mapping::{PortMapping, WebServerConfiguration};
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Router;
use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::web::{RequestFilter, WebService};
use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, RwLock};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Default)]
struct WebContext {
    routers: Vec<Router>,
    filters: Vec<Arc<dyn RequestFilter>>,
}

struct RunningListener {
    alias: String,
    address: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Hosts every registered context on the listener of its port mapping.
///
/// Resources and filters are collected until [`WebServer::start`], which
/// binds one listener per port mapping.
pub struct WebServer {
    configuration: WebServerConfiguration,
    cors: CorsConfiguration,
    contexts: RwLock<BTreeMap<String, WebContext>>,
    listeners: Mutex<Vec<RunningListener>>,
}

impl WebServer {
    pub fn new(configuration: WebServerConfiguration, cors: CorsConfiguration) -> Self {
        Self {
            configuration,
            cors,
            contexts: RwLock::new(BTreeMap::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn configuration(&self) -> &WebServerConfiguration {
        &self.configuration
    }

    /// Binds the listeners and returns the bound address per context alias.
    ///
    /// Registrations are validated before they are consumed, so a rejected
    /// start keeps them. A failed start leaves no listener running.
    pub async fn start(&self) -> Result<BTreeMap<String, SocketAddr>> {
        self.check_aliases()?;
        self.check_mappings()?;
        let cors = self.cors.layer()?;

        let mut contexts =
            std::mem::take(&mut *self.contexts.write().expect("web contexts lock poisoned"));
        let mut started = Vec::new();
        for mapping in self.configuration.port_mappings() {
            let context = contexts.remove(&mapping.name).unwrap_or_default();
            let mut app = Router::new().merge(context_router(mapping, context));
            if let Some(cors) = &cors {
                app = app.layer(cors.clone());
            }

            match bind(mapping, app).await {
                Ok(listener) => started.push(listener),
                Err(e) => {
                    stop_listeners(started).await;
                    return Err(e);
                }
            }
        }

        let addresses = started
            .iter()
            .map(|listener| (listener.alias.clone(), listener.address))
            .collect();
        self.listeners
            .lock()
            .expect("web listeners lock poisoned")
            .extend(started);
        Ok(addresses)
    }

    /// The address a started context is bound to.
    pub fn bound_address(&self, alias: &str) -> Option<SocketAddr> {
        self.listeners
            .lock()
            .expect("web listeners lock poisoned")
            .iter()
            .find(|listener| listener.alias == alias)
            .map(|listener| listener.address)
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn shutdown(&self) {
        let listeners =
            std::mem::take(&mut *self.listeners.lock().expect("web listeners lock poisoned"));
        stop_listeners(listeners).await;
    }

    fn check_aliases(&self) -> Result<()> {
        let contexts = self.contexts.read().expect("web contexts lock poisoned");
        match contexts
            .keys()
            .find(|alias| self.configuration.port_mapping(alias).is_none())
        {
            Some(alias) => Err(ConnectorError::new(
                ErrorCode::InvalidRequest,
                format!("No PortMapping for contextName '{}' found", alias),
            )),
            None => Ok(()),
        }
    }

    fn check_mappings(&self) -> Result<()> {
        let mut paths = HashSet::new();
        let mut ports = HashSet::new();
        for mapping in self.configuration.port_mappings() {
            if !paths.insert(mapping.path.as_str()) {
                return Err(ConnectorError::new(
                    ErrorCode::WebServerFailed,
                    format!("A binding for path {} already exists", mapping.path),
                ));
            }
            if mapping.port != 0 && !ports.insert(mapping.port) {
                return Err(ConnectorError::new(
                    ErrorCode::WebServerFailed,
                    format!("A binding for port {} already exists", mapping.port),
                ));
            }
        }
        Ok(())
    }
}

impl WebService for WebServer {
    fn register_resource(&self, context_alias: &str, router: Router) {
        self.contexts
            .write()
            .expect("web contexts lock poisoned")
            .entry(context_alias.to_string())
            .or_default()
            .routers
            .push(router);
    }

    fn register_filter(&self, context_alias: &str, filter: Arc<dyn RequestFilter>) {
        self.contexts
            .write()
            .expect("web contexts lock poisoned")
            .entry(context_alias.to_string())
            .or_default()
            .filters
            .push(filter);
    }
}

async fn bind(mapping: &PortMapping, app: Router) -> Result<RunningListener> {
    let listener = TcpListener::bind(("0.0.0.0", mapping.port))
        .await
        .map_err(|e| {
            ConnectorError::new(
                ErrorCode::WebServerFailed,
                format!("Failed to bind port mapping {}: {}", mapping, e),
            )
        })?;
    let address = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let alias = mapping.name.clone();
    let task_alias = alias.clone();
    let handle = tokio::spawn(async move {
        let shutdown = async move {
            let _ = shutdown_rx.await;
        };
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            error!(target: "errors", "Web context '{}' stopped: {}", task_alias, e);
        }
    });

    info!(
        "Web context '{}' listening on {} at path {}",
        alias, address, mapping.path
    );
    Ok(RunningListener {
        alias,
        address,
        shutdown_tx,
        handle,
    })
}

async fn stop_listeners(listeners: Vec<RunningListener>) {
    for listener in listeners {
        let _ = listener.shutdown_tx.send(());
        if let Err(e) = listener.handle.await {
            warn!("Web context '{}' did not stop cleanly: {}", listener.alias, e);
        }
    }
}

fn context_router(mapping: &PortMapping, context: WebContext) -> Router {
    let mut router = context
        .routers
        .into_iter()
        .fold(Router::new(), |acc, r| acc.merge(r));

    if !context.filters.is_empty() {
        let filters = Arc::new(context.filters);
        router = router.layer(axum::middleware::from_fn(
            move |req: Request, next: Next| {
                let filters = filters.clone();
                async move { apply_filters(&filters, req, next).await }
            },
        ));
    }

    let path = mapping.path.trim_end_matches('/');
    if path.is_empty() {
        router
    } else {
        Router::new().nest(path, router)
    }
}

async fn apply_filters(filters: &[Arc<dyn RequestFilter>], req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    for filter in filters {
        if let Err(e) = filter.filter(&parts).await {
            return ApiError(e).into_response();
        }
    }
    next.run(Request::from_parts(parts, body)).await
}
