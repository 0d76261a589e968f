use async_trait::async_trait;
use axum::http::request::Parts;
use axum::routing::get;
use axum::Router;
use dsc_core::BaseRuntime;
use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::web::{RequestFilter, WebService};
use dsc_spi::{features, InjectionPoint, ServiceExtension, ServiceExtensionContext};
use dsc_testing::TestRuntime;
use dsc_web::cors::CorsConfiguration;
use dsc_web::{PortMapping, WebServer, WebServerConfiguration, WebServerExtension};
use std::sync::Arc;

struct RequireHeader(&'static str);

#[async_trait]
impl RequestFilter for RequireHeader {
    async fn filter(&self, request: &Parts) -> Result<()> {
        if request.headers.contains_key(self.0) {
            Ok(())
        } else {
            Err(ConnectorError::new(
                ErrorCode::AuthenticationFailed,
                format!("missing header {}", self.0),
            ))
        }
    }
}

fn hello(body: &'static str) -> Router {
    Router::new().route("/hello", get(move || async move { body }))
}

fn two_contexts() -> WebServerConfiguration {
    WebServerConfiguration::new()
        .with_port_mapping(PortMapping::new("default", 0, "/api"))
        .with_port_mapping(PortMapping::new("data", 0, "/api/v1/data"))
}

#[tokio::test]
async fn test_contexts_are_served_on_their_own_listener() {
    let server = WebServer::new(two_contexts(), CorsConfiguration::none());
    server.register_resource("default", hello("management"));
    server.register_resource("data", hello("data"));

    let addresses = server.start().await.unwrap();
    let default_port = addresses["default"].port();
    let data_port = addresses["data"].port();
    assert_ne!(default_port, data_port);

    let client = reqwest::Client::new();
    let body = client
        .get(format!("http://127.0.0.1:{}/api/hello", default_port))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "management");

    let body = client
        .get(format!("http://127.0.0.1:{}/api/v1/data/hello", data_port))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "data");

    server.shutdown().await;
}

#[tokio::test]
async fn test_filters_apply_only_to_their_context() {
    let server = WebServer::new(two_contexts(), CorsConfiguration::none());
    server.register_resource("default", hello("management"));
    server.register_resource("data", hello("data"));
    server.register_filter("data", Arc::new(RequireHeader("x-token")));

    let addresses = server.start().await.unwrap();
    let client = reqwest::Client::new();

    let response = client
        .get(format!(
            "http://127.0.0.1:{}/api/hello",
            addresses["default"].port()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let data_url = format!(
        "http://127.0.0.1:{}/api/v1/data/hello",
        addresses["data"].port()
    );
    let response = client.get(&data_url).send().await.unwrap();
    assert_eq!(response.status(), 401);
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["message"], "missing header x-token");

    let response = client
        .get(&data_url)
        .header("x-token", "yes")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    server.shutdown().await;
}

#[tokio::test]
async fn test_unknown_context_alias_fails_start() {
    let server = WebServer::new(two_contexts(), CorsConfiguration::none());
    server.register_resource("ids", hello("ids"));

    let err = server.start().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidRequest);
    assert!(err.message.contains("ids"));
}

#[tokio::test]
async fn test_duplicate_path_fails_start() {
    let configuration = WebServerConfiguration::new()
        .with_port_mapping(PortMapping::new("default", 0, "/api"))
        .with_port_mapping(PortMapping::new("other", 0, "/api"));
    let server = WebServer::new(configuration, CorsConfiguration::none());

    let err = server.start().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::WebServerFailed);
}

/// Registers a router against the web service during initialisation.
struct HelloApi;

#[async_trait]
impl ServiceExtension for HelloApi {
    fn name(&self) -> &str {
        "Hello API"
    }

    fn requires(&self) -> Vec<InjectionPoint> {
        vec![InjectionPoint::required(features::WEB_SERVICE)]
    }

    fn initialize(&mut self, context: &mut ServiceExtensionContext) -> Result<()> {
        let web = context.get_service::<dyn WebService>()?;
        web.register_resource("default", hello("from extension"));
        Ok(())
    }
}

#[tokio::test]
async fn test_extension_serves_registered_routers() {
    let config = dsc_common::config::from_map([("web.http.port", "0")]);
    let runtime = TestRuntime::boot(
        BaseRuntime::builder()
            .config(config)
            .extension(HelloApi)
            .extension(WebServerExtension::new()),
    )
    .await
    .unwrap();

    let address = runtime
        .service::<WebServer>()
        .bound_address("default")
        .unwrap();
    let body = reqwest::get(format!("http://127.0.0.1:{}/api/hello", address.port()))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "from extension");

    runtime.shutdown().await;
}
