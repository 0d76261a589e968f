use dsc_data_plane::TokenValidationService;
use dsc_server::ConnectorServer;
use dsc_spi::dataplane::DataPlaneManager;
use dsc_spi::store::FederatedCacheNodeDirectory;
use dsc_spi::types::FederatedCacheNode;
use dsc_testing::TestRuntime;
use dsc_web::WebServer;

fn config(dir: &tempfile::TempDir, extra: &[(&str, &str)]) -> dsc_common::Config {
    let db = dir.path().join("nodes.db").to_string_lossy().to_string();
    let mut entries = vec![
        ("web.http.port", "0"),
        ("edc.api.auth.key", "server-test-key"),
        ("edc.node.directory.sqlite.path", db.as_str()),
    ];
    entries.extend_from_slice(extra);
    dsc_common::config::from_map(entries)
}

#[tokio::test]
async fn test_connector_boots_without_token_validation() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = TestRuntime::boot(ConnectorServer::new().runtime_builder(config(&dir, &[])))
        .await
        .unwrap();

    assert!(runtime.context().has_service::<dyn DataPlaneManager>());
    assert!(!runtime.context().has_service::<TokenValidationService>());

    let directory = runtime.service::<dyn FederatedCacheNodeDirectory>();
    directory
        .insert(FederatedCacheNode::new("self", "http://localhost", vec![]))
        .await
        .unwrap();
    assert!(dir.path().join("nodes.db").exists());

    let port = runtime
        .service::<WebServer>()
        .bound_address("default")
        .unwrap()
        .port();
    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://127.0.0.1:{}/api/check/liveness", port))
        .header("x-api-key", "server-test-key")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("http://127.0.0.1:{}/api/contractdefinitions", port))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    runtime.shutdown().await;
}

#[tokio::test]
async fn test_token_secret_enables_validation() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = TestRuntime::boot(ConnectorServer::new().runtime_builder(config(
        &dir,
        &[("edc.dataplane.token.secret", "server-test-secret")],
    )))
    .await
    .unwrap();

    assert!(runtime.context().has_service::<TokenValidationService>());
    runtime.shutdown().await;
}
