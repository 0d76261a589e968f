use dsc_core::BaseRuntime;
use dsc_data_plane::{DataPlaneExtension, DataPlaneValidationExtension};
use dsc_error::ErrorCode;
use dsc_stores::InMemoryStoresExtension;
use dsc_testing::TestRuntime;
use dsc_web::{WebServer, WebServerExtension};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn builder(config: dsc_common::Config) -> dsc_core::BaseRuntimeBuilder {
    BaseRuntime::builder()
        .config(config)
        .extension(DataPlaneValidationExtension::new())
        .extension(DataPlaneExtension::new())
        .extension(InMemoryStoresExtension::new())
        .extension(WebServerExtension::new())
}

#[tokio::test]
async fn test_http_source_is_copied_to_file_destination() {
    let source = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("sunny"))
        .expect(1)
        .mount(&source)
        .await;
    let out_dir = tempfile::tempdir().unwrap();

    let runtime = TestRuntime::boot(builder(dsc_common::config::from_map([
        ("web.http.port", "0"),
        ("edc.dataplane.token.secret", "integration-secret"),
        ("edc.dataplane.workers", "2"),
    ])))
    .await
    .unwrap();
    let port = runtime
        .service::<WebServer>()
        .bound_address("default")
        .unwrap()
        .port();
    let base = format!("http://127.0.0.1:{}/api", port);
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/transfer", base))
        .json(&json!({
            "id": "request-1",
            "processId": "process-1",
            "sourceDataAddress": {"properties": {
                "type": "HttpData",
                "endpoint": format!("{}/weather", source.uri())
            }},
            "destinationDataAddress": {"properties": {
                "type": "file",
                "path": out_dir.path().to_string_lossy(),
                "keyName": "weather.txt"
            }}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let mut state = Value::Null;
    for _ in 0..100 {
        let body: Value = client
            .get(format!("{}/transfer/process-1", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        state = body["state"].clone();
        if state == "COMPLETED" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(state, "COMPLETED");
    assert_eq!(
        std::fs::read_to_string(out_dir.path().join("weather.txt")).unwrap(),
        "sunny"
    );

    runtime.shutdown().await;
}

#[tokio::test]
async fn test_validation_requires_token_secret() {
    let err = TestRuntime::boot(builder(dsc_common::config::from_map([(
        "web.http.port",
        "0",
    )])))
    .await
    .err()
    .unwrap();
    assert_eq!(err.code, ErrorCode::MissingSetting);
}
