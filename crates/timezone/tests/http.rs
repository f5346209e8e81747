//! `HttpReporter` against a mock server.

use chrono::DateTime;
use diary_timezone::{
    ENDPOINT_PATH, FixedDetector, HttpReporter, MemorySessionStore, TimezoneConfig,
    TimezoneError, TimezoneManager, TimezoneReport, TimezoneReporter, UserTimezoneSettings,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> TimezoneConfig {
    TimezoneConfig {
        base_url: server.uri(),
        ..TimezoneConfig::default()
    }
}

#[tokio::test]
async fn posts_json_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT_PATH))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "timezone": "Asia/Tokyo",
            "detected": "Europe/Berlin",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let reporter = HttpReporter::new(&config_for(&server)).unwrap();
    let report = TimezoneReport::now("Asia/Tokyo", Some("Europe/Berlin".to_owned()));
    reporter.report(&report).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(timestamp.ends_with('Z'));
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let reporter = HttpReporter::new(&config_for(&server)).unwrap();
    let err = reporter
        .report(&TimezoneReport::now("UTC", None))
        .await
        .unwrap_err();
    assert!(matches!(err, TimezoneError::Status { status: 422 }));
}

#[tokio::test]
async fn manager_survives_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let reporter = HttpReporter::new(&config_for(&server)).unwrap();
    let mut tz = TimezoneManager::new(
        FixedDetector::new("America/Chicago"),
        reporter,
        MemorySessionStore::new(),
    );

    let effective = tz.initialize(&UserTimezoneSettings::default()).await;
    assert_eq!(effective, "America/Chicago");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = TimezoneConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        timeout_secs: 2,
        ..TimezoneConfig::default()
    };

    let reporter = HttpReporter::new(&config).unwrap();
    let err = reporter
        .report(&TimezoneReport::now("UTC", None))
        .await
        .unwrap_err();
    assert!(matches!(err, TimezoneError::Transport(_)));
}
