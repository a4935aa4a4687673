use smelter::domain::errors::AnalysisError;
use smelter::domain::models::{ChannelId, FormatSettings, ServerConfig};
use smelter::domain::ports::{AnalysisService, FormattingService};
use smelter::infrastructure::analysis_server::AnalysisServerClient;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AnalysisServerClient {
    let config = ServerConfig {
        base_url: server.uri(),
        request_timeout_secs: 5,
        ..ServerConfig::default()
    };
    AnalysisServerClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_analyze_wrapped_response() {
    let mock_server = MockServer::start().await;
    let channel_id = ChannelId::new("0f3c2a");

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_json(serde_json::json!({
            "code": "class Foo {}",
            "websocket_id": "0f3c2a"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "smells": {
                "Foo": ["God Class", "Data Class"],
                "Foo.bar": ["Long Method"]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let findings = client_for(&mock_server)
        .analyze("class Foo {}", &channel_id)
        .await
        .unwrap();

    assert_eq!(findings.scope_count(), 2);
    assert_eq!(findings.finding_count(), 3);
}

#[tokio::test]
async fn test_analyze_bare_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Foo": []
        })))
        .mount(&mock_server)
        .await;

    let findings = client_for(&mock_server)
        .analyze("class Foo {}", &ChannelId::generate())
        .await
        .unwrap();
    assert_eq!(findings.scope_count(), 1);
    assert_eq!(findings.finding_count(), 0);
}

#[tokio::test]
async fn test_analyze_499_is_cancelled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(
            ResponseTemplate::new(499).set_body_json(serde_json::json!({"detail": "Analysis cancelled"})),
        )
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .analyze("class Foo {}", &ChannelId::generate())
        .await
        .unwrap_err();
    assert_eq!(err, AnalysisError::Cancelled);
    assert!(err.is_cancellation());
}

#[tokio::test]
async fn test_analyze_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(400).set_body_string("WebSocket connection not found"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .analyze("class Foo {}", &ChannelId::generate())
        .await
        .unwrap_err();
    match err {
        AnalysisError::RemoteError { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("WebSocket connection not found"));
        }
        other => panic!("Expected RemoteError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_analyze_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .analyze("class Foo {}", &ChannelId::generate())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_cancel_sends_all_ids_in_one_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cancel"))
        .and(body_json(serde_json::json!({"websocket_ids": ["a1", "b2"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Cancellation requested"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    client_for(&mock_server)
        .cancel(&[ChannelId::new("a1"), ChannelId::new("b2")])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_format_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/format"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "formatted_code": "class Foo {\n}\n",
            "errors": ["Line 1, Column 6:NamingViolation 'foo_bar' should be camelCase"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = client_for(&mock_server)
        .format("class Foo{}", &FormatSettings::default())
        .await
        .unwrap();

    assert_eq!(output.formatted_code.as_deref(), Some("class Foo {\n}\n"));
    assert_eq!(output.errors.len(), 1);

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["settings"]["maxLineLength"], 100);
    assert_eq!(body["code"], "class Foo{}");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let config = ServerConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 2,
        ..ServerConfig::default()
    };
    let client = AnalysisServerClient::new(&config).unwrap();

    let err = client
        .analyze("class Foo {}", &ChannelId::generate())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Transport(_)));
}
