//! Unit tests for registry client

use super::*;

use eureka_core::types::InstanceDescriptor;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_partial_json, header, method, path};

const EXPECTED_BASIC: &str = "Basic dGVzdHVzZXI6dGVzdHBhc3N3b3Jk";

fn test_config(base_url: &str) -> RegistrationConfig {
    let instance = InstanceDescriptor::new("test-app", "localhost", "127.0.0.1", 8080)
        .with_instance_id("test-instance");
    RegistrationConfig::new(format!("{}/eureka/apps/test-app", base_url), "test-app", instance)
}

fn test_credentials() -> Credentials {
    Credentials::new("testuser", "testpassword")
}

async fn mount_status(mock_server: &MockServer, http_method: &str, status: u16) {
    Mock::given(method(http_method))
        .respond_with(ResponseTemplate::new(status))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_registry_client_creation() {
    assert!(RegistryClient::new().is_ok());

    let transport = TransportConfig {
        timeout: Some(Duration::from_secs(5)),
        connect_timeout: Some(Duration::from_secs(1)),
        ..TransportConfig::default()
    };
    assert!(RegistryClient::with_transport(transport).is_ok());
}

#[tokio::test]
async fn test_transport_config_default() {
    let config = TransportConfig::default();
    assert_eq!(config.timeout, None);
    assert_eq!(config.connect_timeout, None);
    assert_eq!(config.pool_idle_timeout, Duration::from_secs(90));
    assert!(config.user_agent.starts_with("eureka-client/"));
}

#[tokio::test]
async fn test_register_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/eureka/apps/test-app"))
        .and(header("Authorization", EXPECTED_BASIC))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(serde_json::json!({
            "instance": {
                "instanceId": "test-instance",
                "app": "test-app",
                "status": "UP",
                "port": { "$": 8080, "@enabled": "true" }
            }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new().unwrap();
    let result = client.register(&test_config(&mock_server.uri()), &test_credentials()).await;

    assert!(result.is_ok(), "register failed: {:?}", result);
}

#[tokio::test]
async fn test_register_unauthorized() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "POST", 401).await;

    let client = RegistryClient::new().unwrap();
    let result = client.register(&test_config(&mock_server.uri()), &test_credentials()).await;

    match result.unwrap_err() {
        EurekaError::RegistrationRejected { status } => assert_eq!(status, 401),
        other => panic!("Expected RegistrationRejected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_server_error() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "POST", 500).await;

    let client = RegistryClient::new().unwrap();
    let err = client.register(&test_config(&mock_server.uri()), &test_credentials()).await.unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert!(err.is_rejection());
}

#[tokio::test]
async fn test_register_only_accepts_no_content() {
    for status in [200, 201, 202] {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, "POST", status).await;

        let client = RegistryClient::new().unwrap();
        let err = client.register(&test_config(&mock_server.uri()), &test_credentials()).await.unwrap_err();

        assert_eq!(err.status_code(), Some(status));
    }
}

#[tokio::test]
async fn test_register_ignores_response_body() {
    let mock_server = MockServer::start().await;

    // 200 with a garbage body is still a rejection; only the status matters
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200)
            .insert_header("Content-Type", "application/json")
            .set_body_string("invalid-json"))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new().unwrap();
    let err = client.register(&test_config(&mock_server.uri()), &test_credentials()).await.unwrap_err();
    assert!(matches!(err, EurekaError::RegistrationRejected { status: 200 }));

    // and 204 with a garbage body is a success
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204).set_body_string("invalid-json"))
        .mount(&mock_server)
        .await;

    let result = client.register(&test_config(&mock_server.uri()), &test_credentials()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_large_response_body_is_drained() {
    let mock_server = MockServer::start().await;
    let document = "x".repeat(4 * 1024 * 1024);

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_string(document))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new().unwrap();
    let config = test_config(&mock_server.uri());

    // The second call reuses the connection released by the first
    assert!(client.deregister(&config, &test_credentials()).await.is_ok());
    assert!(client.deregister(&config, &test_credentials()).await.is_ok());
}

#[tokio::test]
async fn test_register_does_not_negotiate_compression() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "POST", 204).await;

    let client = RegistryClient::new().unwrap();
    client.register(&test_config(&mock_server.uri()), &test_credentials()).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.keys().any(|name| name.as_str().eq_ignore_ascii_case("accept-encoding")));
}

#[tokio::test]
async fn test_register_custom_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("Authorization", "Bearer custom-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri()).with_auth_header("Bearer custom-token");
    let client = RegistryClient::new().unwrap();

    // credentials are irrelevant once a custom header is configured
    let result = client.register(&config, &Credentials::new("ignored", "ignored")).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_register_empty_auth_header_falls_back_to_basic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri()).with_auth_header("");
    let client = RegistryClient::new().unwrap();

    let result = client.register(&config, &Credentials::new("user", "pass")).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_register_invalid_url() {
    let client = RegistryClient::new().unwrap();
    let mut config = test_config("");
    config.eureka_url = "invalid-url".to_string();

    let err = client.register(&config, &test_credentials()).await.unwrap_err();

    assert!(matches!(err, EurekaError::RequestBuild { .. }));
    assert!(!err.is_rejection());
}

#[tokio::test]
async fn test_register_invalid_auth_header() {
    let client = RegistryClient::new().unwrap();
    let config = test_config("http://127.0.0.1:8761").with_auth_header("Bearer bad\nvalue");

    let err = client.register(&config, &test_credentials()).await.unwrap_err();
    assert!(matches!(err, EurekaError::RequestBuild { .. }));
}

#[tokio::test]
async fn test_register_unreachable_registry() {
    let client = RegistryClient::new().unwrap();

    // Nothing listens on port 1
    let err = client
        .register(&test_config("http://127.0.0.1:1"), &test_credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, EurekaError::Transport { .. }));
    assert_eq!(err.status_code(), None);
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_register_twice_sends_two_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/eureka/apps/test-app"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new().unwrap();
    let config = test_config(&mock_server.uri());
    let credentials = test_credentials();

    let (first, second) = tokio::join!(
        client.register(&config, &credentials),
        client.register(&config, &credentials),
    );
    assert!(first.is_ok());
    assert!(second.is_ok());
}

#[tokio::test]
async fn test_deregister_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/eureka/apps/test-app/test-instance"))
        .and(header("Authorization", EXPECTED_BASIC))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new().unwrap();
    let result = client.deregister(&test_config(&mock_server.uri()), &test_credentials()).await;

    assert!(result.is_ok(), "deregister failed: {:?}", result);
}

#[tokio::test]
async fn test_deregister_ignores_custom_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/eureka/apps/test-app/test-instance"))
        .and(header("Authorization", EXPECTED_BASIC))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri()).with_auth_header("Bearer custom-token");
    let client = RegistryClient::new().unwrap();

    let result = client.deregister(&config, &test_credentials()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_deregister_not_found() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "DELETE", 404).await;

    let client = RegistryClient::new().unwrap();
    let err = client.deregister(&test_config(&mock_server.uri()), &test_credentials()).await.unwrap_err();

    match err {
        EurekaError::DeregistrationRejected { status } => assert_eq!(status, 404),
        other => panic!("Expected DeregistrationRejected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_deregister_only_accepts_ok() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "DELETE", 204).await;

    let client = RegistryClient::new().unwrap();
    let err = client.deregister(&test_config(&mock_server.uri()), &test_credentials()).await.unwrap_err();

    assert!(matches!(err, EurekaError::DeregistrationRejected { status: 204 }));
}

#[tokio::test]
async fn test_deregister_invalid_url() {
    let client = RegistryClient::new().unwrap();
    let mut config = test_config("");
    config.eureka_url = "invalid-url".to_string();

    let err = client.deregister(&config, &test_credentials()).await.unwrap_err();
    assert!(matches!(err, EurekaError::RequestBuild { .. }));
}

#[tokio::test]
async fn test_shared_transport_client() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "DELETE", 200).await;

    let client = RegistryClient::from_client(reqwest::Client::new());
    let result = client.deregister(&test_config(&mock_server.uri()), &test_credentials()).await;

    assert!(result.is_ok());
}
