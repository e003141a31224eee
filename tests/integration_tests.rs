//! Integration tests using mock HTTP server
//!
//! Tests the full flow: YAML config → authorized client → paged listing →
//! polling a run until it reaches a terminal state

use aml_client::auth::{ChallengeAuthenticator, FnTokenProvider, TokenRequest};
use aml_client::http::{HttpClient, JsonPageFetcher};
use aml_client::polling::{PollPolicy, StatusResource};
use aml_client::{ClientConfig, Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHALLENGE: &str =
    r#"Bearer authorization_uri="https://login.example/tenant-1", resource="https://ml.example/""#;

fn config_yaml(server: &MockServer) -> String {
    format!(
        r"
environment: custom
resource_manager_endpoint: {uri}/
http:
  base_url: {uri}
  timeout_seconds: 5
polling:
  initial_interval_seconds: 0.01
  max_interval_seconds: 0.05
  growth_multiplier: 1.5
  timeout_seconds: 5
challenge_cache:
  ttl_seconds: 600
",
        uri = server.uri()
    )
}

/// Client whose provider records every token request
fn authorized_client(
    config: &ClientConfig,
    requests: Arc<Mutex<Vec<TokenRequest>>>,
) -> HttpClient {
    let provider = FnTokenProvider::new(move |request: TokenRequest| {
        let requests = Arc::clone(&requests);
        async move {
            requests.lock().unwrap().push(request);
            Ok::<_, Error>(Some("integration-token".to_string()))
        }
    });
    let auth = ChallengeAuthenticator::new(provider)
        .with_environment(config.environment().unwrap())
        .with_cache(config.challenge_cache());
    HttpClient::with_auth(config.http_client_config(), auth).unwrap()
}

async fn mount_challenge(server: &MockServer, expected_probes: u64) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).insert_header("WWW-Authenticate", CHALLENGE))
        .with_priority(10)
        .expect(expected_probes)
        .mount(server)
        .await;
}

// ============================================================================
// Paged listing behind a bearer challenge
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct Experiment {
    name: String,
}

#[tokio::test]
async fn test_authorized_paged_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/experiments"))
        .and(header("authorization", "Bearer integration-token"))
        .and(query_param("continuationToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "exp-c"}]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/experiments"))
        .and(header("authorization", "Bearer integration-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "exp-a"}, {"name": "exp-b"}],
            "continuationToken": "page-2"
        })))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    // Each page has its own URL, so each is challenged once
    mount_challenge(&server, 2).await;

    let config = ClientConfig::from_yaml_str(&config_yaml(&server)).unwrap();
    let token_requests = Arc::new(Mutex::new(Vec::new()));
    let client = authorized_client(&config, Arc::clone(&token_requests));

    let experiments = JsonPageFetcher::new(client.clone(), "/experiments")
        .query("api-version", "2019-09-30")
        .into_typed_sequence::<Experiment>();

    let names: Vec<String> = experiments
        .collect_all()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["exp-a", "exp-b", "exp-c"]);

    // Replay is served from the sequence cache
    assert_eq!(experiments.collect_all().await.unwrap().len(), 3);

    let requests = token_requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].authority, "https://login.example/tenant-1");
    assert_eq!(requests[0].scope, "https://ml.example/");
    assert_eq!(requests[0].resource, format!("{}/", server.uri()));
    assert_eq!(client.authenticator().unwrap().cache().len(), 2);
}

// ============================================================================
// Polling a run resource
// ============================================================================

struct Run {
    client: HttpClient,
    url: String,
    status: String,
}

#[async_trait]
impl StatusResource for Run {
    fn status(&self) -> &str {
        &self.status
    }

    async fn refresh(&mut self) -> Result<()> {
        let body: serde_json::Value = self.client.get_json(&self.url).await?;
        self.status = body["status"].as_str().unwrap_or_default().to_string();
        Ok(())
    }
}

#[tokio::test]
async fn test_poll_run_to_completion() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runs/run-1"))
        .and(header("authorization", "Bearer integration-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Running"})))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/runs/run-1"))
        .and(header("authorization", "Bearer integration-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Completed"})))
        .with_priority(2)
        .mount(&server)
        .await;

    // One probe; every later refresh reuses the cached challenge
    mount_challenge(&server, 1).await;

    let config = ClientConfig::from_yaml_str(&config_yaml(&server)).unwrap();
    let client = authorized_client(&config, Arc::new(Mutex::new(Vec::new())));
    let policy = config.poll_policy().unwrap();

    let mut run = Run {
        client,
        url: "/runs/run-1".to_string(),
        status: "NotStarted".to_string(),
    };

    let done = policy
        .wait_for_terminal_state(&mut run, &[], false, &CancellationToken::new())
        .await
        .unwrap();

    assert!(done);
    assert_eq!(run.status(), "Completed");
}

#[tokio::test]
async fn test_poll_run_times_out_without_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runs/stuck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Running"})))
        .mount(&server)
        .await;

    let config = ClientConfig::from_yaml_str(&config_yaml(&server)).unwrap();
    let client = HttpClient::with_config(config.http_client_config()).unwrap();
    let policy = PollPolicy::fixed(Duration::from_millis(20), Duration::from_millis(100)).unwrap();

    let mut run = Run {
        client,
        url: format!("{}/runs/stuck", server.uri()),
        status: String::new(),
    };

    let done = policy
        .wait_for_terminal_state(&mut run, &[], true, &CancellationToken::new())
        .await
        .unwrap();

    assert!(!done);
    assert_eq!(run.status(), "Running");
}

#[tokio::test]
async fn test_poll_surfaces_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runs/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "RunNotFound", "message": "Run gone does not exist"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::from_yaml_str(&config_yaml(&server)).unwrap();
    let client = HttpClient::with_config(config.http_client_config()).unwrap();

    let mut run = Run {
        client,
        url: format!("{}/runs/gone", server.uri()),
        status: String::new(),
    };

    let err = config
        .poll_policy()
        .unwrap()
        .wait_for_terminal_state(&mut run, &[], false, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, Error::Service { ref code, .. } if code == "RunNotFound"));
}
