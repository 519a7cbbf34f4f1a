//! Shared utilities for integration tests.

use accom_guard::config::GuardConfig;
use accom_guard::http::GuardServer;
use accom_guard::lifecycle::Shutdown;
use serde_json::{json, Value};
use tokio::sync::mpsc;

/// HTTP client that ignores proxy environment variables.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build test client")
}

/// Config tuned for deterministic tests: ephemeral port, fixed secret.
pub fn test_config() -> GuardConfig {
    let mut config = GuardConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.csrf.secret = "integration-test-secret".to_string();
    config
}

/// Boot the real server on an ephemeral port.
///
/// Returns the base URL and the shutdown handle; tests trigger shutdown
/// when done.
pub async fn spawn_app(config: GuardConfig) -> (String, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let (_config_tx, config_updates) = mpsc::unbounded_channel();

    let server = GuardServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, receiver).await;
    });

    (format!("http://{}", addr), shutdown)
}

/// Fetch a CSRF token pair: the cookie to send back and the header echo.
pub async fn fetch_csrf(client: &reqwest::Client, base: &str) -> (String, String) {
    let res = client
        .get(format!("{base}/api/csrf-token"))
        .send()
        .await
        .expect("csrf token request");
    let cookie_pair = res
        .headers()
        .get("set-cookie")
        .expect("set-cookie header")
        .to_str()
        .expect("cookie is ascii")
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string();
    let body: Value = res.json().await.expect("csrf token body");
    let token = body["csrfToken"].as_str().expect("csrfToken field").to_string();
    (cookie_pair, token)
}

/// A review submission that passes every schema rule.
#[allow(dead_code)]
pub fn valid_review() -> Value {
    json!({
        "accommodationId": "7b6d8f6e-4f3a-4a7e-9a65-2f8f14c3f5d1",
        "title": "Great location, thin walls",
        "text": "Lived here for two semesters; close to campus, decent kitchen, responsive management overall.",
        "rating": 4,
        "ratingBreakdown": {
            "cleanliness": 4,
            "location": 5,
            "value": 3.5,
            "amenities": 4,
            "management": 4,
            "safety": 5
        },
        "pros": ["Close to campus"],
        "cons": ["Noisy on weekends"],
        "roomType": "Studio",
        "stayDuration": "12 months"
    })
}

/// A registration body that passes every schema rule.
#[allow(dead_code)]
pub fn valid_registration() -> Value {
    json!({
        "email": "Z1234567@student.unsw.edu.au",
        "password": "StrongPass1!",
        "confirmPassword": "StrongPass1!",
        "name": "Jordan Lee",
        "university": "UNSW",
        "studentId": "z1234567"
    })
}
