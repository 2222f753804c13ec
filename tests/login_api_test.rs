// Integration tests for the login endpoint: dispatch, block selection,
// failure replies and transport errors.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use gridlogin::api::{create_router, RpcState};
use gridlogin::config::{GridConfig, RuntimeConfig};
use gridlogin::login::{Account, AccountDirectory, LoginService};
use gridlogin::request::{LoginOptions, LoginRequest};
use gridlogin::response::{ResponseBlock, CORE_KEYS, PLACEHOLDER};
use serde_json::{json, Value};
use std::sync::{Arc, RwLock};
use tower::ServiceExt;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn create_test_app(runtime: RuntimeConfig) -> Router {
    let accounts = Arc::new(AccountDirectory::new());
    accounts
        .register(Account::new("Test", "User", "$1$secret"))
        .unwrap();
    accounts
        .register(Account::new("Locked", "Out", "pw").disabled(true))
        .unwrap();

    let runtime_config = Arc::new(RwLock::new(runtime));
    let login_service = Arc::new(LoginService::new(
        accounts,
        GridConfig::default(),
        runtime_config.clone(),
    ));
    create_router(RpcState {
        login_service,
        runtime_config,
    })
}

fn default_app() -> Router {
    create_test_app(RuntimeConfig::default())
}

async fn post(app: Router, body: Vec<u8>) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

fn login_call(request: &LoginRequest) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "methodName": "login_to_simulator",
        "params": [Value::Object(request.to_canonical())],
    }))
    .unwrap()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Successful login returns the core keys plus the requested blocks only
#[tokio::test]
async fn test_login_returns_requested_blocks() {
    let request = LoginRequest {
        options: LoginOptions::none()
            .with(ResponseBlock::InventoryRoot)
            .with(ResponseBlock::BuddyList),
        ..LoginRequest::new("Test", "User", "$1$secret", "home")
    };

    let (status, body) = post(default_app(), login_call(&request)).await;
    assert_eq!(status, StatusCode::OK);

    let map = body["params"][0].as_object().unwrap();
    assert_eq!(map["login"], "true");
    assert_eq!(map["first_name"], "Test");
    assert_eq!(map["start_location"], "home");
    for key in CORE_KEYS {
        assert!(map.contains_key(key), "missing core key {}", key);
    }
    assert!(map.contains_key("inventory-root"));
    assert!(map.contains_key("buddy-list"));
    assert!(!map.contains_key("gestures"));
    assert!(!map.contains_key("classified_categories"));
    assert_eq!(map.len(), CORE_KEYS.len() + 2);
}

/// Full option set yields every block, with production key spellings
#[tokio::test]
async fn test_login_with_all_options() {
    let request = LoginRequest::with_defaults("test", "user", "$1$secret", "last", true, true);

    let (status, body) = post(default_app(), login_call(&request)).await;
    assert_eq!(status, StatusCode::OK);

    let map = body["params"][0].as_object().unwrap();
    assert_eq!(map.len(), CORE_KEYS.len() + ResponseBlock::ALL.len());
    assert_eq!(map["inventory-lib-owner"][0]["agent_id"], "11111111-1111-0000-0000-000100bba000");
    assert_eq!(map["classified_categories"].as_array().unwrap().len(), 9);
    assert_eq!(map["login-flags"][0]["ever_logged_in"], "N");
    assert_eq!(map["sim_port"], 9001);
}

/// Wrong password is a normal reply with a placeholder-filled map
#[tokio::test]
async fn test_failed_login_reply() {
    let request = LoginRequest::new("Test", "User", "$1$wrong", "home");

    let (status, body) = post(default_app(), login_call(&request)).await;
    assert_eq!(status, StatusCode::OK);

    let map = body["params"][0].as_object().unwrap();
    assert_eq!(map["login"], "false");
    assert!(map["message"].as_str().unwrap().contains("authenticate"));
    assert_eq!(map["agent_id"], PLACEHOLDER);
    assert_eq!(map["circuit_code"], PLACEHOLDER);
    assert_eq!(map["inventory-root"], PLACEHOLDER);
    assert_eq!(map.len(), CORE_KEYS.len() + ResponseBlock::ALL.len());
}

#[tokio::test]
async fn test_disabled_account_reply() {
    let request = LoginRequest::new("Locked", "Out", "pw", "home");

    let (_, body) = post(default_app(), login_call(&request)).await;
    assert_eq!(body["params"][0]["login"], "false");
    assert_eq!(body["params"][0]["message"], "This account has been disabled.");
}

#[tokio::test]
async fn test_logins_disabled_at_runtime() {
    let app = create_test_app(RuntimeConfig {
        logins_enabled: false,
        ..RuntimeConfig::default()
    });
    let request = LoginRequest::new("Test", "User", "$1$secret", "home");

    let (status, body) = post(app, login_call(&request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"][0]["login"], "false");
}

/// Missing required fields fail before any response is built
#[tokio::test]
async fn test_malformed_login_returns_400() {
    let body = serde_json::to_vec(&json!({
        "methodName": "login_to_simulator",
        "params": [{ "first": "Test", "last": "User", "start": "home" }],
    }))
    .unwrap();

    let (status, json) = post(default_app(), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "'passwd' is required");
}

/// Blank required fields are malformed too, not a refused login
#[tokio::test]
async fn test_blank_start_returns_400() {
    let body = serde_json::to_vec(&json!({
        "methodName": "login_to_simulator",
        "params": [{ "first": "Test", "last": "User", "passwd": "$1$secret", "start": "   " }],
    }))
    .unwrap();

    let (status, json) = post(default_app(), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "'start' is required");
    assert!(json.get("params").is_none());
}

#[tokio::test]
async fn test_non_string_option_returns_400() {
    let body = serde_json::to_vec(&json!({
        "methodName": "login_to_simulator",
        "params": [{
            "first": "Test",
            "last": "User",
            "passwd": "$1$secret",
            "start": "home",
            "options": ["inventory-root", false],
        }],
    }))
    .unwrap();

    let (status, _) = post(default_app(), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_without_params_returns_400() {
    let body = serde_json::to_vec(&json!({ "methodName": "login_to_simulator" })).unwrap();
    let (status, _) = post(default_app(), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_json_returns_400() {
    let (status, json) = post(default_app(), b"not json".to_vec()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_echo_returns_params() {
    let body = serde_json::to_vec(&json!({
        "methodName": "echo",
        "params": ["ping", 7, { "a": "b" }],
    }))
    .unwrap();

    let (status, json) = post(default_app(), body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "params": ["ping", 7, { "a": "b" }] }));
}

#[tokio::test]
async fn test_unknown_method_returns_404() {
    let body = serde_json::to_vec(&json!({ "methodName": "set_home", "params": [] })).unwrap();

    let (status, json) = post(default_app(), body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "unknown method 'set_home'");
}

#[tokio::test]
async fn test_oversized_body_returns_413() {
    let app = create_test_app(RuntimeConfig {
        max_request_bytes: 32,
        ..RuntimeConfig::default()
    });
    let request = LoginRequest::new("Test", "User", "$1$secret", "home");

    let (status, json) = post(app, login_call(&request)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"], "payload too large");
}
