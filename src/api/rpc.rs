use crate::config::SharedRuntimeConfig;
use crate::login::LoginService;
use crate::request::LoginRequest;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

pub const LOGIN_METHOD: &str = "login_to_simulator";
pub const ECHO_METHOD: &str = "echo";

/// Shared state for the login endpoint
#[derive(Clone)]
pub struct RpcState {
    pub login_service: Arc<LoginService>,
    pub runtime_config: SharedRuntimeConfig,
}

/// Remote procedure call body: `{"methodName": "...", "params": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcCall {
    #[serde(rename = "methodName")]
    pub method_name: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

/// Reply body: `{"params": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcReply {
    pub params: Vec<Value>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn create_router(state: RpcState) -> Router {
    Router::new()
        .route("/", post(handle_call))
        .with_state(Arc::new(state))
}

/// POST / - dispatch one call
async fn handle_call(
    State(state): State<Arc<RpcState>>,
    body: Bytes,
) -> Result<Json<RpcReply>, RpcError> {
    let limit = state
        .runtime_config
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .max_request_bytes;
    if body.len() > limit {
        return Err(RpcError::PayloadTooLarge);
    }

    let call: RpcCall =
        serde_json::from_slice(&body).map_err(|e| RpcError::BadRequest(e.to_string()))?;
    debug!(method = %call.method_name, params = call.params.len(), "Dispatching call");

    match call.method_name.as_str() {
        LOGIN_METHOD => login_to_simulator(&state, &call.params),
        ECHO_METHOD => Ok(Json(RpcReply {
            params: call.params,
        })),
        other => Err(RpcError::UnknownMethod(other.to_string())),
    }
}

fn login_to_simulator(state: &RpcState, params: &[Value]) -> Result<Json<RpcReply>, RpcError> {
    let raw = params
        .first()
        .ok_or_else(|| RpcError::BadRequest("missing login parameters".to_string()))?;
    let request = LoginRequest::try_from(raw).map_err(|e| RpcError::BadRequest(e.to_string()))?;

    info!(
        first = %request.first,
        last = %request.last,
        start = %request.start,
        channel = request.channel.as_deref().unwrap_or("-"),
        "Login requested"
    );

    let response = state
        .login_service
        .login(&request)
        .map_err(|e| RpcError::BadRequest(e.to_string()))?;
    let map = if response.is_success() {
        response.to_canonical_with(request.options.blocks())
    } else {
        response.to_canonical()
    };

    Ok(Json(RpcReply {
        params: vec![Value::Object(map)],
    }))
}

/// Transport-level errors; a refused login is a normal reply, not one of these
#[derive(Debug)]
pub enum RpcError {
    BadRequest(String),
    UnknownMethod(String),
    PayloadTooLarge,
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            RpcError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            RpcError::UnknownMethod(method) => (
                StatusCode::NOT_FOUND,
                format!("unknown method '{}'", method),
            ),
            RpcError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload too large".to_string())
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
        });
        (status, body).into_response()
    }
}
