use crate::api::{RpcCall, RpcReply, ECHO_METHOD, LOGIN_METHOD};
use crate::request::LoginRequest;
use crate::response::{CanonicalMap, ConversionError, LoginResponse, PLACEHOLDER};
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Result of a login call that reached the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Accepted(Box<LoginResponse>),
    /// The grid answered with `login = "false"`
    Rejected {
        reason: Option<String>,
        message: Option<String>,
    },
}

impl LoginOutcome {
    /// Classify a reply map. Rejections are read without decoding the rest,
    /// since grids send only a handful of keys with them.
    pub fn from_canonical(map: &CanonicalMap) -> Result<Self, ConversionError> {
        let accepted = match map.get("login") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        };

        if accepted {
            let response = LoginResponse::from_canonical(map)?;
            return Ok(LoginOutcome::Accepted(Box::new(response)));
        }

        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .filter(|s| *s != PLACEHOLDER)
                .map(str::to_string)
        };
        Ok(LoginOutcome::Rejected {
            reason: text("reason"),
            message: text("message"),
        })
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, LoginOutcome::Accepted(_))
    }
}

/// HTTP client for a grid login endpoint.
pub struct LoginClient {
    http: Client,
    url: String,
}

impl LoginClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make one call and return the reply's params.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Vec<Value>> {
        let call = RpcCall {
            method_name: method.to_string(),
            params,
        };
        debug!(url = %self.url, method, "Calling login endpoint");

        let response = self
            .http
            .post(&self.url)
            .json(&call)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let detail = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("no detail");
            return Err(anyhow!("{} failed with {}: {}", method, status, detail));
        }

        let reply: RpcReply = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} reply", method))?;
        Ok(reply.params)
    }

    pub async fn echo(&self, params: Vec<Value>) -> Result<Vec<Value>> {
        self.call(ECHO_METHOD, params).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome> {
        let params = self
            .call(LOGIN_METHOD, vec![Value::Object(request.to_canonical())])
            .await?;

        let map = params
            .first()
            .and_then(Value::as_object)
            .ok_or_else(|| anyhow!("login reply carried no response map"))?;
        LoginOutcome::from_canonical(map).context("Failed to decode login response")
    }
}
