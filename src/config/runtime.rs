use std::sync::{Arc, RwLock};

/// Settings that can change while the server runs.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// When false every login fails with "grid unavailable"
    pub logins_enabled: bool,
    pub max_request_bytes: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            logins_enabled: true,
            max_request_bytes: 65_536, // 64 KB
        }
    }
}

impl RuntimeConfig {
    /// Build from env vars, falling back to defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("GRIDLOGIN_LOGINS_ENABLED") {
            if let Ok(b) = v.parse::<bool>() {
                cfg.logins_enabled = b;
            }
        }
        if let Ok(v) = std::env::var("GRIDLOGIN_MAX_REQUEST_BYTES") {
            if let Ok(n) = v.parse::<usize>() {
                cfg.max_request_bytes = n;
            }
        }

        cfg
    }
}

pub type SharedRuntimeConfig = Arc<RwLock<RuntimeConfig>>;

pub fn new_runtime_config() -> SharedRuntimeConfig {
    Arc::new(RwLock::new(RuntimeConfig::from_env()))
}
