use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use photofind_core::config::Config;
use photofind_core::retry::RetryPolicy;

use crate::domain::types::ACCESS_CODE_TTL_SECS;
use crate::infra::vision::DEFAULT_VISION_ENDPOINT;

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_ttl_secs() -> i64 {
    ACCESS_CODE_TTL_SECS
}

fn default_sweep_secs() -> u64 {
    60 * 60
}

fn default_tx_max_attempts() -> u32 {
    5
}

fn default_vision_endpoint() -> String {
    DEFAULT_VISION_ENDPOINT.to_owned()
}

/// Gate service configuration, read from the environment once at startup.
#[derive(Clone, Deserialize)]
pub struct GateConfig {
    /// Cookie signing secret. Env var: `SECRET`.
    pub secret: String,
    /// Verifies `x-photofind-identity`. Env var: `IDENTITY_SECRET`.
    pub identity_secret: String,
    /// PostgreSQL URL. Unset selects the in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,
    /// TCP port to listen on (default 8080). Env var: `GATE_PORT`.
    #[serde(default = "default_port")]
    pub gate_port: u16,
    #[serde(default = "default_true")]
    pub secure_cookies: bool,
    #[serde(default = "default_ttl_secs")]
    pub access_code_ttl_secs: i64,
    #[serde(default = "default_sweep_secs")]
    pub sweep_interval_secs: u64,
    #[serde(default = "default_tx_max_attempts")]
    pub tx_max_attempts: u32,
    #[serde(default)]
    pub vision_api_key: Option<String>,
    #[serde(default = "default_vision_endpoint")]
    pub vision_endpoint: String,
}

impl fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateConfig")
            .field("secret", &"<redacted>")
            .field("identity_secret", &"<redacted>")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("gate_port", &self.gate_port)
            .field("secure_cookies", &self.secure_cookies)
            .field("access_code_ttl_secs", &self.access_code_ttl_secs)
            .field("sweep_interval_secs", &self.sweep_interval_secs)
            .field("tx_max_attempts", &self.tx_max_attempts)
            .field("vision_api_key", &self.vision_api_key.as_ref().map(|_| "<redacted>"))
            .field("vision_endpoint", &self.vision_endpoint)
            .finish()
    }
}

impl Config for GateConfig {
    fn validate(&self) -> Result<(), String> {
        if self.secret.is_empty() {
            return Err("SECRET must not be empty".to_owned());
        }
        if self.identity_secret.is_empty() {
            return Err("IDENTITY_SECRET must not be empty".to_owned());
        }
        if self.access_code_ttl_secs <= 0 {
            return Err("ACCESS_CODE_TTL_SECS must be positive".to_owned());
        }
        if self.sweep_interval_secs == 0 {
            return Err("SWEEP_INTERVAL_SECS must be positive".to_owned());
        }
        if self.tx_max_attempts == 0 {
            return Err("TX_MAX_ATTEMPTS must be at least 1".to_owned());
        }
        Ok(())
    }
}

impl GateConfig {
    pub fn code_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.access_code_ttl_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_attempts(self.tx_max_attempts)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Empty strings count as unset.
    pub fn vision_api_key(&self) -> Option<&str> {
        self.vision_api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|u| !u.is_empty())
    }
}
