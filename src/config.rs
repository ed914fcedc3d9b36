//! Service configuration: serialized defaults overlaid with `BUDGET_*` environment variables.
//!
//! Nested keys use `__`, e.g. `BUDGET_IDENTITY__SECRET_KEY`.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub const ENV_PREFIX: &str = "BUDGET_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app_name: String,
    pub environment: String,
    pub loglevel: String,
    pub database_url: String,
    pub listen_addr: String,
    pub identity: IdentityConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Userinfo endpoint that accepts the caller's bearer token and returns `sub`.
    pub verify_url: Url,
    /// Backend users collection; the subject id is appended as a path segment.
    pub users_url: Url,
    pub secret_key: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Envelope Budget API".to_string(),
            environment: "development".to_string(),
            loglevel: "info".to_string(),
            database_url: "sqlite://budget.sqlite".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            identity: IdentityConfig::default(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            verify_url: Url::parse("https://api.clerk.com/oauth/userinfo")
                .expect("default verify url is valid"),
            users_url: Url::parse("https://api.clerk.com/v1/users/")
                .expect("default users url is valid"),
            secret_key: String::new(),
            timeout_secs: 10,
        }
    }
}

// Keeps the backend secret out of logs.
impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("verify_url", &self.verify_url.as_str())
            .field("users_url", &self.users_url.as_str())
            .field("secret_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}
