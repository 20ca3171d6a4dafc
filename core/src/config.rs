//! Client configuration.
//!
//! `Config` carries everything needed to reach the API: base URL, access
//! token, test-mode flag, idempotency switch, user agent and transport
//! timeout. Tokens are usually read from the environment.

use std::time::Duration;

use crate::error::{Error, Result};

/// Production API root. The trailing slash is required for path resolution.
pub const BASE_URL: &str = "https://api.mollie.com/";

/// Environment variable holding a website-profile API key (`live_`/`test_`).
pub const API_TOKEN_ENV: &str = "MOLLIE_API_TOKEN";

/// Environment variable holding an organization access token (`access_`).
pub const ORG_TOKEN_ENV: &str = "MOLLIE_ORG_TOKEN";

pub(crate) const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub token: Option<String>,
    /// Append `testmode=true` to every request. Only meaningful for
    /// organization tokens; API keys imply their own mode.
    pub testing: bool,
    /// Send an `Idempotency-Key` header on every POST.
    pub idempotency: bool,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            token: None,
            testing: false,
            idempotency: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

impl Config {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Build a config from the API key in `MOLLIE_API_TOKEN`.
    pub fn api_from_env() -> Result<Self> {
        Self::from_env_var(API_TOKEN_ENV)
    }

    /// Build a config from the organization token in `MOLLIE_ORG_TOKEN`.
    pub fn org_from_env() -> Result<Self> {
        Self::from_env_var(ORG_TOKEN_ENV)
    }

    pub fn from_env_var(name: &str) -> Result<Self> {
        match std::env::var(name) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(token.trim())),
            _ => Err(Error::Configuration(format!(
                "environment variable {name} is not set"
            ))),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_testing(mut self, testing: bool) -> Self {
        self.testing = testing;
        self
    }

    pub fn with_idempotency(mut self, idempotency: bool) -> Self {
        self.idempotency = idempotency;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_production() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://api.mollie.com/");
        assert!(config.token.is_none());
        assert!(!config.testing);
        assert!(config.user_agent.starts_with("mollie-core/"));
    }

    #[test]
    fn builder_methods_apply() {
        let config = Config::new("test_abc")
            .with_base_url("http://localhost:3000/")
            .with_testing(true)
            .with_idempotency(true)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.token.as_deref(), Some("test_abc"));
        assert_eq!(config.base_url, "http://localhost:3000/");
        assert!(config.testing);
        assert!(config.idempotency);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn missing_env_var_is_a_configuration_error() {
        let err = Config::from_env_var("MOLLIE_CORE_TEST_UNSET_TOKEN").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
