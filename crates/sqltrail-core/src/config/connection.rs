//! Connection configuration.
//!
//! Credentials can come from the config file directly or from an environment
//! variable. The environment variable wins when both are present.

use serde::{Deserialize, Serialize};

use crate::options::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USER};
use crate::target::{ConnectTarget, TargetError};

/// Configuration for the database connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Target in `<host>[:port]/<database>` form.
    pub target: String,

    /// Username for the connection.
    #[serde(default = "default_user")]
    pub user: String,

    /// Environment variable containing the password. Highest precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Password in clear text (development only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ConnectionConfig {
    pub fn new(target: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            user: user.into(),
            password_env: None,
            password: None,
        }
    }

    /// Parse the configured target.
    pub fn connect_target(&self) -> Result<ConnectTarget, TargetError> {
        ConnectTarget::parse(&self.target)
    }

    /// Resolve the password: `password_env` first, then `password`, else empty.
    pub fn resolve_password(&self) -> String {
        if let Some(env_var) = &self.password_env
            && let Ok(password) = std::env::var(env_var)
        {
            return password;
        }
        self.password
            .clone()
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string())
    }

    /// Whether this configuration connects with the insecure default
    /// administrative account and no password.
    pub fn uses_insecure_default(&self) -> bool {
        self.user == DEFAULT_ADMIN_USER && self.resolve_password().is_empty()
    }
}

fn default_user() -> String {
    DEFAULT_ADMIN_USER.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_from_config() {
        let config = ConnectionConfig {
            password: Some("secret".to_string()),
            ..ConnectionConfig::new("localhost/shop", "alice")
        };
        assert_eq!(config.resolve_password(), "secret");
        assert!(!config.uses_insecure_default());
    }

    #[test]
    fn test_password_env_wins() {
        // SAFETY: test-only variable name, not read concurrently elsewhere
        unsafe {
            std::env::set_var("SQLTRAIL_TEST_CONN_PASSWORD", "from-env");
        }
        let config = ConnectionConfig {
            password_env: Some("SQLTRAIL_TEST_CONN_PASSWORD".to_string()),
            password: Some("from-file".to_string()),
            ..ConnectionConfig::new("localhost/shop", "alice")
        };
        assert_eq!(config.resolve_password(), "from-env");

        // SAFETY: cleanup in test
        unsafe {
            std::env::remove_var("SQLTRAIL_TEST_CONN_PASSWORD");
        }
    }

    #[test]
    fn test_missing_env_falls_back() {
        let config = ConnectionConfig {
            password_env: Some("SQLTRAIL_TEST_UNSET_PASSWORD".to_string()),
            password: Some("fallback".to_string()),
            ..ConnectionConfig::new("localhost/shop", "alice")
        };
        assert_eq!(config.resolve_password(), "fallback");
    }

    #[test]
    fn test_insecure_default() {
        let config = ConnectionConfig::new("localhost/shop", "root");
        assert_eq!(config.resolve_password(), "");
        assert!(config.uses_insecure_default());
    }
}
