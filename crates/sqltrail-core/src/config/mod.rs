//! Configuration types for sqltrail.
//!
//! Configuration is loaded from a single YAML file:
//!
//! ```yaml
//! connection:
//!   target: localhost:3306/shop
//!   user: alice
//!   password_env: SQLTRAIL_PASSWORD
//! audit:
//!   echo: true
//!   timestamp_format: "%d-%m-%Y %H:%M:%S"
//! ```

pub mod audit;
pub mod connection;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use audit::AuditConfig;
pub use connection::ConnectionConfig;

/// Complete sqltrail configuration loaded from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqltrailConfig {
    /// Database connection.
    pub connection: ConnectionConfig,

    /// Audit log settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SqltrailConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connection
            .connect_target()
            .map_err(|e| ConfigError::Config(e.to_string()))?;

        if self.audit.timestamp_format.trim().is_empty() {
            return Err(ConfigError::Config(
                "audit.timestamp_format must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_yaml_full() {
        let yaml = r#"
connection:
  target: db.example.com:3307/inventory
  user: alice
  password_env: SQLTRAIL_PASSWORD
audit:
  echo: false
  timestamp_format: "%Y-%m-%d %H:%M:%S"
"#;
        let config = SqltrailConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.connection.user, "alice");
        assert_eq!(
            config.connection.password_env.as_deref(),
            Some("SQLTRAIL_PASSWORD")
        );
        assert!(!config.audit.echo);

        let target = config.connection.connect_target().unwrap();
        assert_eq!(target.database(), "inventory");
        assert_eq!(target.port(), 3307);
    }

    #[test]
    fn test_defaults() {
        let config = SqltrailConfig::from_yaml("connection:\n  target: localhost/shop\n").unwrap();
        assert_eq!(config.connection.user, "root");
        assert_eq!(config.audit, AuditConfig::default());
        assert_eq!(config.audit.timestamp_format, "%d-%m-%Y %H:%M:%S");
        assert!(config.audit.echo);
    }

    #[test]
    fn test_invalid_target_rejected() {
        let err = SqltrailConfig::from_yaml("connection:\n  target: localhost\n").unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }

    #[test]
    fn test_empty_timestamp_format_rejected() {
        let yaml = "connection:\n  target: localhost/shop\naudit:\n  timestamp_format: \"\"\n";
        assert!(matches!(
            SqltrailConfig::from_yaml(yaml),
            Err(ConfigError::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connection:\n  target: localhost/orders\n  user: bob").unwrap();

        let config = SqltrailConfig::from_file(file.path()).unwrap();
        assert_eq!(config.connection.user, "bob");
        assert_eq!(config.connection.target, "localhost/orders");
    }

    #[test]
    fn test_missing_file() {
        let err = SqltrailConfig::from_file("/nonexistent/sqltrail.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
