//! Audit log configuration.

use serde::{Deserialize, Serialize};

use crate::options::DEFAULT_TIMESTAMP_FORMAT;

/// Configuration for the in-memory audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Whether each appended record is echoed as a log line.
    #[serde(default = "default_echo")]
    pub echo: bool,

    /// chrono format string for `executed_at`.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            echo: default_echo(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

fn default_echo() -> bool {
    true
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}
