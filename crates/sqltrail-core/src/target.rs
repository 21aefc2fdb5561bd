//! Connection target parsing.
//!
//! A target has the form `<host>[:port]/<database>`. The host is everything
//! before the first `/` and the database name everything after the last one.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default MySQL port, used when the target has no `:port` suffix.
pub const DEFAULT_PORT: u16 = 3306;

/// Errors produced while parsing a connection target string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("connection target '{0}' has no '/<database>' segment")]
    MissingDatabase(String),

    #[error("connection target '{0}' has no host")]
    MissingHost(String),

    #[error("connection target '{target}' has an invalid port '{port}'")]
    InvalidPort { target: String, port: String },
}

/// A parsed `<host>[:port]/<database>` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    host: String,
    port: u16,
    database: String,
}

impl ConnectTarget {
    /// Parse a target string.
    pub fn parse(target: &str) -> Result<Self, TargetError> {
        let trimmed = target.trim();
        let (address, database) = match (trimmed.split_once('/'), trimmed.rsplit_once('/')) {
            (Some((address, _)), Some((_, database))) => (address, database),
            _ => return Err(TargetError::MissingDatabase(target.to_string())),
        };

        if database.is_empty() {
            return Err(TargetError::MissingDatabase(target.to_string()));
        }
        if address.is_empty() {
            return Err(TargetError::MissingHost(target.to_string()));
        }

        let (host, port) = match address.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| TargetError::InvalidPort {
                    target: target.to_string(),
                    port: port.to_string(),
                })?;
                (host, port)
            }
            None => (address, DEFAULT_PORT),
        };

        if host.is_empty() {
            return Err(TargetError::MissingHost(target.to_string()));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            database: database.to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Database name: the last path segment of the target.
    pub fn database(&self) -> &str {
        &self.database
    }
}

impl FromStr for ConnectTarget {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ConnectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
    }
}
