//! Error types for sessions.

use sqltrail_core::TargetError;
use thiserror::Error;

/// Errors raised while opening a connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The target string is not `<host>[:port]/<database>`.
    #[error(transparent)]
    InvalidTarget(#[from] TargetError),

    /// The driver could not open the connection.
    #[error("failed to connect to {target}: {source}")]
    ConnectFailed {
        target: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Errors raised while executing a statement.
#[derive(Debug, Error)]
pub enum StatementError {
    /// The session has no open connection.
    #[error("no open connection; call connect() first")]
    NotConnected,

    /// The driver rejected or failed to run the statement.
    #[error("statement failed: {sql}: {source}")]
    ExecutionFailed {
        sql: String,
        #[source]
        source: anyhow::Error,
    },
}
