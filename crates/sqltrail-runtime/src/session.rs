//! Database sessions.
//!
//! A [`DatabaseSession`] forwards statements to one driver connection and
//! appends a [`QueryRecord`] to its [`AuditLog`] after every statement that
//! succeeds. Nothing is recorded for failed statements.
//!
//! Failures follow a log-and-degrade policy: the sentinel methods
//! (`execute_query`, `execute_update`, `call_procedure`, `execute_procedure`)
//! log the error and return `None` or [`FAILURE_SENTINEL`]. The `try_*`
//! methods return the underlying [`StatementError`] instead.
//!
//! Sessions are not internally synchronized. Every method takes `&mut self`;
//! to share a session between tasks wrap it in a `tokio::sync::Mutex`.

use sqltrail_audit::{AuditLog, QueryRecord};
use sqltrail_core::options::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USER};
use sqltrail_core::{classify, ConnectTarget};
use tracing::{debug, error, info, warn};

use crate::adapter::{Connector, SqlConnection};
use crate::error::{ConnectionError, StatementError};
use crate::rowset::RowSet;

/// Returned by `execute_update` and `call_procedure` when the statement
/// fails.
pub const FAILURE_SENTINEL: i64 = -1;

struct ActiveConnection {
    connection: Box<dyn SqlConnection>,
    user: String,
    database: String,
}

/// A database connection whose statements are recorded in an audit log.
pub struct DatabaseSession {
    connector: Box<dyn Connector>,
    active: Option<ActiveConnection>,
    log: AuditLog,
}

impl DatabaseSession {
    /// Create a session with no connection and a default audit log.
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self::with_audit_log(connector, AuditLog::default())
    }

    /// Create a session that records into `log`.
    pub fn with_audit_log(connector: impl Connector + 'static, log: AuditLog) -> Self {
        Self {
            connector: Box::new(connector),
            active: None,
            log,
        }
    }

    /// Open a connection to `target` (`<host>[:port]/<database>`).
    ///
    /// Any previous connection is closed first and stays closed if this
    /// fails. The audit log is kept across reconnects. Failures are logged
    /// and returned.
    pub async fn connect(
        &mut self,
        target: &str,
        user: &str,
        password: &str,
    ) -> Result<(), ConnectionError> {
        self.disconnect().await;

        let result = Self::open(self.connector.as_ref(), target, user, password).await;
        match result {
            Ok(active) => {
                info!(
                    connect_target = %target,
                    user = %active.user,
                    database = %active.database,
                    "Connected"
                );
                self.active = Some(active);
                Ok(())
            }
            Err(e) => {
                error!(connect_target = %target, user = %user, error = %e, "Connection failed");
                Err(e)
            }
        }
    }

    /// Connect as the administrative `root` user with an empty password.
    ///
    /// INSECURE: this is meant for throwaway local databases only. Never
    /// use it against a server reachable by anyone else.
    pub async fn connect_with_default_credentials(
        &mut self,
        target: &str,
    ) -> Result<(), ConnectionError> {
        warn!(
            connect_target = %target,
            user = DEFAULT_ADMIN_USER,
            "Connecting with default administrative credentials and an empty password; local development only"
        );
        self.connect(target, DEFAULT_ADMIN_USER, DEFAULT_ADMIN_PASSWORD)
            .await
    }

    async fn open(
        connector: &dyn Connector,
        target: &str,
        user: &str,
        password: &str,
    ) -> Result<ActiveConnection, ConnectionError> {
        let parsed = ConnectTarget::parse(target)?;
        let connection = connector
            .connect(&parsed, user, password)
            .await
            .map_err(|source| ConnectionError::ConnectFailed {
                target: target.to_string(),
                source,
            })?;

        Ok(ActiveConnection {
            connection,
            user: user.to_string(),
            database: parsed.database().to_string(),
        })
    }

    /// Close the current connection, if any.
    pub async fn disconnect(&mut self) {
        if let Some(mut active) = self.active.take() {
            if let Err(e) = active.connection.close().await {
                warn!(database = %active.database, error = %e, "Error while closing connection");
            } else {
                debug!(database = %active.database, "Connection closed");
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.active.is_some()
    }

    /// User of the current connection.
    pub fn user(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.user.as_str())
    }

    /// Database of the current connection.
    pub fn database(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.database.as_str())
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.log
    }

    pub fn into_audit_log(self) -> AuditLog {
        self.log
    }

    /// Run a read statement. The returned row set is positioned before the
    /// first row; the caller closes it.
    pub async fn try_execute_query(&mut self, sql: &str) -> Result<RowSet, StatementError> {
        let active = self.active.as_mut().ok_or(StatementError::NotConnected)?;
        let mut rows = active
            .connection
            .query(sql)
            .await
            .map_err(|source| execution_failed(sql, source))?;

        let count = rows.count_rows() as u64;
        record(&mut self.log, active, sql, Some(count));
        Ok(rows)
    }

    /// Run a write statement and return the number of affected rows.
    pub async fn try_execute_update(&mut self, sql: &str) -> Result<u64, StatementError> {
        let active = self.active.as_mut().ok_or(StatementError::NotConnected)?;
        let affected = active
            .connection
            .execute(sql)
            .await
            .map_err(|source| execution_failed(sql, source))?;

        record(&mut self.log, active, sql, Some(affected));
        Ok(affected)
    }

    /// Run a stored procedure call that changes data. Returns the update
    /// count the driver reports, if any.
    pub async fn try_call_procedure(&mut self, sql: &str) -> Result<Option<u64>, StatementError> {
        let active = self.active.as_mut().ok_or(StatementError::NotConnected)?;
        let updated = active
            .connection
            .call(sql)
            .await
            .map_err(|source| execution_failed(sql, source))?;

        record(&mut self.log, active, sql, updated);
        Ok(updated)
    }

    /// Run a stored procedure call that returns rows.
    pub async fn try_execute_procedure(&mut self, sql: &str) -> Result<RowSet, StatementError> {
        let active = self.active.as_mut().ok_or(StatementError::NotConnected)?;
        let mut rows = active
            .connection
            .call_query(sql)
            .await
            .map_err(|source| execution_failed(sql, source))?;

        let count = rows.count_rows() as u64;
        record(&mut self.log, active, sql, Some(count));
        Ok(rows)
    }

    /// Run a read statement; `None` on failure.
    pub async fn execute_query(&mut self, sql: &str) -> Option<RowSet> {
        self.try_execute_query(sql).await.map_err(report).ok()
    }

    /// Run a write statement; affected rows, or [`FAILURE_SENTINEL`] on
    /// failure.
    pub async fn execute_update(&mut self, sql: &str) -> i64 {
        match self.try_execute_update(sql).await {
            Ok(affected) => clamp(affected),
            Err(e) => {
                report(e);
                FAILURE_SENTINEL
            }
        }
    }

    /// Call a data-changing stored procedure; the reported update count, or
    /// [`FAILURE_SENTINEL`] on failure or when the driver reports none.
    pub async fn call_procedure(&mut self, sql: &str) -> i64 {
        match self.try_call_procedure(sql).await {
            Ok(Some(updated)) => clamp(updated),
            Ok(None) => FAILURE_SENTINEL,
            Err(e) => {
                report(e);
                FAILURE_SENTINEL
            }
        }
    }

    /// Call a row-returning stored procedure; `None` on failure.
    pub async fn execute_procedure(&mut self, sql: &str) -> Option<RowSet> {
        self.try_execute_procedure(sql).await.map_err(report).ok()
    }
}

fn record(log: &mut AuditLog, active: &ActiveConnection, sql: &str, row_count: Option<u64>) {
    let record = QueryRecord::builder(active.user.as_str(), active.database.as_str(), sql)
        .executed_at(log.timestamp_now())
        .maybe_row_count(row_count)
        .statement_type(classify(sql))
        .build();
    log.append(record);
}

fn execution_failed(sql: &str, source: anyhow::Error) -> StatementError {
    StatementError::ExecutionFailed {
        sql: sql.to_string(),
        source,
    }
}

fn report(e: StatementError) {
    error!(error = %e, "Statement failed");
}

fn clamp(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
