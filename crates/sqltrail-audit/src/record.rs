//! Query records.
//!
//! A [`QueryRecord`] holds the metadata of one successfully executed
//! statement. Records are built once and never mutated.

use chrono::Local;
use serde::{Deserialize, Serialize};
use sqltrail_core::options::DEFAULT_TIMESTAMP_FORMAT;
use sqltrail_core::{classify, StatementType};
use uuid::Uuid;

/// Longest SQL preview written into a log line, in characters.
const SQL_PREVIEW_CHARS: usize = 100;

/// Metadata about one executed statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    record_id: Uuid,
    user: String,
    database: String,
    sql: String,
    executed_at: String,
    /// `None` when the driver did not report a count.
    #[serde(skip_serializing_if = "Option::is_none")]
    row_count: Option<u64>,
    statement_type: StatementType,
}

impl QueryRecord {
    /// Start building a record. The statement type defaults to
    /// [`classify`]`(sql)` and the timestamp to the current local time.
    pub fn builder(
        user: impl Into<String>,
        database: impl Into<String>,
        sql: impl Into<String>,
    ) -> QueryRecordBuilder {
        QueryRecordBuilder::new(user, database, sql)
    }

    pub fn record_id(&self) -> Uuid {
        self.record_id
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Formatted execution timestamp, second precision.
    pub fn executed_at(&self) -> &str {
        &self.executed_at
    }

    pub fn row_count(&self) -> Option<u64> {
        self.row_count
    }

    pub fn statement_type(&self) -> StatementType {
        self.statement_type
    }

    /// Format the record as a human-readable log line.
    ///
    /// Format: `[executed_at] TYPE user=... database=... rows=... sql="..."`
    pub fn to_log_line(&self) -> String {
        let rows = match self.row_count {
            Some(n) => n.to_string(),
            None => "unknown".to_string(),
        };
        format!(
            "[{}] {} user={} database={} rows={} sql=\"{}\"",
            self.executed_at,
            self.statement_type,
            self.user,
            self.database,
            rows,
            sql_preview(&self.sql),
        )
    }
}

/// The statement on a single line, in full.
pub(crate) fn sql_single_line(sql: &str) -> String {
    sql.replace(['\n', '\r'], " ")
}

/// Single-line, truncated rendering of a statement.
pub(crate) fn sql_preview(sql: &str) -> String {
    let flat = sql_single_line(sql);
    if flat.chars().count() > SQL_PREVIEW_CHARS {
        let cut: String = flat.chars().take(SQL_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

/// Builder for [`QueryRecord`].
#[derive(Debug)]
pub struct QueryRecordBuilder {
    user: String,
    database: String,
    sql: String,
    executed_at: Option<String>,
    row_count: Option<u64>,
    statement_type: Option<StatementType>,
}

impl QueryRecordBuilder {
    pub fn new(
        user: impl Into<String>,
        database: impl Into<String>,
        sql: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            database: database.into(),
            sql: sql.into(),
            executed_at: None,
            row_count: None,
            statement_type: None,
        }
    }

    /// Set an already formatted timestamp.
    pub fn executed_at(mut self, executed_at: impl Into<String>) -> Self {
        self.executed_at = Some(executed_at.into());
        self
    }

    /// Set the returned/affected row count.
    pub fn row_count(mut self, count: u64) -> Self {
        self.row_count = Some(count);
        self
    }

    /// Set the row count, leaving it unknown for `None`.
    pub fn maybe_row_count(mut self, count: Option<u64>) -> Self {
        self.row_count = count;
        self
    }

    /// Override the classified statement type.
    pub fn statement_type(mut self, statement_type: StatementType) -> Self {
        self.statement_type = Some(statement_type);
        self
    }

    pub fn build(self) -> QueryRecord {
        let statement_type = self
            .statement_type
            .unwrap_or_else(|| classify(&self.sql));
        let executed_at = self
            .executed_at
            .unwrap_or_else(|| Local::now().format(DEFAULT_TIMESTAMP_FORMAT).to_string());

        QueryRecord {
            record_id: Uuid::new_v4(),
            user: self.user,
            database: self.database,
            sql: self.sql,
            executed_at,
            row_count: self.row_count,
            statement_type,
        }
    }
}
