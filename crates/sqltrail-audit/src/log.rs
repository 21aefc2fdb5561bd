//! The audit log.
//!
//! [`AuditLog`] keeps every [`QueryRecord`] in insertion order. Records are
//! only ever appended; filters return borrowed views in the original order.

use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use sqltrail_core::{AuditConfig, StatementType};

use crate::error::AuditError;
use crate::record::QueryRecord;

/// Append-only, insertion-ordered collection of query records.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    config: AuditConfig,
    records: Vec<QueryRecord>,
}

impl AuditLog {
    /// Create an empty log with the given configuration.
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        let invalid = StrftimeItems::new(&config.timestamp_format)
            .any(|item| matches!(item, Item::Error));
        if invalid || config.timestamp_format.is_empty() {
            return Err(AuditError::InvalidTimestampFormat(
                config.timestamp_format.clone(),
            ));
        }

        Ok(Self {
            config,
            records: Vec::new(),
        })
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Current local time in the configured timestamp format.
    pub fn timestamp_now(&self) -> String {
        Local::now().format(&self.config.timestamp_format).to_string()
    }

    /// Append a record to the end of the log.
    pub fn append(&mut self, record: QueryRecord) {
        if self.config.echo {
            tracing::info!(
                target: "sqltrail::audit",
                record_id = %record.record_id(),
                user = %record.user(),
                database = %record.database(),
                statement_type = %record.statement_type(),
                "{}",
                record.to_log_line()
            );
        }
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[QueryRecord] {
        &self.records
    }

    /// Records matching every criterion set in `filter`, in insertion order.
    pub fn query(&self, filter: &AuditFilter) -> Vec<&QueryRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Records executed by `user` on `database`.
    pub fn filter_by_user_and_database(&self, user: &str, database: &str) -> Vec<&QueryRecord> {
        self.query(&AuditFilter {
            user: Some(user.to_string()),
            database: Some(database.to_string()),
            ..Default::default()
        })
    }

    /// Records of `statement_type` executed by `user` on `database`.
    pub fn filter_by_user_database_type(
        &self,
        user: &str,
        database: &str,
        statement_type: StatementType,
    ) -> Vec<&QueryRecord> {
        self.query(&AuditFilter {
            user: Some(user.to_string()),
            database: Some(database.to_string()),
            statement_type: Some(statement_type),
        })
    }

    /// Records of `statement_type` executed on `database` by any user.
    pub fn filter_by_database_type(
        &self,
        database: &str,
        statement_type: StatementType,
    ) -> Vec<&QueryRecord> {
        self.query(&AuditFilter {
            database: Some(database.to_string()),
            statement_type: Some(statement_type),
            ..Default::default()
        })
    }

    /// Serialize the log as JSON Lines, one record per line.
    pub fn to_json_lines(&self) -> Result<String, AuditError> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl<'a> IntoIterator for &'a AuditLog {
    type Item = &'a QueryRecord;
    type IntoIter = std::slice::Iter<'a, QueryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Filter for querying the audit log. Unset fields match everything; set
/// fields must match exactly (case-sensitive).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    /// Filter by user.
    pub user: Option<String>,
    /// Filter by database name.
    pub database: Option<String>,
    /// Filter by statement type.
    pub statement_type: Option<StatementType>,
}

impl AuditFilter {
    pub fn matches(&self, record: &QueryRecord) -> bool {
        if let Some(ref user) = self.user
            && record.user() != user.as_str()
        {
            return false;
        }
        if let Some(ref database) = self.database
            && record.database() != database.as_str()
        {
            return false;
        }
        if let Some(statement_type) = self.statement_type
            && record.statement_type() != statement_type
        {
            return false;
        }
        true
    }
}
