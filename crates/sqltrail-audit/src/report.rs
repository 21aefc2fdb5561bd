//! Console reports over the audit log.
//!
//! Each report runs one of the log filters and projects the matches into
//! lines. When nothing matches, the report carries a single "no results"
//! notice instead, which callers print in place of the lines.

use sqltrail_core::StatementType;
use std::fmt;

use crate::log::AuditLog;
use crate::record::{sql_single_line, QueryRecord};

/// Rendered result of an audit log report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
    notice: Option<String>,
}

impl Report {
    /// Statements `user` ran on `database`.
    pub fn user_database(log: &AuditLog, user: &str, database: &str) -> Self {
        let matches = log.filter_by_user_and_database(user, database);
        Self::build(
            &matches,
            |r| {
                format!(
                    "sql={}, executed_at={}, type={}",
                    sql_single_line(r.sql()),
                    r.executed_at(),
                    r.statement_type()
                )
            },
            || format!("user '{user}' has not executed statements on database '{database}'"),
        )
    }

    /// Statements of one type `user` ran on `database`.
    pub fn user_database_type(
        log: &AuditLog,
        user: &str,
        database: &str,
        statement_type: StatementType,
    ) -> Self {
        let matches = log.filter_by_user_database_type(user, database, statement_type);
        Self::build(
            &matches,
            |r| format!("sql={}, executed_at={}", sql_single_line(r.sql()), r.executed_at()),
            || {
                format!(
                    "user '{user}' has not executed {statement_type} statements on database '{database}'"
                )
            },
        )
    }

    /// Statements of one type any user ran on `database`.
    pub fn database_type(log: &AuditLog, database: &str, statement_type: StatementType) -> Self {
        let matches = log.filter_by_database_type(database, statement_type);
        Self::build(
            &matches,
            |r| {
                format!(
                    "sql={}, executed_at={}, user={}",
                    sql_single_line(r.sql()),
                    r.executed_at(),
                    r.user()
                )
            },
            || {
                format!("no {statement_type} statements have been executed on database '{database}'")
            },
        )
    }

    fn build(
        matches: &[&QueryRecord],
        line: impl Fn(&QueryRecord) -> String,
        notice: impl FnOnce() -> String,
    ) -> Self {
        if matches.is_empty() {
            let notice = notice();
            tracing::info!(target: "sqltrail::audit", "{}", notice);
            return Self {
                lines: Vec::new(),
                notice: Some(notice),
            };
        }

        Self {
            lines: matches.iter().map(|r| line(r)).collect(),
            notice: None,
        }
    }

    /// One line per matching record.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The "no results" notice, present only when nothing matched.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref notice) = self.notice {
            return writeln!(f, "[INFO] {notice}");
        }
        for line in &self.lines {
            writeln!(f, "[INFO] {line}")?;
        }
        Ok(())
    }
}
