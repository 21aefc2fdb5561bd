//! Statement type classification.
//!
//! Statements are classified by keyword search, not by parsing. The checks run
//! in a fixed order and the first match wins, so `SELECT ... FOR UPDATE` is a
//! [`StatementType::Select`] and `{call refresh_select_cache()}` is a
//! [`StatementType::StoredProcedure`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse type of an executed SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    /// A JDBC-style `{call ...}` escape.
    StoredProcedure,
    Unknown,
}

/// Keyword checks in precedence order. Keywords are upper case; the statement
/// is upper-cased before matching.
const RULES: [(&str, StatementType); 5] = [
    ("{CALL", StatementType::StoredProcedure),
    ("SELECT", StatementType::Select),
    ("INSERT INTO", StatementType::Insert),
    ("UPDATE", StatementType::Update),
    ("DELETE FROM", StatementType::Delete),
];

/// Classify a SQL statement by case-insensitive substring search.
pub fn classify(sql: &str) -> StatementType {
    let upper = sql.to_ascii_uppercase();
    RULES
        .iter()
        .find(|(keyword, _)| upper.contains(keyword))
        .map(|(_, kind)| *kind)
        .unwrap_or(StatementType::Unknown)
}

impl StatementType {
    /// All statement types, in classification order followed by `Unknown`.
    pub const ALL: [StatementType; 6] = [
        StatementType::StoredProcedure,
        StatementType::Select,
        StatementType::Insert,
        StatementType::Update,
        StatementType::Delete,
        StatementType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::StoredProcedure => "STORED_PROCEDURE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether statements of this type are expected to return rows.
    pub fn returns_rows(&self) -> bool {
        matches!(self, Self::Select)
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a statement type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown statement type '{0}' (expected SELECT, INSERT, UPDATE, DELETE, STORED_PROCEDURE or UNKNOWN)")]
pub struct ParseStatementTypeError(pub String);

impl FromStr for StatementType {
    type Err = ParseStatementTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "SELECT" => Ok(Self::Select),
            "INSERT" => Ok(Self::Insert),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "STORED_PROCEDURE" | "PROCEDURE" | "CALL" => Ok(Self::StoredProcedure),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(ParseStatementTypeError(s.to_string())),
        }
    }
}
