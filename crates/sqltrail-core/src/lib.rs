//! # sqltrail-core
//!
//! Types shared by every sqltrail crate:
//!
//! - [`StatementType`] and [`classify`], the keyword classifier applied to every
//!   executed statement
//! - [`ConnectTarget`], the parsed form of a `<host>/<database>` target string
//! - [`options`], the fixed client options applied to every connection
//! - [`config`], YAML configuration for connections and the audit log

pub mod config;
pub mod options;
pub mod statement;
pub mod target;

pub use config::{AuditConfig, ConfigError, ConnectionConfig, SqltrailConfig};
pub use statement::{classify, ParseStatementTypeError, StatementType};
pub use target::{ConnectTarget, TargetError};
