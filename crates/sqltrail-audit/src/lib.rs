//! # sqltrail-audit
//!
//! In-memory audit log of executed SQL statements.
//!
//! This crate provides:
//! - [`QueryRecord`]: immutable metadata about one executed statement
//!   (user, database, SQL text, timestamp, row count, statement type)
//! - [`AuditLog`]: append-only, insertion-ordered collection of records with
//!   user/database/type filters
//! - [`Report`]: console projections of filter results, including the
//!   "no results" notice
//!
//! ## Example Usage
//!
//! ```rust
//! use sqltrail_audit::{AuditLog, QueryRecord};
//! use sqltrail_core::StatementType;
//!
//! let mut log = AuditLog::default();
//! log.append(
//!     QueryRecord::builder("alice", "shop", "SELECT * FROM orders")
//!         .row_count(3)
//!         .build(),
//! );
//!
//! let found = log.filter_by_database_type("shop", StatementType::Select);
//! assert_eq!(found.len(), 1);
//! ```

pub mod error;
pub mod log;
pub mod record;
pub mod report;

pub use error::AuditError;
pub use log::{AuditFilter, AuditLog};
pub use record::{QueryRecord, QueryRecordBuilder};
pub use report::Report;
