//! # sqltrail-runtime
//!
//! Database sessions with a built-in audit trail.
//!
//! A [`DatabaseSession`] owns one driver connection and one
//! [`AuditLog`](sqltrail_audit::AuditLog). Every statement that executes
//! successfully appends exactly one record to the log before the result is
//! handed back. Failures are logged and reported through sentinel values
//! (`-1` or `None`); the `try_*` methods expose the same failures as
//! [`StatementError`].
//!
//! Drivers plug in through the [`Connector`] and [`SqlConnection`] traits.

pub mod adapter;
pub mod error;
pub mod rowset;
pub mod session;

pub use adapter::{Connector, SqlConnection};
pub use error::{ConnectionError, StatementError};
pub use rowset::{Row, RowSet};
pub use session::{DatabaseSession, FAILURE_SENTINEL};
