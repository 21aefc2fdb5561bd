//! Fixed client options applied to every connection.
//!
//! Every session connects with unicode enabled and the server session time
//! zone forced to UTC, regardless of configuration.

/// Character set requested for every connection.
pub const CHARSET: &str = "utf8mb4";

/// Session time zone requested for every connection.
pub const SERVER_TIME_ZONE: &str = "+00:00";

/// Administrative user used by
/// `DatabaseSession::connect_with_default_credentials`.
///
/// Paired with an empty password. Only for trusted local development.
pub const DEFAULT_ADMIN_USER: &str = "root";

/// Password paired with [`DEFAULT_ADMIN_USER`].
pub const DEFAULT_ADMIN_PASSWORD: &str = "";

/// Timestamp format for audit records: `day-month-year hour:minute:second`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";
