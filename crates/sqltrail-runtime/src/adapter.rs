use async_trait::async_trait;
use sqltrail_core::ConnectTarget;

use crate::rowset::RowSet;

/// Opens driver connections for a [`DatabaseSession`](crate::DatabaseSession).
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open one connection to `target`, applying the fixed client options
    /// from [`sqltrail_core::options`].
    async fn connect(
        &self,
        target: &ConnectTarget,
        user: &str,
        password: &str,
    ) -> anyhow::Result<Box<dyn SqlConnection>>;
}

/// One open driver connection.
///
/// Implementations release their statement handles before each method
/// returns, on success and on failure.
#[async_trait]
pub trait SqlConnection: Send {
    /// Run a read statement and materialize its rows.
    async fn query(&mut self, sql: &str) -> anyhow::Result<RowSet>;

    /// Run a write statement and return the number of affected rows.
    async fn execute(&mut self, sql: &str) -> anyhow::Result<u64>;

    /// Run a stored procedure call and return the update count the driver
    /// reports, or `None` when it reports none.
    async fn call(&mut self, sql: &str) -> anyhow::Result<Option<u64>>;

    /// Run a stored procedure call that returns rows.
    async fn call_query(&mut self, sql: &str) -> anyhow::Result<RowSet>;

    /// Close the connection. Further calls fail.
    async fn close(&mut self) -> anyhow::Result<()>;
}
