use anyhow::Context;
use async_trait::async_trait;
use futures::TryStreamExt;
use sqltrail_core::options::{CHARSET, SERVER_TIME_ZONE};
use sqltrail_core::ConnectTarget;
use sqltrail_runtime::{Connector, RowSet, SqlConnection};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Either, Executor};
use std::borrow::Cow;

pub mod decode;

/// Build client options for `target`, with the fixed charset and session
/// time zone.
pub fn connect_options(target: &ConnectTarget, user: &str, password: &str) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(target.host())
        .port(target.port())
        .database(target.database())
        .username(user)
        .password(password)
        .charset(CHARSET)
        .timezone(Some(SERVER_TIME_ZONE.to_string()))
}

/// Rewrite a JDBC call escape (`{call proc(args)}`) into MySQL's
/// `CALL proc(args)`. Anything else is returned unchanged.
pub fn translate_call_escape(sql: &str) -> Cow<'_, str> {
    let Some(inner) = sql
        .trim()
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
    else {
        return Cow::Borrowed(sql);
    };

    let inner = inner.trim();
    let is_call = inner
        .get(..4)
        .is_some_and(|kw| kw.eq_ignore_ascii_case("call"))
        && inner[4..].starts_with(char::is_whitespace);

    if is_call {
        Cow::Owned(format!("CALL {}", inner[4..].trim_start()))
    } else {
        Cow::Borrowed(sql)
    }
}

/// Opens MySQL connections through sqlx.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

impl MySqlConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    async fn connect(
        &self,
        target: &ConnectTarget,
        user: &str,
        password: &str,
    ) -> anyhow::Result<Box<dyn SqlConnection>> {
        let options = connect_options(target, user, password);
        let conn = MySqlConnection::connect_with(&options)
            .await
            .with_context(|| format!("connecting to {} as '{}'", target, user))?;

        tracing::debug!(
            host = %target.host(),
            port = target.port(),
            "MySQL connection established"
        );
        Ok(Box::new(MySqlDriverConnection { conn: Some(conn) }))
    }
}

/// One sqlx MySQL connection. Statements go over the text protocol, the
/// same path an interactive client uses.
pub struct MySqlDriverConnection {
    conn: Option<MySqlConnection>,
}

impl MySqlDriverConnection {
    fn conn(&mut self) -> anyhow::Result<&mut MySqlConnection> {
        self.conn
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("connection is closed"))
    }

    async fn fetch_rows(&mut self, sql: &str) -> anyhow::Result<RowSet> {
        let conn = self.conn()?;
        let rows = conn.fetch_all(sqlx::raw_sql(sql)).await?;
        Ok(decode::row_set(&rows))
    }
}

#[async_trait]
impl SqlConnection for MySqlDriverConnection {
    async fn query(&mut self, sql: &str) -> anyhow::Result<RowSet> {
        self.fetch_rows(sql).await
    }

    /// Fails if the statement produces rows; reads go through `query`.
    async fn execute(&mut self, sql: &str) -> anyhow::Result<u64> {
        let conn = self.conn()?;
        let mut results = conn.fetch_many(sqlx::raw_sql(sql));
        let mut affected = 0;
        while let Some(item) = results.try_next().await? {
            match item {
                Either::Left(result) => affected += result.rows_affected(),
                Either::Right(_) => anyhow::bail!("statement returned rows: {}", sql),
            }
        }
        Ok(affected)
    }

    async fn call(&mut self, sql: &str) -> anyhow::Result<Option<u64>> {
        let sql = translate_call_escape(sql);
        let conn = self.conn()?;
        let result = conn.execute(sqlx::raw_sql(&sql)).await?;
        Ok(Some(result.rows_affected()))
    }

    async fn call_query(&mut self, sql: &str) -> anyhow::Result<RowSet> {
        let sql = translate_call_escape(sql);
        self.fetch_rows(&sql).await
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().await?;
        }
        Ok(())
    }
}
