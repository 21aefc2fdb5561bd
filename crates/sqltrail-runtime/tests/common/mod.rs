//! In-memory driver used by the session tests.
//!
//! Statements containing `syntax error` fail. Queries return a fixed table;
//! writes report a fixed affected-row count; calls containing `no_count`
//! report no update count.

use async_trait::async_trait;
use serde_json::json;
use sqltrail_core::ConnectTarget;
use sqltrail_runtime::{Connector, Row, RowSet, SqlConnection};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const AFFECTED_ROWS: u64 = 2;

#[derive(Clone, Default)]
pub struct Counters {
    pub connects: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
}

impl Counters {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
pub struct FakeConnector {
    pub counters: Counters,
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(
        &self,
        target: &ConnectTarget,
        user: &str,
        password: &str,
    ) -> anyhow::Result<Box<dyn SqlConnection>> {
        if target.host() == "unreachable" {
            anyhow::bail!("host {} is unreachable", target.host());
        }
        if user == "intruder" || password == "wrong" {
            anyhow::bail!("access denied for user '{}'", user);
        }
        self.counters.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            open: true,
            counters: self.counters.clone(),
        }))
    }
}

pub struct FakeConnection {
    open: bool,
    counters: Counters,
}

impl FakeConnection {
    fn check(&self, sql: &str) -> anyhow::Result<()> {
        if !self.open {
            anyhow::bail!("connection is closed");
        }
        if sql.to_ascii_lowercase().contains("syntax error") {
            anyhow::bail!("You have an error in your SQL syntax near '{}'", sql);
        }
        Ok(())
    }
}

pub fn fruit_table() -> RowSet {
    RowSet::new(
        vec!["id".to_string(), "name".to_string()],
        vec![
            Row::new(vec![json!(1), json!("apple")]),
            Row::new(vec![json!(2), json!("pear")]),
            Row::new(vec![json!(3), json!("plum")]),
        ],
    )
}

#[async_trait]
impl SqlConnection for FakeConnection {
    async fn query(&mut self, sql: &str) -> anyhow::Result<RowSet> {
        self.check(sql)?;
        Ok(fruit_table())
    }

    async fn execute(&mut self, sql: &str) -> anyhow::Result<u64> {
        self.check(sql)?;
        Ok(AFFECTED_ROWS)
    }

    async fn call(&mut self, sql: &str) -> anyhow::Result<Option<u64>> {
        self.check(sql)?;
        if sql.contains("no_count") {
            return Ok(None);
        }
        Ok(Some(AFFECTED_ROWS))
    }

    async fn call_query(&mut self, sql: &str) -> anyhow::Result<RowSet> {
        self.check(sql)?;
        Ok(fruit_table())
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        self.open = false;
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
