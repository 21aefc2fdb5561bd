//! Integration tests against a live MySQL server.
//!
//! These tests require a running MySQL instance and are skipped otherwise.
//! Set SQLTRAIL_TEST_MYSQL_TARGET (e.g. `localhost:3306/sqltrail_test`),
//! SQLTRAIL_TEST_MYSQL_USER and SQLTRAIL_TEST_MYSQL_PASSWORD.
//!
//! Run with: cargo test --package sqltrail-adapter-mysql --test mysql

use serde_json::json;
use sqltrail_adapter_mysql::MySqlConnector;
use sqltrail_core::StatementType;
use sqltrail_runtime::{DatabaseSession, FAILURE_SENTINEL};

struct LiveTarget {
    target: String,
    user: String,
    password: String,
}

fn live_target() -> Option<LiveTarget> {
    let target = std::env::var("SQLTRAIL_TEST_MYSQL_TARGET").ok()?;
    Some(LiveTarget {
        target,
        user: std::env::var("SQLTRAIL_TEST_MYSQL_USER").unwrap_or_else(|_| "root".to_string()),
        password: std::env::var("SQLTRAIL_TEST_MYSQL_PASSWORD").unwrap_or_default(),
    })
}

async fn session() -> Option<DatabaseSession> {
    let Some(live) = live_target() else {
        eprintln!("SQLTRAIL_TEST_MYSQL_TARGET not set; skipping");
        return None;
    };
    let mut session = DatabaseSession::new(MySqlConnector::new());
    session
        .connect(&live.target, &live.user, &live.password)
        .await
        .unwrap();
    Some(session)
}

#[tokio::test]
async fn test_statements_are_recorded() {
    let Some(mut session) = session().await else {
        return;
    };

    assert_eq!(
        session
            .execute_update("CREATE TEMPORARY TABLE fruit (id INT PRIMARY KEY, name VARCHAR(32))")
            .await,
        0
    );
    assert_eq!(
        session
            .execute_update("INSERT INTO fruit VALUES (1, 'apple'), (2, 'pear'), (3, 'plum')")
            .await,
        3
    );

    let mut rows = session
        .execute_query("SELECT id, name FROM fruit ORDER BY id")
        .await
        .unwrap();
    assert_eq!(rows.columns(), ["id", "name"]);
    assert_eq!(rows.position(), 0);
    rows.next();
    assert_eq!(rows.get("id"), Some(&json!(1)));
    assert_eq!(rows.get("name"), Some(&json!("apple")));
    rows.close();

    assert_eq!(session.execute_update("DELETE FROM fruit WHERE id = 3").await, 1);

    let log = session.audit_log();
    assert_eq!(log.len(), 4);
    let select = &log.records()[2];
    assert_eq!(select.statement_type(), StatementType::Select);
    assert_eq!(select.row_count(), Some(3));
    assert_eq!(log.records()[3].statement_type(), StatementType::Delete);
}

#[tokio::test]
async fn test_malformed_statement() {
    let Some(mut session) = session().await else {
        return;
    };

    assert_eq!(
        session.execute_update("UPDATE WHERE nothing makes sense").await,
        FAILURE_SENTINEL
    );
    assert!(session.audit_log().is_empty());
}

#[tokio::test]
async fn test_update_rejects_row_producing_statement() {
    let Some(mut session) = session().await else {
        return;
    };

    assert_eq!(session.execute_update("SELECT 1").await, FAILURE_SENTINEL);
    assert!(session.audit_log().is_empty());

    // The connection stays usable afterwards
    assert_eq!(session.execute_update("DO 1").await, 0);
    assert_eq!(session.audit_log().len(), 1);
}

#[tokio::test]
async fn test_session_time_zone_is_utc() {
    let Some(mut session) = session().await else {
        return;
    };

    let mut rows = session
        .execute_query("SELECT @@session.time_zone AS tz")
        .await
        .unwrap();
    rows.next();
    assert_eq!(rows.get("tz"), Some(&json!("+00:00")));
}

#[tokio::test]
async fn test_stored_procedures() {
    let Some(mut session) = session().await else {
        return;
    };

    session
        .execute_update("DROP PROCEDURE IF EXISTS sqltrail_list_numbers")
        .await;
    session
        .execute_update(
            "CREATE PROCEDURE sqltrail_list_numbers() SELECT 1 AS n UNION ALL SELECT 2",
        )
        .await;

    let rows = session
        .execute_procedure("{call sqltrail_list_numbers()}")
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let log = session.audit_log();
    let last = log.records().last().unwrap();
    assert_eq!(last.statement_type(), StatementType::StoredProcedure);
    assert_eq!(last.row_count(), Some(2));

    session
        .execute_update("DROP PROCEDURE IF EXISTS sqltrail_list_numbers")
        .await;
}
