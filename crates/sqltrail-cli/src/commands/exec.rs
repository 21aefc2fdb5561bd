//! `sqltrail exec` command implementation.
//!
//! Connects one session, runs the given statements through it, then prints
//! a report built from the session's audit log.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde_json::Value;
use sqltrail_adapter_mysql::MySqlConnector;
use sqltrail_audit::{AuditLog, Report};
use sqltrail_core::options::DEFAULT_ADMIN_USER;
use sqltrail_core::{classify, AuditConfig, ConnectionConfig, SqltrailConfig, StatementType};
use sqltrail_runtime::{DatabaseSession, RowSet};
use std::path::PathBuf;

/// How each statement is sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatementKind {
    Query,
    Update,
    Call,
    Procedure,
    /// Pick by classification.
    Auto,
}

impl StatementKind {
    /// Resolve `Auto` for a concrete statement.
    pub fn resolve(self, sql: &str) -> StatementKind {
        match self {
            StatementKind::Auto => match classify(sql) {
                StatementType::StoredProcedure => StatementKind::Procedure,
                t if t.returns_rows() => StatementKind::Query,
                _ => StatementKind::Update,
            },
            other => other,
        }
    }
}

#[derive(Debug)]
pub struct ExecArgs {
    pub config: Option<PathBuf>,
    pub target: Option<String>,
    pub user: Option<String>,
    pub password_env: Option<String>,
    pub insecure_default: bool,
    pub sql: Vec<String>,
    pub file: Option<PathBuf>,
    pub kind: StatementKind,
    pub report_user: Option<String>,
    pub report_database: Option<String>,
    pub report_type: Option<StatementType>,
    pub json: bool,
}

/// Which report to print once all statements have run.
#[derive(Debug, PartialEq)]
enum ReportRequest {
    UserDatabase(String, String),
    UserDatabaseType(String, String, StatementType),
    DatabaseType(String, StatementType),
}

fn report_request(args: &ExecArgs) -> Result<Option<ReportRequest>> {
    let request = match (&args.report_user, &args.report_database, args.report_type) {
        (None, None, None) => None,
        (Some(u), Some(d), None) => Some(ReportRequest::UserDatabase(u.clone(), d.clone())),
        (Some(u), Some(d), Some(t)) => {
            Some(ReportRequest::UserDatabaseType(u.clone(), d.clone(), t))
        }
        (None, Some(d), Some(t)) => Some(ReportRequest::DatabaseType(d.clone(), t)),
        _ => bail!(
            "a report needs --report-database plus --report-user, --report-type, or both"
        ),
    };
    Ok(request)
}

/// Split a script into statements on `;` at the end of a line. The
/// terminator is dropped; blank statements are skipped.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in script.lines() {
        let trimmed = line.trim_end();
        if let Some(body) = trimmed.strip_suffix(';') {
            current.push_str(body);
            push_statement(&mut statements, &mut current);
        } else {
            current.push_str(trimmed);
            current.push('\n');
        }
    }
    push_statement(&mut statements, &mut current);
    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let sql = current.trim();
    if !sql.is_empty() {
        statements.push(sql.to_string());
    }
    current.clear();
}

/// Merge the config file (if any) with command-line overrides.
fn resolve_config(args: &ExecArgs) -> Result<SqltrailConfig> {
    let mut config = match &args.config {
        Some(path) => SqltrailConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            let target = args
                .target
                .clone()
                .context("either --config or --target is required")?;
            SqltrailConfig {
                connection: ConnectionConfig::new(target, DEFAULT_ADMIN_USER),
                audit: AuditConfig::default(),
            }
        }
    };

    if let Some(target) = &args.target {
        config.connection.target = target.clone();
    }
    if let Some(user) = &args.user {
        config.connection.user = user.clone();
    }
    if let Some(var) = &args.password_env {
        config.connection.password_env = Some(var.clone());
    }
    config.validate()?;
    Ok(config)
}

pub async fn run(args: ExecArgs) -> Result<()> {
    let report = report_request(&args)?;
    let config = resolve_config(&args)?;

    let mut statements = args.sql.clone();
    if let Some(path) = &args.file {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        statements.extend(split_statements(&script));
    }
    if statements.is_empty() {
        bail!("no statements given; use --sql or --file");
    }

    let log = AuditLog::new(config.audit.clone()).context("audit configuration")?;
    let mut session = DatabaseSession::with_audit_log(MySqlConnector::new(), log);

    if args.insecure_default {
        session
            .connect_with_default_credentials(&config.connection.target)
            .await?;
    } else {
        if config.connection.uses_insecure_default() {
            bail!(
                "refusing to connect as '{}' with an empty password; pass --insecure-default to allow it",
                config.connection.user
            );
        }
        let password = config.connection.resolve_password();
        session
            .connect(&config.connection.target, &config.connection.user, &password)
            .await?;
    }

    let mut failures = 0usize;
    for sql in &statements {
        if !run_statement(&mut session, args.kind.resolve(sql), sql).await {
            failures += 1;
        }
    }
    session.disconnect().await;
    tracing::info!(
        statements = statements.len(),
        failures,
        "Execution finished"
    );

    let log = session.into_audit_log();
    if args.json {
        print!("{}", log.to_json_lines()?);
    } else if let Some(request) = report {
        let report = match request {
            ReportRequest::UserDatabase(u, d) => Report::user_database(&log, &u, &d),
            ReportRequest::UserDatabaseType(u, d, t) => Report::user_database_type(&log, &u, &d, t),
            ReportRequest::DatabaseType(d, t) => Report::database_type(&log, &d, t),
        };
        print!("{}", report);
    }

    if failures > 0 {
        bail!("{} of {} statements failed", failures, statements.len());
    }
    Ok(())
}

/// Run one statement; `false` if it failed. Failures are already logged by
/// the session.
async fn run_statement(session: &mut DatabaseSession, kind: StatementKind, sql: &str) -> bool {
    match kind {
        StatementKind::Query | StatementKind::Procedure => {
            let rows = if kind == StatementKind::Query {
                session.execute_query(sql).await
            } else {
                session.execute_procedure(sql).await
            };
            match rows {
                Some(rows) => {
                    print_rows(rows);
                    true
                }
                None => false,
            }
        }
        StatementKind::Update | StatementKind::Call | StatementKind::Auto => {
            let count = if kind == StatementKind::Call {
                session.call_procedure(sql).await
            } else {
                session.execute_update(sql).await
            };
            if count < 0 {
                return false;
            }
            println!("{} row(s) affected", count);
            true
        }
    }
}

fn print_rows(mut rows: RowSet) {
    if !rows.columns().is_empty() {
        println!("{}", rows.columns().join("\t"));
    }
    let total = rows.len();
    while let Some(row) = rows.next() {
        let cells: Vec<String> = row.values().iter().map(display_cell).collect();
        println!("{}", cells.join("\t"));
    }
    println!("({} row(s))", total);
    rows.close();
}

fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
