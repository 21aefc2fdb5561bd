use clap::{Parser, Subcommand};
use sqltrail_core::StatementType;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::exec::{ExecArgs, StatementKind};

#[derive(Parser, Debug)]
#[command(name = "sqltrail", version, about = "Run SQL against MySQL with an audit trail")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect, run statements, and print an audit report.
    Exec {
        /// Configuration file (YAML). Flags override its connection settings.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Target in `<host>[:port]/<database>` form.
        #[arg(long)]
        target: Option<String>,

        #[arg(long)]
        user: Option<String>,

        /// Environment variable holding the password.
        #[arg(long = "password-env")]
        password_env: Option<String>,

        /// Connect as root with an empty password (local development only).
        #[arg(long = "insecure-default", default_value_t = false)]
        insecure_default: bool,

        /// Statement to run. Repeatable; runs in order before `--file`.
        #[arg(long = "sql")]
        sql: Vec<String>,

        /// Script file; statements end with `;` at the end of a line.
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = StatementKind::Auto)]
        kind: StatementKind,

        #[arg(long = "report-user")]
        report_user: Option<String>,

        #[arg(long = "report-database")]
        report_database: Option<String>,

        /// Statement type for the report (SELECT, INSERT, UPDATE, DELETE, ...).
        #[arg(long = "report-type")]
        report_type: Option<StatementType>,

        /// Print the whole audit log as JSON lines instead of a report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the statement type of each SQL string.
    Classify {
        #[arg(required = true)]
        sql: Vec<String>,
    },

    /// Validate a configuration file.
    Check {
        #[arg(long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Exec {
            config,
            target,
            user,
            password_env,
            insecure_default,
            sql,
            file,
            kind,
            report_user,
            report_database,
            report_type,
            json,
        } => {
            commands::exec::run(ExecArgs {
                config,
                target,
                user,
                password_env,
                insecure_default,
                sql,
                file,
                kind,
                report_user,
                report_database,
                report_type,
                json,
            })
            .await
        }
        Command::Classify { sql } => commands::classify::run(&sql),
        Command::Check { config } => commands::check::run(&config),
    }
}
