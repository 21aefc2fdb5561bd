//! `sqltrail check` - validate a configuration file.

use anyhow::{Context, Result};
use sqltrail_audit::AuditLog;
use sqltrail_core::SqltrailConfig;
use std::path::Path;

pub fn run(path: &Path) -> Result<()> {
    let config = SqltrailConfig::from_file(path)
        .with_context(|| format!("loading {}", path.display()))?;
    AuditLog::new(config.audit.clone()).context("audit configuration")?;

    let target = config.connection.connect_target()?;
    println!("✔ {} is valid", path.display());
    println!("  Target:   {}", target);
    println!("  Database: {}", target.database());
    println!("  User:     {}", config.connection.user);

    if config.connection.uses_insecure_default() {
        println!();
        println!(
            "⚠️  Connects as '{}' with an empty password. Local development only.",
            config.connection.user
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_check_valid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "connection:\n  target: localhost/shop\n  user: alice\n  password: secret"
        )
        .unwrap();
        run(file.path()).unwrap();
    }

    #[test]
    fn test_check_rejects_bad_timestamp_format() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "connection:\n  target: localhost/shop\naudit:\n  timestamp_format: \"%Y %!\""
        )
        .unwrap();
        assert!(run(file.path()).is_err());
    }
}
