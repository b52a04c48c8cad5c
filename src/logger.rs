use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use std::{fs::OpenOptions, io::Write, path::Path};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::db::Outcome;

// ------------------ HELPERS ------------------

// Current timestamp in Eastern Time (EST/EDT)
fn now_est() -> DateTime<chrono_tz::Tz> {
    New_York.from_utc_datetime(&Utc::now().naive_utc())
}

// ------------------ DIAGNOSTICS ------------------

// Diagnostics go to stderr; stdout stays the report channel.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

// ------------------ AUDIT TRAIL ------------------

// One line per mutating command: `timestamp | command | target | result`.
pub fn format_audit_line(timestamp: &str, command: &str, target: &str, result: &str) -> String {
    format!("{} | {} | {} | {}", timestamp, command, target, result)
}

pub fn outcome_label(outcome: &Result<Outcome>) -> String {
    match outcome {
        Ok(Outcome::Done) => "SUCCESS".to_string(),
        Ok(Outcome::NotFound) => "NOT_FOUND".to_string(),
        Err(e) => format!("FAILURE ({e})"),
    }
}

// Append an audit event to the log file.
pub fn log_event(log_path: &Path, command: &str, target: &str, result: &str) -> Result<()> {
    let timestamp = now_est().to_rfc3339();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open {}", log_path.display()))?;
    writeln!(file, "{}", format_audit_line(&timestamp, command, target, result))
        .with_context(|| format!("Failed to write {}", log_path.display()))?;
    Ok(())
}

// Audit without letting a logging failure change the command's result.
pub fn audit(log_path: Option<&Path>, command: &str, target: &str, outcome: &Result<Outcome>) {
    let Some(path) = log_path else { return };
    if let Err(e) = log_event(path, command, target, &outcome_label(outcome)) {
        warn!(error = %e, "audit log write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_lines_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");

        audit(Some(&path), "promote", "a@b.co", &Ok(Outcome::Done));
        audit(Some(&path), "promote", "c@d.co", &Ok(Outcome::NotFound));
        audit(Some(&path), "reset-password", "e@f.co", &Err(anyhow::anyhow!("locked")));

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("| promote | a@b.co | SUCCESS"));
        assert!(lines[1].ends_with("| promote | c@d.co | NOT_FOUND"));
        assert!(lines[2].ends_with("| reset-password | e@f.co | FAILURE (locked)"));
    }

    #[test]
    fn disabled_audit_writes_nothing() {
        audit(None, "promote", "a@b.co", &Ok(Outcome::Done));
    }
}
