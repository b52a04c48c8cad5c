use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

// Wait this long on a locked store before giving up (the owning app may be running).
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of a maintenance operation that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    NotFound,
}

impl Outcome {
    // Process exit status for this outcome (failures map to 1 in main).
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Done => 0,
            Outcome::NotFound => 2,
        }
    }
}

// Open an existing store for reading and writing.
// The stores belong to other applications, so a missing file is an error, never a fresh db.
pub fn open_store(path: &Path) -> Result<Connection> {
    open_with(path, OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX)
}

// Open an existing store read-only (inspection commands).
pub fn open_store_read_only(path: &Path) -> Result<Connection> {
    open_with(path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
}

fn open_with(path: &Path, flags: OpenFlags) -> Result<Connection> {
    debug!(path = %path.display(), ?flags, "opening store");
    let conn = Connection::open_with_flags(path, flags)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("Failed to set busy timeout")?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_store_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.db");
        assert!(open_store(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn exit_codes_are_distinct() {
        assert_eq!(Outcome::Done.exit_code(), 0);
        assert_eq!(Outcome::NotFound.exit_code(), 2);
    }
}
