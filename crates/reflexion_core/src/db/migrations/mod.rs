//! Journal table layout steps.
//!
//! Each step upgrades a journal file by one layout version; steps run in
//! order inside a single transaction and the reached version is stamped
//! into `PRAGMA user_version` as part of it.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct LayoutStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const LAYOUT_STEPS: &[LayoutStep] = &[LayoutStep {
    version: 1,
    name: "kv_blobs",
    sql: include_str!("0001_kv_blobs.sql"),
}];

/// Layout version this release writes.
pub fn latest_version() -> u32 {
    LAYOUT_STEPS.last().map_or(0, |step| step.version)
}

/// Layout version stamped in the journal file; `0` for a fresh file.
pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Upgrades the journal file to `latest_version()`.
///
/// # Errors
/// - `JournalTooNew` when the file is ahead of this release; nothing runs.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    let target = latest_version();
    if found > target {
        return Err(DbError::JournalTooNew {
            found,
            supported: target,
        });
    }

    let pending: Vec<&LayoutStep> = LAYOUT_STEPS.iter().filter(|s| s.version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!(
            "event=db_layout module=db status=applied version={} step={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_layout module=db status=ok from_version={found} to_version={target} steps={}",
        pending.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_versions_start_at_one_and_increase() {
        let versions: Vec<u32> = LAYOUT_STEPS.iter().map(|s| s.version).collect();
        assert_eq!(versions.first(), Some(&1));
        assert!(versions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn upgrade_is_a_no_op_once_current() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(stored_version(&conn).unwrap(), 0);

        apply_migrations(&mut conn).unwrap();
        assert_eq!(stored_version(&conn).unwrap(), latest_version());

        apply_migrations(&mut conn).unwrap();
        assert_eq!(stored_version(&conn).unwrap(), latest_version());
    }
}
