//! Versioned schema migrations.
//!
//! `schema_migrations` records every applied version; opening a store applies
//! whatever versions are missing, in order, inside one write transaction.

use rusqlite::{Connection, TransactionBehavior};

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Bring the schema up to [`CURRENT_VERSION`]. Safe to call on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    // Immediate: two processes opening the same file must not both apply v1.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )",
        [],
    )?;

    let current: u32 = tx.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    for version in (current + 1)..=CURRENT_VERSION {
        apply_migration(&tx, version)?;
        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )?;
        tracing::info!(version, "applied schema migration");
    }

    tx.commit()?;
    Ok(())
}

fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => create_certificates(conn),
        other => Err(StoreError::Migration(format!(
            "no migration to schema version {}",
            other
        ))),
    }
}

/// Migration v1: the certificates table.
///
/// `IF NOT EXISTS` so databases written before migrations were tracked are
/// adopted as-is.
fn create_certificates(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS certificates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            video_hash TEXT UNIQUE NOT NULL,      -- caller-supplied digest
            certificate_id TEXT UNIQUE NOT NULL,  -- issued token
            timestamp TEXT NOT NULL,              -- ISO-8601 UTC, trailing Z
            device_info TEXT,
            location TEXT,
            metadata TEXT
        );
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_database_gets_certificates_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"certificates".to_string()));
        assert!(tables.contains(&"schema_migrations".to_string()));
    }

    #[test]
    fn test_repeated_migrate_applies_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap();

        let (rows, version): (u32, u32) = conn
            .query_row(
                "SELECT COUNT(*), MAX(version) FROM schema_migrations",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!((rows, version), (1, CURRENT_VERSION));
    }

    #[test]
    fn test_migration_adopts_legacy_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE certificates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                video_hash TEXT UNIQUE NOT NULL,
                certificate_id TEXT UNIQUE NOT NULL,
                timestamp TEXT NOT NULL,
                device_info TEXT,
                location TEXT,
                metadata TEXT
            );
            INSERT INTO certificates (video_hash, certificate_id, timestamp)
            VALUES ('legacy', 'legacy-id', '2024-01-01T00:00:00Z');",
        )
        .unwrap();

        migrate(&mut conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM certificates", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
