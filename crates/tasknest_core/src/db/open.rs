//! Connection bootstrap and schema migrations.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Apply pending slot-table migrations before returning a connection.
//!
//! # Invariants
//! - Returned connections have all migrations applied.
//! - Databases with a schema version newer than this binary are refused.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: "CREATE TABLE IF NOT EXISTS slots (
        slot_key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
    );",
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Opens a slot database file and applies all pending migrations.
///
/// # Side effects
/// - Emits `slot_db_open` logging events with status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    info!("event=slot_db_open module=db status=start mode=file");
    let conn = Connection::open(path)?;
    finish_open(conn, "file")
}

/// Opens an in-memory slot database and applies all pending migrations.
///
/// # Side effects
/// - Emits `slot_db_open` logging events with status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    info!("event=slot_db_open module=db status=start mode=memory");
    let conn = Connection::open_in_memory()?;
    finish_open(conn, "memory")
}

fn finish_open(mut conn: Connection, mode: &str) -> DbResult<Connection> {
    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!("event=slot_db_open module=db status=ok mode={mode}");
            Ok(conn)
        }
        Err(err) => {
            error!("event=slot_db_open module=db status=error mode={mode} error={err}");
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)
}

fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
