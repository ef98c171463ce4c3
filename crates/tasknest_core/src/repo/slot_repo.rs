//! Slot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the full task collection as one JSON value under a fixed key.
//! - Load the persisted collection back, rejecting unreadable state.
//!
//! # Invariants
//! - An absent slot loads as an empty collection.
//! - A present but unparseable or invariant-violating slot value surfaces
//!   `SlotError::CorruptData` instead of being masked.
//! - Save failures never leave a partially written slot value (single upsert).

use crate::db::DbError;
use crate::model::task::{validate_collection, Task};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed key under which the serialized collection is stored.
pub const TASKS_SLOT_KEY: &str = "tasks";

pub type SlotResult<T> = Result<T, SlotError>;

/// Persistence-layer error for slot reads and writes.
#[derive(Debug)]
pub enum SlotError {
    /// Durable slot write or read transport failed.
    Db(DbError),
    /// Collection could not be serialized for storage.
    Serialize(serde_json::Error),
    /// Persisted slot value is unreadable as a task collection.
    CorruptData { message: String },
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize task collection: {err}"),
            Self::CorruptData { message } => {
                write!(f, "corrupt persisted task data: {message}")
            }
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::CorruptData { .. } => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage interface for the task collection slot.
///
/// The store is generic over this trait so tests can substitute failing or
/// in-memory implementations.
pub trait SlotRepository {
    fn save_tasks(&self, tasks: &[Task]) -> SlotResult<()>;
    fn load_tasks(&self) -> SlotResult<Vec<Task>>;
}

/// SQLite-backed slot repository.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn save_tasks(&self, tasks: &[Task]) -> SlotResult<()> {
        let value = serde_json::to_string(tasks).map_err(SlotError::Serialize)?;

        self.conn.execute(
            "INSERT INTO slots (slot_key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(slot_key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![TASKS_SLOT_KEY, value],
        )?;

        info!(
            "event=slot_save module=repo status=ok tasks={} bytes={}",
            tasks.len(),
            value.len()
        );
        Ok(())
    }

    fn load_tasks(&self) -> SlotResult<Vec<Task>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE slot_key = ?1;",
                [TASKS_SLOT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(value) = value else {
            info!("event=slot_load module=repo status=ok tasks=0 slot=absent");
            return Ok(Vec::new());
        };

        let tasks: Vec<Task> = serde_json::from_str(&value).map_err(|err| {
            warn!("event=slot_load module=repo status=error error_code=corrupt_slot error={err}");
            SlotError::CorruptData {
                message: err.to_string(),
            }
        })?;

        // Persisted state is re-checked against model invariants on the way in.
        validate_collection(&tasks).map_err(|err| {
            warn!("event=slot_load module=repo status=error error_code=corrupt_slot error={err}");
            SlotError::CorruptData {
                message: err.to_string(),
            }
        })?;

        info!("event=slot_load module=repo status=ok tasks={}", tasks.len());
        Ok(tasks)
    }
}
