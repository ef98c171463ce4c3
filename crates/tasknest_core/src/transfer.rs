//! Document import and export for the task collection.
//!
//! # Responsibility
//! - Render the collection as a pretty-printed JSON document for download.
//! - Parse an uploaded document back into a validated collection.
//!
//! # Invariants
//! - The document schema equals the persisted slot schema.
//! - Import rejects non-conformant documents before any record is handed to
//!   the store, so a failed import changes nothing.

use crate::model::task::{Task, TaskId, TaskValidationError};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// File name convention for exported documents.
pub const EXPORT_FILE_NAME: &str = "tasks.json";

pub type TransferResult<T> = Result<T, TransferError>;

/// Import/export-layer error.
#[derive(Debug)]
pub enum TransferError {
    /// Document is not parseable as a task collection.
    Format { message: String },
    /// One parsed record violates a task invariant.
    InvalidRecord {
        index: usize,
        source: TaskValidationError,
    },
    /// Two records in the document share an ID.
    DuplicateId(TaskId),
    /// Collection could not be rendered as a document.
    Serialize(serde_json::Error),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format { message } => write!(f, "invalid task document: {message}"),
            Self::InvalidRecord { index, source } => {
                write!(f, "invalid task record at index {index}: {source}")
            }
            Self::DuplicateId(id) => write!(f, "duplicate task id in document: {id}"),
            Self::Serialize(err) => write!(f, "failed to render task document: {err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Format { .. } => None,
            Self::InvalidRecord { source, .. } => Some(source),
            Self::DuplicateId(_) => None,
            Self::Serialize(err) => Some(err),
        }
    }
}

/// Renders the full collection as a pretty-printed UTF-8 JSON document.
pub fn export_tasks(tasks: &[Task]) -> TransferResult<Vec<u8>> {
    let document = serde_json::to_vec_pretty(tasks).map_err(TransferError::Serialize)?;
    info!(
        "event=tasks_export module=transfer status=ok tasks={} bytes={}",
        tasks.len(),
        document.len()
    );
    Ok(document)
}

/// Parses and validates an uploaded document.
///
/// The returned collection is intended for `TaskStore::replace_all`; callers
/// must not apply anything when this fails.
///
/// # Errors
/// - `Format` when the bytes are not a JSON array of task records (unknown
///   fields and unknown priority values are rejected, not ignored).
/// - `InvalidRecord` when a record parses but violates an invariant.
/// - `DuplicateId` when two records share an ID.
pub fn import_tasks(document: &[u8]) -> TransferResult<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_slice(document).map_err(|err| {
        warn!("event=tasks_import module=transfer status=error error_code=bad_format error={err}");
        TransferError::Format {
            message: err.to_string(),
        }
    })?;

    for (index, task) in tasks.iter().enumerate() {
        task.validate()
            .map_err(|source| TransferError::InvalidRecord { index, source })?;
    }

    let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.id) {
            return Err(TransferError::DuplicateId(task.id));
        }
    }

    info!(
        "event=tasks_import module=transfer status=ok tasks={}",
        tasks.len()
    );
    Ok(tasks)
}
