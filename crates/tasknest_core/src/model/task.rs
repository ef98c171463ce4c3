//! Task record domain model.
//!
//! # Responsibility
//! - Define the canonical task record owned by the store.
//! - Provide record-level and collection-level validation.
//!
//! # Invariants
//! - `id` is stable, non-nil and never reused for another task.
//! - `title` is non-empty after trimming.
//! - `due_date`, when set, is a `YYYY-MM-DD` calendar date.
//! - `completed` starts as `false` and is only flipped by the store toggle.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every task record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

// Calendar date without a time component; lexicographic order on this shape
// equals chronological order.
static DUE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid due date regex"));

/// Task urgency level.
///
/// Ordering is derived low-to-high so severity comparisons read naturally
/// (`High > Medium > Low`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Stable lowercase token used in logs and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// One user-created to-do item.
///
/// Serialized with camelCase field names so the persisted slot value and the
/// exported document share a single wire schema. Unknown fields and unknown
/// priority values are rejected at deserialization time instead of being
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Task {
    /// Stable unique ID, assigned at creation, immutable afterwards.
    pub id: TaskId,
    /// Human-readable summary; must stay non-empty after trimming.
    pub title: String,
    /// Free-form details; empty string when absent.
    #[serde(default)]
    pub description: String,
    /// Calendar date in `YYYY-MM-DD` form, no time component.
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Flipped only by the store toggle operation.
    #[serde(default)]
    pub completed: bool,
    /// Unix epoch milliseconds at creation; default sort key.
    pub created_at: i64,
}

impl Task {
    /// Creates a task with a fresh random ID and field defaults.
    ///
    /// The caller supplies `created_at` so the store can keep creation
    /// timestamps non-decreasing in insertion order.
    pub fn new(title: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            due_date: None,
            priority: Priority::default(),
            completed: false,
            created_at,
        }
    }

    /// Checks record-level invariants.
    ///
    /// # Errors
    /// - `NilId` when the ID is the nil UUID.
    /// - `EmptyTitle` when the title is empty or whitespace-only.
    /// - `InvalidDueDate` when a due date is present but not a plausible
    ///   `YYYY-MM-DD` value.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if let Some(due_date) = self.due_date.as_deref() {
            if !is_valid_due_date(due_date) {
                return Err(TaskValidationError::InvalidDueDate(due_date.to_string()));
            }
        }
        Ok(())
    }
}

/// Checks every record plus cross-record ID uniqueness.
///
/// Used by wholesale replacement paths (import, slot load) where a single bad
/// record must reject the whole collection.
pub fn validate_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());
    for task in tasks {
        task.validate()?;
        if !seen.insert(task.id) {
            return Err(TaskValidationError::DuplicateId(task.id));
        }
    }
    Ok(())
}

fn is_valid_due_date(value: &str) -> bool {
    let Some(caps) = DUE_DATE_RE.captures(value) else {
        return false;
    };
    let month: u32 = caps[2].parse().unwrap_or(0);
    let day: u32 = caps[3].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Record-level invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task ID is the nil UUID.
    NilId,
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Due date is not a plausible `YYYY-MM-DD` value.
    InvalidDueDate(String),
    /// Two records in one collection share an ID.
    DuplicateId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::EmptyTitle => write!(f, "task title must not be empty"),
            Self::InvalidDueDate(value) => {
                write!(f, "invalid due date `{value}`; expected YYYY-MM-DD")
            }
            Self::DuplicateId(id) => write!(f, "duplicate task id: {id}"),
        }
    }
}

impl Error for TaskValidationError {}
