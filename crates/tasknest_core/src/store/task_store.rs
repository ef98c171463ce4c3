//! Task store use-case service.
//!
//! # Responsibility
//! - Own the authoritative in-memory task collection.
//! - Apply create/update/toggle/delete/replace mutations all-or-nothing.
//! - Persist through the slot repository after every successful mutation.
//!
//! # Invariants
//! - Every record in the collection has a unique, non-nil ID.
//! - `created_at` is non-decreasing in insertion order.
//! - A failed save leaves both memory and the durable slot at the
//!   pre-mutation state.

use crate::model::task::{validate_collection, Priority, Task, TaskId, TaskValidationError};
use crate::repo::slot_repo::{SlotError, SlotRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for mutation and load operations.
#[derive(Debug)]
pub enum StoreError {
    /// Input violates a task record invariant.
    Validation(TaskValidationError),
    /// Operation referenced an ID that is not in the collection.
    NotFound(TaskId),
    /// Durable slot read or write failed.
    Persistence(SlotError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SlotError> for StoreError {
    fn from(value: SlotError) -> Self {
        Self::Persistence(value)
    }
}

/// Input for creating one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<String>,
    pub priority: Priority,
}

impl TaskDraft {
    /// Creates a draft with the given title and field defaults.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date: None,
            priority: Priority::default(),
        }
    }
}

/// Patch applied to the due date of an existing task.
///
/// Distinguishes "set a new date" from "remove the date"; leaving the field
/// out of [`TaskPatch`] means "keep as is".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueDatePatch {
    Set(String),
    Clear,
}

/// Partial update payload for one task.
///
/// `None` fields are left unchanged. `completed` is deliberately absent; it
/// is only ever flipped through [`TaskStore::toggle_complete`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DueDatePatch>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    /// Returns true when applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }
}

/// Owner of the authoritative task collection.
///
/// Generic over the slot repository so callers pick file-backed or in-memory
/// storage and tests can inject failing implementations.
pub struct TaskStore<R: SlotRepository> {
    repo: R,
    tasks: Vec<Task>,
    last_created_at: i64,
}

impl<R: SlotRepository> TaskStore<R> {
    /// Loads the persisted collection and takes ownership of it.
    ///
    /// An absent slot yields an empty store; an unreadable slot surfaces
    /// `StoreError::Persistence` with the corrupt-data cause.
    pub fn open(repo: R) -> StoreResult<Self> {
        let tasks = repo.load_tasks()?;
        let last_created_at = max_created_at(&tasks);
        info!("event=store_open module=store status=ok tasks={}", tasks.len());
        Ok(Self {
            repo,
            tasks,
            last_created_at,
        })
    }

    /// Creates a task from the draft and appends it to the collection.
    ///
    /// Assigns a fresh random ID and a creation timestamp clamped to the
    /// latest known one, so insertion order and `created_at` order agree.
    pub fn create(&mut self, draft: TaskDraft) -> StoreResult<Task> {
        let created_at = self.next_created_at();
        let mut task = Task::new(draft.title, created_at);
        task.description = draft.description;
        task.due_date = draft.due_date;
        task.priority = draft.priority;
        task.validate()?;

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;
        self.last_created_at = created_at;

        info!(
            "event=task_create module=store status=ok id={} priority={}",
            task.id,
            task.priority.as_str()
        );
        Ok(task)
    }

    /// Applies the patch to the task with the given ID.
    pub fn update(&mut self, id: TaskId, patch: &TaskPatch) -> StoreResult<Task> {
        let index = self.index_of(id).ok_or(StoreError::NotFound(id))?;

        let mut next = self.tasks.clone();
        let task = &mut next[index];
        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        match &patch.due_date {
            Some(DueDatePatch::Set(date)) => task.due_date = Some(date.clone()),
            Some(DueDatePatch::Clear) => task.due_date = None,
            None => {}
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        task.validate()?;

        let updated = task.clone();
        self.commit(next)?;

        info!("event=task_update module=store status=ok id={id}");
        Ok(updated)
    }

    /// Flips the completion flag of the task with the given ID.
    pub fn toggle_complete(&mut self, id: TaskId) -> StoreResult<Task> {
        let index = self.index_of(id).ok_or(StoreError::NotFound(id))?;

        let mut next = self.tasks.clone();
        next[index].completed = !next[index].completed;
        let toggled = next[index].clone();
        self.commit(next)?;

        info!(
            "event=task_toggle module=store status=ok id={id} completed={}",
            toggled.completed
        );
        Ok(toggled)
    }

    /// Removes the task with the given ID.
    ///
    /// Deleting an ID that is not present is an idempotent success.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<()> {
        let Some(index) = self.index_of(id) else {
            warn!("event=task_delete module=store status=noop id={id}");
            return Ok(());
        };

        let mut next = self.tasks.clone();
        next.remove(index);
        self.commit(next)?;

        info!("event=task_delete module=store status=ok id={id}");
        Ok(())
    }

    /// Replaces the whole collection, used by document import.
    ///
    /// Every incoming record is validated (including ID uniqueness) before
    /// anything is committed; on failure the prior collection stays intact.
    pub fn replace_all(&mut self, records: Vec<Task>) -> StoreResult<()> {
        validate_collection(&records)?;

        let count = records.len();
        self.commit(records)?;
        self.last_created_at = max_created_at(&self.tasks);

        info!("event=store_replace_all module=store status=ok tasks={count}");
        Ok(())
    }

    /// Read-only snapshot of the collection in insertion order.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn index_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    // Persist first, commit to memory second; either both states advance or
    // neither does.
    fn commit(&mut self, next: Vec<Task>) -> StoreResult<()> {
        self.repo.save_tasks(&next)?;
        self.tasks = next;
        Ok(())
    }

    fn next_created_at(&self) -> i64 {
        now_epoch_ms().max(self.last_created_at)
    }
}

fn max_created_at(tasks: &[Task]) -> i64 {
    tasks.iter().map(|task| task.created_at).max().unwrap_or(0)
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
