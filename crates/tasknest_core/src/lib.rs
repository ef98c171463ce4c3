//! Core domain logic for the tasknest task tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod store;
pub mod transfer;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{validate_collection, Priority, Task, TaskId, TaskValidationError};
pub use query::view::{view, SortKey, StatusFilter};
pub use repo::slot_repo::{
    SlotError, SlotRepository, SlotResult, SqliteSlotRepository, TASKS_SLOT_KEY,
};
pub use store::task_store::{
    DueDatePatch, StoreError, StoreResult, TaskDraft, TaskPatch, TaskStore,
};
pub use transfer::{export_tasks, import_tasks, TransferError, TransferResult, EXPORT_FILE_NAME};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
