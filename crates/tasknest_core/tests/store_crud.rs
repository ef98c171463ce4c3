use rusqlite::Connection;
use std::collections::HashSet;
use tasknest_core::db::open_db_in_memory;
use tasknest_core::{
    DueDatePatch, Priority, SlotError, SlotRepository, SlotResult, SqliteSlotRepository,
    StoreError, Task, TaskDraft, TaskPatch, TaskStore, TaskValidationError,
};
use uuid::Uuid;

fn open_store(conn: &Connection) -> TaskStore<SqliteSlotRepository<'_>> {
    TaskStore::open(SqliteSlotRepository::new(conn)).unwrap()
}

#[test]
fn create_appends_record_with_defaults() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let mut draft = TaskDraft::new("Buy milk");
    draft.due_date = Some("2024-01-10".to_string());
    draft.priority = Priority::High;
    let task = store.create(draft).unwrap();

    assert!(!task.id.is_nil());
    assert!(!task.completed);
    assert!(task.created_at > 0);
    assert_eq!(store.all(), &[task]);
}

#[test]
fn create_rejects_empty_title() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let err = store.create(TaskDraft::new("   ")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(TaskValidationError::EmptyTitle)
    ));
    assert!(store.is_empty());
}

#[test]
fn ids_stay_unique_across_operation_sequences() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let first = store.create(TaskDraft::new("a")).unwrap();
    let second = store.create(TaskDraft::new("b")).unwrap();
    store.toggle_complete(second.id).unwrap();
    store.delete(first.id).unwrap();
    store.create(TaskDraft::new("c")).unwrap();
    store.create(TaskDraft::new("d")).unwrap();

    let ids: HashSet<_> = store.all().iter().map(|task| task.id).collect();
    assert_eq!(ids.len(), store.len());
}

#[test]
fn created_at_is_non_decreasing_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    for index in 0..5 {
        store.create(TaskDraft::new(format!("task {index}"))).unwrap();
    }

    let stamps: Vec<i64> = store.all().iter().map(|task| task.created_at).collect();
    assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn update_applies_patch_fields() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let task = store.create(TaskDraft::new("Buy milk")).unwrap();

    let patch = TaskPatch {
        title: Some("Buy oat milk".to_string()),
        description: Some("from the corner shop".to_string()),
        due_date: Some(DueDatePatch::Set("2024-02-01".to_string())),
        priority: Some(Priority::Medium),
    };
    let updated = store.update(task.id, &patch).unwrap();

    assert_eq!(updated.title, "Buy oat milk");
    assert_eq!(updated.description, "from the corner shop");
    assert_eq!(updated.due_date.as_deref(), Some("2024-02-01"));
    assert_eq!(updated.priority, Priority::Medium);
    // Identity and creation metadata stay untouched.
    assert_eq!(updated.id, task.id);
    assert_eq!(updated.created_at, task.created_at);
    assert_eq!(store.all()[0], updated);
}

#[test]
fn update_clears_due_date_explicitly() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let mut draft = TaskDraft::new("Buy milk");
    draft.due_date = Some("2024-01-10".to_string());
    let task = store.create(draft).unwrap();

    let noop = TaskPatch::default();
    assert!(noop.is_empty());
    let untouched = store.update(task.id, &noop).unwrap();
    assert_eq!(untouched.due_date.as_deref(), Some("2024-01-10"));

    let patch = TaskPatch {
        due_date: Some(DueDatePatch::Clear),
        ..TaskPatch::default()
    };
    let cleared = store.update(task.id, &patch).unwrap();
    assert_eq!(cleared.due_date, None);
}

#[test]
fn update_rejects_empty_title_and_keeps_record() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let task = store.create(TaskDraft::new("Buy milk")).unwrap();

    let patch = TaskPatch {
        title: Some(String::new()),
        ..TaskPatch::default()
    };
    let err = store.update(task.id, &patch).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(TaskValidationError::EmptyTitle)
    ));
    assert_eq!(store.all()[0].title, "Buy milk");
}

#[test]
fn update_missing_id_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let missing = Uuid::new_v4();
    let err = store.update(missing, &TaskPatch::default()).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
}

#[test]
fn toggle_flips_completed_back_and_forth() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let task = store.create(TaskDraft::new("Buy milk")).unwrap();

    let toggled = store.toggle_complete(task.id).unwrap();
    assert!(toggled.completed);

    let toggled_back = store.toggle_complete(task.id).unwrap();
    assert!(!toggled_back.completed);
}

#[test]
fn toggle_missing_id_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let missing = Uuid::new_v4();
    let err = store.toggle_complete(missing).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
}

#[test]
fn delete_removes_record_and_absent_delete_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let task = store.create(TaskDraft::new("Buy milk")).unwrap();

    store.delete(task.id).unwrap();
    assert!(store.is_empty());

    store.delete(task.id).unwrap();
    store.delete(Uuid::new_v4()).unwrap();
    assert!(store.is_empty());
}

#[test]
fn replace_all_swaps_collection_wholesale() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    store.create(TaskDraft::new("old")).unwrap();

    let incoming = vec![Task::new("new a", 10), Task::new("new b", 20)];
    store.replace_all(incoming.clone()).unwrap();

    assert_eq!(store.all(), incoming.as_slice());
}

#[test]
fn replace_all_is_all_or_nothing() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let kept = store.create(TaskDraft::new("kept")).unwrap();

    let incoming = vec![Task::new("fine", 10), Task::new("", 20)];
    let err = store.replace_all(incoming).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(TaskValidationError::EmptyTitle)
    ));
    assert_eq!(store.all(), &[kept]);
}

#[test]
fn replace_all_rejects_duplicate_ids() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let first = Task::new("a", 10);
    let mut second = Task::new("b", 20);
    second.id = first.id;

    let err = store.replace_all(vec![first, second]).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(TaskValidationError::DuplicateId(_))
    ));
}

#[test]
fn every_mutation_is_persisted_before_returning() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let task = store.create(TaskDraft::new("Buy milk")).unwrap();
    store.toggle_complete(task.id).unwrap();

    // A second store over the same database must observe the mutations.
    let reloaded = open_store(&conn);
    assert_eq!(reloaded.len(), 1);
    assert!(reloaded.all()[0].completed);

    store.delete(task.id).unwrap();
    let reloaded = open_store(&conn);
    assert!(reloaded.is_empty());
}

struct FailingSaveRepository;

impl SlotRepository for FailingSaveRepository {
    fn save_tasks(&self, _tasks: &[Task]) -> SlotResult<()> {
        Err(SlotError::Db(rusqlite::Error::QueryReturnedNoRows.into()))
    }

    fn load_tasks(&self) -> SlotResult<Vec<Task>> {
        Ok(Vec::new())
    }
}

#[test]
fn failed_save_leaves_memory_unchanged() {
    let mut store = TaskStore::open(FailingSaveRepository).unwrap();

    let err = store.create(TaskDraft::new("Buy milk")).unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));
    assert!(store.is_empty());
}
