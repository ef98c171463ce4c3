use tasknest_core::db::open_db_in_memory;
use tasknest_core::{
    export_tasks, import_tasks, Priority, SqliteSlotRepository, Task, TaskDraft, TaskStore,
    TransferError, EXPORT_FILE_NAME,
};
use uuid::Uuid;

fn sample_tasks() -> Vec<Task> {
    let mut milk = Task::new("Buy milk", 10);
    milk.description = "2 liters".to_string();
    milk.due_date = Some("2024-01-10".to_string());
    milk.priority = Priority::High;
    let mut clean = Task::new("Clean", 20);
    clean.completed = true;
    vec![milk, clean]
}

#[test]
fn export_file_name_convention_is_fixed() {
    assert_eq!(EXPORT_FILE_NAME, "tasks.json");
}

#[test]
fn export_produces_pretty_printed_utf8_json() {
    let document = export_tasks(&sample_tasks()).unwrap();

    let text = String::from_utf8(document).unwrap();
    assert!(text.contains('\n'), "document should be pretty-printed");
    assert!(text.contains("\"dueDate\": \"2024-01-10\""));
    assert!(text.contains("\"priority\": \"high\""));
}

#[test]
fn import_of_export_yields_equal_collection() {
    let tasks = sample_tasks();

    let document = export_tasks(&tasks).unwrap();
    let imported = import_tasks(&document).unwrap();

    assert_eq!(imported, tasks);
}

#[test]
fn imported_collection_replaces_store_contents() {
    let conn = open_db_in_memory().unwrap();
    let mut store = TaskStore::open(SqliteSlotRepository::new(&conn)).unwrap();
    store.create(TaskDraft::new("stale")).unwrap();

    let tasks = sample_tasks();
    let document = export_tasks(&tasks).unwrap();
    let imported = import_tasks(&document).unwrap();
    store.replace_all(imported).unwrap();

    assert_eq!(store.all(), tasks.as_slice());
}

#[test]
fn unknown_priority_fails_and_store_stays_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let mut store = TaskStore::open(SqliteSlotRepository::new(&conn)).unwrap();
    let kept = store.create(TaskDraft::new("kept")).unwrap();

    let document = format!(
        r#"[{{"id":"{}","title":"rush job","priority":"urgent","createdAt":1}}]"#,
        Uuid::new_v4()
    );
    let err = import_tasks(document.as_bytes()).unwrap_err();
    assert!(matches!(err, TransferError::Format { .. }));

    // Nothing was handed to the store, so the collection is untouched.
    assert_eq!(store.all(), &[kept]);
}

#[test]
fn non_array_document_fails_with_format_error() {
    let err = import_tasks(b"{\"tasks\":[]}").unwrap_err();
    assert!(matches!(err, TransferError::Format { .. }));

    let err = import_tasks(b"not json at all").unwrap_err();
    assert!(matches!(err, TransferError::Format { .. }));
}

#[test]
fn invalid_record_is_reported_with_its_index() {
    let document = format!(
        r#"[{{"id":"{}","title":"fine","createdAt":1}},
            {{"id":"{}","title":"","createdAt":2}}]"#,
        Uuid::new_v4(),
        Uuid::new_v4()
    );

    let err = import_tasks(document.as_bytes()).unwrap_err();
    assert!(matches!(err, TransferError::InvalidRecord { index: 1, .. }));
}

#[test]
fn duplicate_ids_in_document_are_rejected() {
    let id = Uuid::new_v4();
    let document = format!(
        r#"[{{"id":"{id}","title":"a","createdAt":1}},
            {{"id":"{id}","title":"b","createdAt":2}}]"#
    );

    let err = import_tasks(document.as_bytes()).unwrap_err();
    assert!(matches!(err, TransferError::DuplicateId(dup) if dup == id));
}

#[test]
fn empty_document_imports_as_empty_collection() {
    let imported = import_tasks(b"[]").unwrap();
    assert!(imported.is_empty());
}
