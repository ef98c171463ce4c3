//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tasknest_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use tasknest_core::db::open_db_in_memory;
use tasknest_core::{view, SortKey, SqliteSlotRepository, StatusFilter, TaskDraft, TaskStore};

fn main() {
    println!("tasknest_core ping={}", tasknest_core::ping());
    println!("tasknest_core version={}", tasknest_core::core_version());

    match smoke_roundtrip() {
        Ok(summary) => println!("tasknest_core smoke {summary}"),
        Err(err) => {
            eprintln!("tasknest_core smoke failed: {err}");
            std::process::exit(1);
        }
    }
}

// Exercises store, slot persistence and query pipeline against an in-memory
// database, independently from any UI runtime setup.
fn smoke_roundtrip() -> Result<String, Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let repo = SqliteSlotRepository::new(&conn);
    let mut store = TaskStore::open(repo)?;

    store.create(TaskDraft::new("smoke task"))?;
    let visible = view(store.all(), StatusFilter::Active, "", SortKey::Created);

    Ok(format!("tasks={} visible={}", store.len(), visible.len()))
}
