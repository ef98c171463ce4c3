//! Filter, search and sort pipeline over the task collection.
//!
//! # Responsibility
//! - Produce the ordered view for a given filter/search/sort state.
//! - Never mutate the input collection.
//!
//! # Invariants
//! - Stages compose in fixed order: filter, then search, then sort.
//! - All sorts are stable, so ties keep their relative insertion order.
//! - Undated tasks order after every dated task under the due-date sort.

use crate::model::task::Task;
use std::cmp::Ordering;

/// Completion-state filter stage criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Keep everything.
    #[default]
    All,
    /// Keep tasks not yet completed.
    Active,
    /// Keep completed tasks.
    Completed,
}

/// Sort stage criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Ascending creation time.
    #[default]
    Created,
    /// Ascending due date; undated tasks last.
    DueDate,
    /// Descending severity, high before low.
    Priority,
}

/// Builds the ordered view of `tasks` for the given criteria.
///
/// Pure: identical arguments yield equal results and the input slice is left
/// untouched. The returned vector is newly constructed.
pub fn view(tasks: &[Task], filter: StatusFilter, search: &str, sort: SortKey) -> Vec<Task> {
    let needle = search.to_lowercase();
    let mut selected: Vec<Task> = tasks
        .iter()
        .filter(|task| matches_filter(task, filter))
        .filter(|task| needle.is_empty() || matches_search(task, &needle))
        .cloned()
        .collect();
    sort_tasks(&mut selected, sort);
    selected
}

fn matches_filter(task: &Task, filter: StatusFilter) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Active => !task.completed,
        StatusFilter::Completed => task.completed,
    }
}

fn matches_search(task: &Task, needle_lower: &str) -> bool {
    task.title.to_lowercase().contains(needle_lower)
        || task.description.to_lowercase().contains(needle_lower)
}

fn sort_tasks(tasks: &mut [Task], sort: SortKey) {
    match sort {
        SortKey::Created => tasks.sort_by_key(|task| task.created_at),
        SortKey::DueDate => {
            tasks.sort_by(|a, b| cmp_due_date(a.due_date.as_deref(), b.due_date.as_deref()));
        }
        SortKey::Priority => tasks.sort_by(|a, b| b.priority.cmp(&a.priority)),
    }
}

// `YYYY-MM-DD` strings compare chronologically, so plain string comparison is
// enough once absent dates are pushed to the end.
fn cmp_due_date(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
