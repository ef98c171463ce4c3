//! Authoritative task collection ownership.
//!
//! # Responsibility
//! - Orchestrate validation, mutation and persistence behind one API.
//! - Keep UI layers decoupled from storage details.
//!
//! # Invariants
//! - The store is the sole mutator of the collection.
//! - Every successful mutation is persisted before it returns.

pub mod task_store;
