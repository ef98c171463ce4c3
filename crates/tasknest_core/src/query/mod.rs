//! Read-side query pipeline.
//!
//! # Responsibility
//! - Turn the stored collection into the ordered view the UI renders.
//! - Keep every stage pure; the store owns all mutation.

pub mod view;
