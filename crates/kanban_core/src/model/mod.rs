//! Board domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion moves tasks to a separate collection, never hard-deletes.

pub mod task;
