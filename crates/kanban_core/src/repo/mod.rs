//! Persistence layer for board state.
//!
//! # Responsibility
//! - Define the key-value slot contract consumed by the core.
//! - Own the active and deleted task collections stored in those slots.
//!
//! # Invariants
//! - Collections are always written whole, never patched by index.
//! - Read failures degrade to empty collections instead of surfacing.

pub mod slot_store;
pub mod task_store;
