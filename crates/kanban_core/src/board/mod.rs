//! Drag-and-drop board mechanics.
//!
//! # Responsibility
//! - Model the drag gesture as an explicit state machine.
//! - Compute column orderings from drop positions.
//!
//! # Invariants
//! - Functions here are pure over task lists; persistence happens in `service`.

pub mod drag;
pub mod reorder;
