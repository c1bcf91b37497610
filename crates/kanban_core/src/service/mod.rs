//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, filter, and reorder calls into UI-level operations.
//! - Keep UI layers decoupled from slot storage details.

pub mod board_service;
