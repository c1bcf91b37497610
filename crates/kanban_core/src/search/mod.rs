//! Board search entry points.
//!
//! # Responsibility
//! - Derive the visible task subset from search text and priority.
//! - Keep filtering pure so it can run on every keystroke.

pub mod filter;
