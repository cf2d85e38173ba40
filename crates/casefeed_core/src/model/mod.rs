//! Case-folder data model.
//!
//! # Responsibility
//! - Define the raw record shapes delivered by the folder endpoints.
//! - Define the canonical `ActivityRecord` the feed views operate on.
//!
//! # Invariants
//! - Raw records are never mutated by core logic.
//! - Every activity keeps a borrowed back-reference to its raw record.

pub mod activity;
pub mod record;
