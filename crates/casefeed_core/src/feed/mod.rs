//! Unified activity feed.
//!
//! # Responsibility
//! - Normalize heterogeneous folder records into `ActivityRecord`.
//! - Merge, filter, sort and page the combined activity view.
//!
//! # Invariants
//! - Every function here is pure and side-effect free apart from debug logs.

pub mod aggregate;
pub mod normalize;
pub mod page;
