//! Server-driven paging for the filings ("movements") table.
//!
//! # Responsibility
//! - Describe filings queries and page envelopes.
//! - Own per-folder paging state behind a single-flight sequence gate.

pub mod controller;
pub mod query;
