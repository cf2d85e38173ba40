//! Folder-level use-case services.
//!
//! # Responsibility
//! - Orchestrate sources, paging, feed aggregation and navigation per folder.
//! - Keep UI callers decoupled from fetch sequencing details.

pub mod folder_feed_service;
pub mod mutation;
