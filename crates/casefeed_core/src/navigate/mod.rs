//! Document viewer navigation across server pages.

pub mod document_navigator;
