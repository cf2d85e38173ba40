//! Command/result envelope for record mutations.
//!
//! # Responsibility
//! - Carry the outcome of a create/update/delete performed outside core.
//! - Tell the feed which source must be refreshed afterwards.
//!
//! # Invariants
//! - Only successful mutations trigger a refresh.

use crate::model::record::SourceType;
use crate::source::SourceError;

/// Kind of mutation performed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    /// Filing completion flag flipped.
    ToggleComplete,
}

impl MutationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ToggleComplete => "toggle_complete",
        }
    }
}

/// Result of one mutation against a folder source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome<T> {
    /// Source whose records changed.
    pub target: SourceType,
    pub kind: MutationKind,
    pub result: Result<T, SourceError>,
}

impl<T> MutationOutcome<T> {
    pub fn success(target: SourceType, kind: MutationKind, payload: T) -> Self {
        Self {
            target,
            kind,
            result: Ok(payload),
        }
    }

    pub fn failure(target: SourceType, kind: MutationKind, error: SourceError) -> Self {
        Self {
            target,
            kind,
            result: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Mutation outcome after the feed reacted to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledMutation<T> {
    /// Payload of the mutation itself.
    pub payload: Result<T, SourceError>,
    /// `None` when no refresh ran (failed mutation); otherwise the refresh result.
    pub refresh: Option<Result<(), SourceError>>,
}

impl<T> SettledMutation<T> {
    /// Returns whether the mutation succeeded and the view was refreshed.
    pub fn is_fully_applied(&self) -> bool {
        self.payload.is_ok() && matches!(self.refresh, Some(Ok(())))
    }
}
