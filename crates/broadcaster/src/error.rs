//! Errors that abort a broadcast.

use database::DatabaseError;
use thiserror::Error;

/// Failures that stop a save. Provider failures never appear here; they are
/// collected in the report instead.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// The preference value could not be encoded as a document.
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing the admin's own record failed. Nothing else was attempted.
    #[error("failed to save admin preferences: {0}")]
    SaveAdmin(#[source] DatabaseError),

    /// Writing the agent skeleton failed. Nothing else was attempted.
    #[error("failed to save agent skeleton: {0}")]
    SaveSkeleton(#[source] DatabaseError),

    /// Enumerating the user mirrors failed after the admin record was saved.
    #[error("failed to list users: {0}")]
    ListMirrors(#[source] DatabaseError),

    /// Enumerating the user agents failed after the skeleton was saved.
    #[error("failed to list users for prompt update: {0}")]
    ListPromptAgents(#[source] DatabaseError),

    /// The mirror batch failed. Provider updates issued before it may
    /// already have taken effect.
    #[error("failed to update user preferences: {source}")]
    CommitMirrors {
        #[source]
        source: DatabaseError,
        remote_calls: usize,
        remote_failures: usize,
    },
}
