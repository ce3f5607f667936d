//! Error types for store operations.

use thiserror::Error;

/// Errors that can occur during artifact store operations.
///
/// Read operations never fail on absence: a missing workflow, version, or
/// pointer surfaces as `None` from the operation itself. The variants here
/// cover refusals (conflict, rollback to a missing target) and transport
/// failures, which are propagated without internal retries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Workflow name is empty or would break the key layout.
    #[error("invalid workflow name: {0:?}")]
    InvalidWorkflowName(String),

    /// Version identifier is empty or would break the key layout.
    #[error("invalid version id: {0:?}")]
    InvalidVersionId(String),

    /// Attempted overwrite of an existing version without force.
    #[error("version '{version}' of workflow '{workflow}' already exists; re-deploy with force or pick a new version")]
    Conflict {
        /// Workflow name.
        workflow: String,
        /// Version that already has objects.
        version: String,
    },

    /// A write operation named a version that does not exist.
    #[error("version '{version}' of workflow '{workflow}' not found")]
    VersionNotFound {
        /// Workflow name.
        workflow: String,
        /// The missing version.
        version: String,
    },

    /// Rollback was requested but no older version exists.
    #[error("workflow '{workflow}' has no version to roll back to")]
    NoRollbackTarget {
        /// Workflow name.
        workflow: String,
    },

    /// Object store backend could not be constructed.
    #[error("failed to create object store backend: {0}")]
    Backend(String),

    /// Object store connectivity or auth failure.
    #[error("object store operation failed for '{key}': {source}")]
    Transport {
        /// Key the operation was addressing.
        key: String,
        /// Underlying object store error.
        source: object_store::Error,
    },

    /// Metadata record could not be serialized.
    #[error("failed to encode metadata: {0}")]
    MetadataEncode(#[from] serde_json::Error),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
