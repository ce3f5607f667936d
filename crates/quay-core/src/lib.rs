//! Core types for the quay workflow artifact store.
//!
//! This crate defines the vocabulary shared by the store, the packager, and
//! the CLI: workflow and version identifiers, the deployment metadata record
//! persisted next to each bundle, and the version codec.

pub mod metadata;
pub mod types;
pub mod version;

pub use metadata::{DeploymentMetadata, Trigger};
pub use types::{VersionId, WorkflowName};
pub use version::timestamp_version;
