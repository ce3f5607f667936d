//! Versioned workflow deployment store over object storage.
//!
//! This crate implements the deployment protocol layered on a plain
//! put/get/list/delete object store: immutable bundle+metadata version pairs,
//! a mutable per-workflow `latest` pointer, rollback, and deletion with
//! pointer repair. It is not a general-purpose object storage client; the
//! backend is an injected [`object_store::ObjectStore`] handle.

mod backend;
mod error;
mod store;

pub use backend::{create_object_store, StorageConfig};
pub use error::{StoreError, StoreResult};
pub use store::{ArtifactStore, RollbackOutcome};
