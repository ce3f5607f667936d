//! Subcommand implementations.

pub mod delete;
pub mod deploy;
pub mod rollback;
pub mod set_latest;
pub mod status;
pub mod versions;
pub mod workflows;

use quay_store::{create_object_store, ArtifactStore};

use crate::config::QuayConfig;

/// Open the artifact store configured in quay.toml.
pub fn open_store(config: &QuayConfig) -> anyhow::Result<ArtifactStore> {
    let backend = create_object_store(&config.storage)?;
    Ok(ArtifactStore::new(backend))
}
