//! Implementation of the `quay set-latest` command.
//!
//! Raw pointer write with no existence check on the target version; the
//! command warns when the result is a dangling pointer.

use quay_core::{VersionId, WorkflowName};

use crate::config::QuayConfig;

pub async fn run(config: &QuayConfig, workflow: &str, version: &str) -> anyhow::Result<()> {
    let store = crate::commands::open_store(config)?;
    let workflow = WorkflowName::new(workflow);
    let version = VersionId::new(version);

    store.set_latest_version(&workflow, &version).await?;
    println!("Latest pointer for '{workflow}' set to '{version}'.");

    if store.metadata(&workflow, &version).await?.is_none() {
        println!("Warning: version '{version}' has no metadata; the pointer is dangling.");
    }

    Ok(())
}
