//! Implementation of the `quay versions` command.

use quay_core::WorkflowName;

use crate::config::QuayConfig;

pub async fn run(config: &QuayConfig, workflow: &str) -> anyhow::Result<()> {
    let store = crate::commands::open_store(config)?;
    let workflow = WorkflowName::new(workflow);

    let versions = store.list_versions(&workflow).await?;
    if versions.is_empty() {
        println!("No versions found for workflow '{workflow}'.");
        return Ok(());
    }

    let latest = store.latest_version(&workflow).await?;
    for version in &versions {
        if latest.as_ref() == Some(version) {
            println!("{version}  (latest)");
        } else {
            println!("{version}");
        }
    }
    Ok(())
}
