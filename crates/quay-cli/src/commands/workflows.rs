//! Implementation of the `quay workflows` command.

use crate::config::QuayConfig;

pub async fn run(config: &QuayConfig) -> anyhow::Result<()> {
    let store = crate::commands::open_store(config)?;
    let workflows = store.list_workflows().await?;

    if workflows.is_empty() {
        println!("No workflows deployed.");
        return Ok(());
    }

    for workflow in workflows {
        println!("{workflow}");
    }
    Ok(())
}
