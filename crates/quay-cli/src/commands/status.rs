//! Implementation of the `quay status` command.
//!
//! Reports the latest pointer and its metadata. A pointer whose version has
//! no metadata objects is a detectable state (dangling pointer) and is
//! reported as such, never treated as a crash.

use quay_core::WorkflowName;

use crate::config::QuayConfig;

pub async fn run(config: &QuayConfig, workflow: &str) -> anyhow::Result<()> {
    let store = crate::commands::open_store(config)?;
    let workflow = WorkflowName::new(workflow);

    let Some(latest) = store.latest_version(&workflow).await? else {
        println!("Workflow '{workflow}' has no deployments.");
        return Ok(());
    };

    println!("Workflow: {workflow}");
    println!("Latest:   {latest}");

    match store.metadata(&workflow, &latest).await? {
        Some(metadata) => {
            println!("Namespace:  {}", metadata.namespace);
            println!("Task queue: {}", metadata.task_queue);
            print!("Trigger:    {}", metadata.trigger.trigger_type);
            if let Some(trigger_config) = &metadata.trigger.config {
                print!(" ({trigger_config})");
            }
            println!();
            println!("Deployed:   {}", metadata.deployed_at.to_rfc3339());
            if let Some(deployed_by) = &metadata.deployed_by {
                println!("By:         {deployed_by}");
            }
            println!("Checksum:   {}", metadata.checksum);
        }
        None => {
            println!();
            println!(
                "Warning: the latest pointer references version '{latest}', but that \
                 version has no metadata. The pointer is dangling; run \
                 'quay rollback {workflow}' or 'quay set-latest' to repair it."
            );
        }
    }

    Ok(())
}
