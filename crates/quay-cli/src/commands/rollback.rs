//! Implementation of the `quay rollback` command.

use quay_core::{VersionId, WorkflowName};
use quay_store::RollbackOutcome;

use crate::config::QuayConfig;

pub async fn run(config: &QuayConfig, workflow: &str, to: Option<String>) -> anyhow::Result<()> {
    let store = crate::commands::open_store(config)?;
    let workflow = WorkflowName::new(workflow);
    let target = to.map(VersionId::new);

    match store.rollback(&workflow, target.as_ref()).await? {
        RollbackOutcome::RolledBack { from, to } => {
            match from {
                Some(from) => println!("Rolled back '{workflow}': {from} -> {to}"),
                None => println!("Set '{workflow}' latest to {to}"),
            }
        }
        RollbackOutcome::AlreadyCurrent(version) => {
            println!("'{workflow}' is already at version {version}; nothing to do.");
        }
    }
    Ok(())
}
