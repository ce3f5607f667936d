//! Implementation of the `quay delete` command.

use std::io::Write;

use anyhow::bail;

use quay_core::{VersionId, WorkflowName};

use crate::config::QuayConfig;

/// Arguments for the delete command.
pub struct DeleteArgs {
    /// Workflow to delete from.
    pub workflow: String,
    /// Single version to delete.
    pub version: Option<String>,
    /// Delete every version.
    pub all: bool,
    /// Skip the confirmation prompt.
    pub yes: bool,
}

pub async fn run(config: &QuayConfig, args: DeleteArgs) -> anyhow::Result<()> {
    let store = crate::commands::open_store(config)?;
    let workflow = WorkflowName::new(&args.workflow);

    match (&args.version, args.all) {
        (Some(version), false) => {
            let version = VersionId::new(version.as_str());
            if !args.yes && !confirm(&format!("Delete version '{version}' of '{workflow}'?"))? {
                println!("Aborted.");
                return Ok(());
            }

            let repaired = store.delete_single(&workflow, &version).await?;
            println!("Deleted version '{version}' of '{workflow}'.");
            match repaired {
                Some(new_latest) => println!("Latest pointer repaired: now {new_latest}"),
                None => {
                    if store.latest_version(&workflow).await?.as_ref() == Some(&version) {
                        println!(
                            "Warning: the latest pointer still references the deleted \
                             version and is now dangling."
                        );
                    }
                }
            }
        }
        (None, true) => {
            if !args.yes && !confirm(&format!("Delete ALL versions of '{workflow}'?"))? {
                println!("Aborted.");
                return Ok(());
            }

            let deleted = store.delete_all(&workflow).await?;
            println!("Deleted {} version(s) of '{workflow}'.", deleted.len());
            if !deleted.is_empty() {
                // Delete-all leaves the pointer behind on purpose; say so.
                println!(
                    "Note: the latest pointer was left in place and now dangles. \
                     A future deploy will overwrite it."
                );
            }
        }
        _ => bail!("specify exactly one of --version <id> or --all"),
    }

    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
