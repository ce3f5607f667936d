//! Implementation of the `quay deploy` command.
//!
//! Sequences the deployment: validate config, package sources, checksum,
//! upload to the artifact store, then optionally notify the registrar. The
//! upload is the commit point; everything after it is best-effort.

use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use tracing::warn;

use quay_core::{timestamp_version, DeploymentMetadata, VersionId, WorkflowName};
use quay_pack::PackError;
use quay_store::StoreError;

use crate::config::QuayConfig;
use crate::registrar::RegistrarClient;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("packaging failed: {0}")]
    Pack(#[from] PackError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("store backend: {0}")]
    Backend(String),
}

/// Arguments for the deploy command.
pub struct DeployArgs {
    /// Explicit version identifier; a timestamp version is generated when
    /// absent.
    pub version: Option<String>,

    /// Overwrite an existing version.
    pub force: bool,

    /// Workflow source directory.
    pub source: PathBuf,
}

pub async fn run(config: &QuayConfig, args: DeployArgs) -> Result<(), DeployError> {
    let workflow = WorkflowName::new(&config.workflow.name);
    let version = args
        .version
        .map(VersionId::new)
        .unwrap_or_else(timestamp_version);

    println!("Deploying workflow '{workflow}' version '{version}'");

    println!("Packaging {}...", args.source.display());
    let bundle = quay_pack::pack_directory(&args.source).await?;
    println!(
        "  {} file(s), {} bytes, {}",
        bundle.file_count,
        bundle.data.len(),
        bundle.checksum
    );

    let metadata = DeploymentMetadata {
        name: config.workflow.name.clone(),
        version: version.to_string(),
        namespace: config.workflow.namespace.clone(),
        task_queue: config.workflow.task_queue.clone(),
        trigger: config.trigger(),
        deployed_at: Utc::now(),
        deployed_by: config.deployer(),
        checksum: bundle.checksum.clone(),
    };

    let store =
        crate::commands::open_store(config).map_err(|e| DeployError::Backend(e.to_string()))?;

    println!("Uploading...");
    let bundle_key = store
        .upload(&workflow, &version, bundle.data, &metadata, args.force)
        .await?;
    println!("  stored at {bundle_key}");
    println!("  latest -> {version}");

    if let Some(registrar) = &config.registrar {
        match RegistrarClient::new(&registrar.endpoint) {
            Ok(client) => {
                if let Err(e) = client.notify_deployed(&metadata).await {
                    warn!(error = %e, "registrar notification failed");
                    println!("Warning: registrar notification failed: {e}");
                }
            }
            Err(e) => {
                warn!(error = %e, "could not create registrar client");
                println!("Warning: could not create registrar client: {e}");
            }
        }
    }

    println!("Deployment complete.");
    Ok(())
}
