//! quay - deploy and manage versioned workflow artifacts.

mod commands;
mod config;
mod registrar;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::QuayConfig;

#[derive(Parser)]
#[command(name = "quay")]
#[command(about = "Deploy and manage versioned workflow artifacts")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "quay.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package the workflow sources and upload a new version
    Deploy {
        /// Explicit version identifier (defaults to a UTC timestamp)
        #[arg(long)]
        version: Option<String>,

        /// Overwrite an existing version
        #[arg(long)]
        force: bool,

        /// Workflow source directory
        #[arg(long, default_value = ".")]
        source: PathBuf,
    },

    /// List deployed workflows
    Workflows,

    /// List a workflow's versions, newest first
    Versions {
        /// Workflow name
        workflow: String,
    },

    /// Show a workflow's latest version and its metadata
    Status {
        /// Workflow name
        workflow: String,
    },

    /// Move the latest pointer back one version
    Rollback {
        /// Workflow name
        workflow: String,

        /// Explicit rollback target (defaults to the previous version)
        #[arg(long)]
        to: Option<String>,
    },

    /// Delete one version or all versions of a workflow
    Delete {
        /// Workflow name
        workflow: String,

        /// Version to delete
        #[arg(long, conflicts_with = "all")]
        version: Option<String>,

        /// Delete every version
        #[arg(long)]
        all: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Overwrite the latest pointer without checks
    SetLatest {
        /// Workflow name
        workflow: String,

        /// Version to point at
        version: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match QuayConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result: Result<(), anyhow::Error> = match cli.command {
        Commands::Deploy {
            version,
            force,
            source,
        } => commands::deploy::run(
            &config,
            commands::deploy::DeployArgs {
                version,
                force,
                source,
            },
        )
        .await
        .map_err(Into::into),
        Commands::Workflows => commands::workflows::run(&config).await,
        Commands::Versions { workflow } => commands::versions::run(&config, &workflow).await,
        Commands::Status { workflow } => commands::status::run(&config, &workflow).await,
        Commands::Rollback { workflow, to } => {
            commands::rollback::run(&config, &workflow, to).await
        }
        Commands::Delete {
            workflow,
            version,
            all,
            yes,
        } => {
            commands::delete::run(
                &config,
                commands::delete::DeleteArgs {
                    workflow,
                    version,
                    all,
                    yes,
                },
            )
            .await
        }
        Commands::SetLatest { workflow, version } => {
            commands::set_latest::run(&config, &workflow, &version).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
