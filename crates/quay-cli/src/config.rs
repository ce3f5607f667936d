//! Configuration structures for quay.toml.
//!
//! The schema is strict: unknown fields are rejected with an explicit parse
//! error rather than ignored, so a typoed key never silently deploys with
//! defaults.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use quay_core::Trigger;
use quay_store::StorageConfig;

/// Errors from loading quay.toml.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    NotFound(std::path::PathBuf),

    /// Failed to read the configuration file.
    #[error("failed to read configuration: {0}")]
    Read(#[from] std::io::Error),

    /// Configuration does not match the schema.
    #[error("invalid configuration: {0}")]
    Schema(#[from] toml::de::Error),

    /// A field value is present but unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration structure for quay.toml.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuayConfig {
    /// Workflow being deployed.
    pub workflow: WorkflowConfig,

    /// Artifact storage backend.
    pub storage: StorageConfig,

    /// Optional registrar notified after each upload.
    #[serde(default)]
    pub registrar: Option<RegistrarConfig>,
}

/// Workflow deployment settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    /// The workflow name.
    pub name: String,

    /// Engine namespace.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Task queue the workflow executes on.
    pub task_queue: String,

    /// How the workflow is triggered.
    pub trigger: TriggerConfig,

    /// Deployer identity recorded in metadata. Overridden by the
    /// `QUAY_DEPLOYER` environment variable when set.
    #[serde(default)]
    pub deployed_by: Option<String>,
}

fn default_namespace() -> String {
    "default".to_owned()
}

/// Trigger settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerConfig {
    /// Trigger kind, e.g. "schedule", "signal", "manual".
    #[serde(rename = "type")]
    pub trigger_type: String,

    /// Trigger-specific configuration, e.g. a cron expression.
    #[serde(default)]
    pub config: Option<String>,
}

/// Registrar endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrarConfig {
    /// Base URL of the registrar API.
    pub endpoint: String,
}

impl QuayConfig {
    /// Load and validate configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_owned()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Deployer identity, env override first.
    #[must_use]
    pub fn deployer(&self) -> Option<String> {
        std::env::var("QUAY_DEPLOYER")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.workflow.deployed_by.clone())
    }

    /// The workflow's trigger as a metadata record field.
    #[must_use]
    pub fn trigger(&self) -> Trigger {
        Trigger {
            trigger_type: self.workflow.trigger.trigger_type.clone(),
            config: self.workflow.trigger.config.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.workflow.name.is_empty() || self.workflow.name.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "workflow name {:?} is not usable as a storage key",
                self.workflow.name
            )));
        }
        if self.workflow.task_queue.is_empty() {
            return Err(ConfigError::Invalid("task_queue must not be empty".into()));
        }
        if self.workflow.trigger.trigger_type.is_empty() {
            return Err(ConfigError::Invalid("trigger type must not be empty".into()));
        }
        Ok(())
    }
}
