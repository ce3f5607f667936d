//! Deployment metadata persisted alongside each bundle.
//!
//! The JSON shape is consumed by the workflow engine's watcher and is
//! compatibility-critical: field names are camelCase, optional fields are
//! omitted when absent, and `deployedAt` is an ISO-8601 timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a deployed workflow is triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// Trigger kind, e.g. `schedule`, `signal`, `manual`.
    #[serde(rename = "type")]
    pub trigger_type: String,
    /// Trigger-specific configuration, e.g. a cron expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
}

/// The deployment record stored as `<workflow>/<version>/metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentMetadata {
    /// Workflow name.
    pub name: String,
    /// Version identifier this record belongs to.
    pub version: String,
    /// Engine namespace the workflow is deployed into.
    pub namespace: String,
    /// Task queue the workflow executes on.
    pub task_queue: String,
    /// Trigger configuration.
    pub trigger: Trigger,
    /// When the deployment was made.
    pub deployed_at: DateTime<Utc>,
    /// Opaque identity of the deployer, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployed_by: Option<String>,
    /// Content hash of the bundle, `sha256:<hex>` or bare hex.
    ///
    /// Computed by the packager before upload and never recomputed from the
    /// stored copy; integrity re-verification is a caller concern.
    pub checksum: String,
}
