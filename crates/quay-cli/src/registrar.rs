//! HTTP client for the external workflow registrar.
//!
//! The registrar learns about new deployments after the upload has been
//! committed; a failed notification therefore never fails the deployment
//! itself, callers downgrade it to a warning.

use std::time::Duration;

use anyhow::{bail, Context};
use reqwest::Client;

use quay_core::DeploymentMetadata;

/// Thin client for the registrar API.
#[derive(Debug, Clone)]
pub struct RegistrarClient {
    client: Client,
    base_url: String,
}

impl RegistrarClient {
    /// Create a client for the given base URL.
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build registrar HTTP client")?;

        Ok(Self {
            client,
            base_url: endpoint.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Notify the registrar of a committed deployment.
    pub async fn notify_deployed(&self, metadata: &DeploymentMetadata) -> anyhow::Result<()> {
        let url = format!(
            "{}/workflows/{}/versions/{}",
            self.base_url, metadata.name, metadata.version
        );

        let response = self
            .client
            .put(&url)
            .json(metadata)
            .send()
            .await
            .with_context(|| format!("registrar request to {url} failed"))?;

        if !response.status().is_success() {
            bail!("registrar returned {}", response.status());
        }

        Ok(())
    }
}
