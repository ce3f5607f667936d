//! Object store backend construction.
//!
//! Supports local filesystem, in-memory, and S3-compatible backends. The
//! store owns a single client handle built here once per invocation; nothing
//! is cached process-wide.

use std::sync::Arc;

use object_store::ObjectStore;
use serde::Deserialize;

use crate::error::{StoreError, StoreResult};

/// Configuration for the artifact storage backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Backend kind: "local", "memory", or "s3".
    pub backend: String,
    /// Bucket name (S3) or base directory (local). Ignored for "memory".
    pub bucket: String,
    /// S3 region.
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override for S3-compatible stores.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "local".to_owned(),
            bucket: "/var/lib/quay/artifacts".to_owned(),
            region: None,
            endpoint: None,
        }
    }
}

/// Create an object store client from configuration.
///
/// S3 credentials are taken from the standard AWS environment variables when
/// not provided by the environment's default chain.
pub fn create_object_store(config: &StorageConfig) -> StoreResult<Arc<dyn ObjectStore>> {
    match config.backend.as_str() {
        "local" => {
            let store = object_store::local::LocalFileSystem::new_with_prefix(&config.bucket)
                .map_err(|e| StoreError::Backend(format!("failed to create local store: {e}")))?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(object_store::memory::InMemory::new())),
        #[cfg(feature = "aws")]
        "s3" => {
            use object_store::aws::AmazonS3Builder;

            let mut builder = AmazonS3Builder::from_env().with_bucket_name(&config.bucket);

            if let Some(region) = &config.region {
                builder = builder.with_region(region);
            }
            if let Some(endpoint) = &config.endpoint {
                builder = builder.with_endpoint(endpoint);
                if endpoint.starts_with("http://") {
                    builder = builder.with_allow_http(true);
                }
            }

            let store = builder
                .build()
                .map_err(|e| StoreError::Backend(format!("failed to create S3 store: {e}")))?;
            Ok(Arc::new(store))
        }
        other => Err(StoreError::Backend(format!(
            "unsupported storage backend: {other}"
        ))),
    }
}
