//! The versioned artifact store.
//!
//! Each workflow version is an immutable bundle+metadata pair; a single
//! mutable `latest` object per workflow names the active version. Key layout:
//!
//! ```text
//! <workflow>/latest                    UTF-8 version id, no trailing newline
//! <workflow>/<version>/bundle.zip      opaque archive bytes
//! <workflow>/<version>/metadata.json   deployment record
//! ```
//!
//! The object store offers no multi-key transactions, so upload writes the
//! bundle first, then the metadata, then the pointer. A reader that races an
//! upload sees the old pointer with the old metadata, never a new pointer
//! naming a version whose objects are still missing.

use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use tracing::{debug, info, warn};

use quay_core::{DeploymentMetadata, VersionId, WorkflowName};

use crate::error::{StoreError, StoreResult};

/// Name of the mutable per-workflow pointer object.
const LATEST_MARKER: &str = "latest";
/// Object name of the bundle within a version prefix.
const BUNDLE_OBJECT: &str = "bundle.zip";
/// Object name of the metadata record within a version prefix.
const METADATA_OBJECT: &str = "metadata.json";

/// Outcome of a rollback request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackOutcome {
    /// The pointer was moved.
    RolledBack {
        /// Pointer value before the rollback, if one existed.
        from: Option<VersionId>,
        /// New pointer value.
        to: VersionId,
    },
    /// The target is already the active version; nothing was written.
    AlreadyCurrent(VersionId),
}

/// Versioned deployment store over an object store backend.
///
/// All operations talk to the backend directly with no internal retries;
/// callers apply their own timeout and retry policy.
pub struct ArtifactStore {
    store: Arc<dyn ObjectStore>,
}

impl ArtifactStore {
    /// Create a store over a pre-configured object store client.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Upload a new version: bundle, then metadata, then the latest pointer.
    ///
    /// The write order is significant. If the process dies after the bundle
    /// write but before the pointer write, the new version is inert and the
    /// workflow stays pinned to its previous latest. Returns the bundle's
    /// storage key.
    ///
    /// Refuses to overwrite an existing version unless `force` is set; a
    /// forced overwrite repeats the same three-step order.
    pub async fn upload(
        &self,
        workflow: &WorkflowName,
        version: &VersionId,
        bundle: Bytes,
        metadata: &DeploymentMetadata,
        force: bool,
    ) -> StoreResult<String> {
        validate(workflow, version)?;

        if !force && self.version_exists(workflow, version).await? {
            return Err(StoreError::Conflict {
                workflow: workflow.to_string(),
                version: version.to_string(),
            });
        }

        let bundle_key = bundle_path(workflow, version);
        debug!(key = %bundle_key, size = bundle.len(), "uploading bundle");
        self.put(&bundle_key, bundle).await?;

        let metadata_key = metadata_path(workflow, version);
        let encoded = serde_json::to_vec_pretty(metadata)?;
        debug!(key = %metadata_key, "uploading metadata");
        self.put(&metadata_key, Bytes::from(encoded)).await?;

        self.set_latest_version(workflow, version).await?;

        info!(
            workflow = %workflow,
            version = %version,
            key = %bundle_key,
            "version uploaded"
        );

        Ok(bundle_key.to_string())
    }

    /// List all workflow names, in backend enumeration order.
    pub async fn list_workflows(&self) -> StoreResult<Vec<WorkflowName>> {
        let listing = self
            .store
            .list_with_delimiter(None)
            .await
            .map_err(|e| transport("/", e))?;

        Ok(listing
            .common_prefixes
            .iter()
            .filter_map(|prefix| prefix.filename())
            .map(WorkflowName::new)
            .collect())
    }

    /// List a workflow's versions, sorted descending lexicographically.
    ///
    /// The `latest` marker is an object, not a version prefix, and is never
    /// included.
    pub async fn list_versions(&self, workflow: &WorkflowName) -> StoreResult<Vec<VersionId>> {
        let prefix = ObjectPath::from(workflow.as_str());
        let listing = self
            .store
            .list_with_delimiter(Some(&prefix))
            .await
            .map_err(|e| transport(workflow.as_str(), e))?;

        let mut versions: Vec<VersionId> = listing
            .common_prefixes
            .iter()
            .filter_map(|p| p.filename())
            .filter(|segment| *segment != LATEST_MARKER)
            .map(VersionId::new)
            .collect();

        versions.sort_by(|a, b| b.cmp(a));
        Ok(versions)
    }

    /// Read the latest pointer. Absence of the workflow or the pointer is
    /// `None`, not an error.
    ///
    /// The returned version may be dangling: the store does not check that
    /// its objects still exist. Callers detect that state by a subsequent
    /// [`Self::metadata`] returning `None`.
    pub async fn latest_version(
        &self,
        workflow: &WorkflowName,
    ) -> StoreResult<Option<VersionId>> {
        let key = latest_path(workflow);
        match self.get(&key).await? {
            Some(bytes) => {
                let id = String::from_utf8_lossy(&bytes).trim_end().to_owned();
                Ok(Some(VersionId::new(id)))
            }
            None => Ok(None),
        }
    }

    /// Read and parse a version's metadata record.
    ///
    /// Missing and unparsable records are treated identically: both are
    /// `None`. A parse failure is logged, never surfaced as an error.
    pub async fn metadata(
        &self,
        workflow: &WorkflowName,
        version: &VersionId,
    ) -> StoreResult<Option<DeploymentMetadata>> {
        let key = metadata_path(workflow, version);
        let Some(bytes) = self.get(&key).await? else {
            return Ok(None);
        };

        match serde_json::from_slice(&bytes) {
            Ok(metadata) => Ok(Some(metadata)),
            Err(e) => {
                warn!(key = %key, error = %e, "unparsable metadata record");
                Ok(None)
            }
        }
    }

    /// Unconditionally overwrite the latest pointer.
    ///
    /// No existence check is performed on the target version; dangling
    /// pointers are permitted by design and tolerated by rollback and the
    /// delete protocols.
    pub async fn set_latest_version(
        &self,
        workflow: &WorkflowName,
        version: &VersionId,
    ) -> StoreResult<()> {
        let key = latest_path(workflow);
        self.put(&key, Bytes::from(version.to_string())).await?;
        debug!(workflow = %workflow, version = %version, "latest pointer written");
        Ok(())
    }

    /// Delete every object under a version's prefix.
    ///
    /// No pointer check: repairing the latest pointer is the caller's job
    /// (or use [`Self::delete_single`]). Deleting an absent version is a
    /// no-op, which makes an interrupted delete idempotent on retry.
    pub async fn delete_version(
        &self,
        workflow: &WorkflowName,
        version: &VersionId,
    ) -> StoreResult<()> {
        validate(workflow, version)?;

        let prefix = version_prefix(workflow, version);
        let mut stream = self.store.list(Some(&prefix));
        let mut keys = Vec::new();

        while let Some(entry) = stream.next().await {
            let meta = entry.map_err(|e| transport(prefix.as_ref(), e))?;
            keys.push(meta.location);
        }

        for key in keys {
            match self.store.delete(&key).await {
                Ok(()) | Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(transport(key.as_ref(), e)),
            }
            debug!(key = %key, "deleted object");
        }

        info!(workflow = %workflow, version = %version, "version deleted");
        Ok(())
    }

    /// Roll the latest pointer back one version.
    ///
    /// With an explicit `target`, the target must appear in the version list.
    /// Without one, the target is the entry after the current latest in the
    /// descending list; if the pointer is dangling or already at the oldest
    /// entry, the second-newest entry of the full list is chosen instead.
    /// Rollback only rewrites the pointer, it never touches version objects.
    pub async fn rollback(
        &self,
        workflow: &WorkflowName,
        target: Option<&VersionId>,
    ) -> StoreResult<RollbackOutcome> {
        let versions = self.list_versions(workflow).await?;
        let current = self.latest_version(workflow).await?;

        let to = match target {
            Some(requested) => {
                if !versions.contains(requested) {
                    return Err(StoreError::VersionNotFound {
                        workflow: workflow.to_string(),
                        version: requested.to_string(),
                    });
                }
                requested.clone()
            }
            None => {
                let position = current
                    .as_ref()
                    .and_then(|c| versions.iter().position(|v| v == c));
                let fallback = || versions.get(1).cloned();
                match position {
                    Some(i) if i + 1 < versions.len() => versions[i + 1].clone(),
                    _ => fallback().ok_or_else(|| StoreError::NoRollbackTarget {
                        workflow: workflow.to_string(),
                    })?,
                }
            }
        };

        if current.as_ref() == Some(&to) {
            debug!(workflow = %workflow, version = %to, "already at rollback target");
            return Ok(RollbackOutcome::AlreadyCurrent(to));
        }

        self.set_latest_version(workflow, &to).await?;
        info!(
            workflow = %workflow,
            from = current.as_ref().map(VersionId::as_str).unwrap_or("<none>"),
            to = %to,
            "rolled back"
        );

        Ok(RollbackOutcome::RolledBack { from: current, to })
    }

    /// Delete one version and repair the latest pointer if it pointed there.
    ///
    /// The repaired pointer selects the newest surviving version (the first
    /// entry of the remaining descending list), which is a deliberately
    /// different tie-break than rollback's "one step older". Returns the new
    /// pointer value when a repair happened.
    pub async fn delete_single(
        &self,
        workflow: &WorkflowName,
        version: &VersionId,
    ) -> StoreResult<Option<VersionId>> {
        let was_latest = self.latest_version(workflow).await?.as_ref() == Some(version);

        self.delete_version(workflow, version).await?;

        if was_latest {
            let survivors = self.list_versions(workflow).await?;
            if let Some(newest) = survivors.first() {
                self.set_latest_version(workflow, newest).await?;
                info!(workflow = %workflow, version = %newest, "latest pointer repaired");
                return Ok(Some(newest.clone()));
            }
            warn!(workflow = %workflow, "deleted the only version; latest pointer is dangling");
        }

        Ok(None)
    }

    /// Delete every version of a workflow.
    ///
    /// The latest pointer is deliberately left behind and becomes orphaned:
    /// the backend has no delete-if-matches primitive, so removing it could
    /// race a concurrent upload's pointer write. This is a documented,
    /// accepted inconsistency. Returns the versions that were deleted.
    pub async fn delete_all(&self, workflow: &WorkflowName) -> StoreResult<Vec<VersionId>> {
        let versions = self.list_versions(workflow).await?;

        for version in &versions {
            self.delete_version(workflow, version).await?;
        }

        info!(workflow = %workflow, count = versions.len(), "all versions deleted");
        Ok(versions)
    }

    async fn version_exists(
        &self,
        workflow: &WorkflowName,
        version: &VersionId,
    ) -> StoreResult<bool> {
        for key in [
            bundle_path(workflow, version),
            metadata_path(workflow, version),
        ] {
            match self.store.head(&key).await {
                Ok(_) => return Ok(true),
                Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(transport(key.as_ref(), e)),
            }
        }
        Ok(false)
    }

    async fn put(&self, key: &ObjectPath, data: Bytes) -> StoreResult<()> {
        self.store
            .put(key, data.into())
            .await
            .map_err(|e| transport(key.as_ref(), e))?;
        Ok(())
    }

    async fn get(&self, key: &ObjectPath) -> StoreResult<Option<Bytes>> {
        let result = match self.store.get(key).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(transport(key.as_ref(), e)),
        };

        let bytes = result
            .bytes()
            .await
            .map_err(|e| transport(key.as_ref(), e))?;
        Ok(Some(bytes))
    }
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore").finish_non_exhaustive()
    }
}

fn validate(workflow: &WorkflowName, version: &VersionId) -> StoreResult<()> {
    if !workflow.is_valid() {
        return Err(StoreError::InvalidWorkflowName(workflow.to_string()));
    }
    if !version.is_valid() {
        return Err(StoreError::InvalidVersionId(version.to_string()));
    }
    Ok(())
}

fn transport(key: &str, source: object_store::Error) -> StoreError {
    StoreError::Transport {
        key: key.to_owned(),
        source,
    }
}

fn latest_path(workflow: &WorkflowName) -> ObjectPath {
    ObjectPath::from(format!("{workflow}/{LATEST_MARKER}"))
}

fn version_prefix(workflow: &WorkflowName, version: &VersionId) -> ObjectPath {
    ObjectPath::from(format!("{workflow}/{version}"))
}

fn bundle_path(workflow: &WorkflowName, version: &VersionId) -> ObjectPath {
    ObjectPath::from(format!("{workflow}/{version}/{BUNDLE_OBJECT}"))
}

fn metadata_path(workflow: &WorkflowName, version: &VersionId) -> ObjectPath {
    ObjectPath::from(format!("{workflow}/{version}/{METADATA_OBJECT}"))
}
