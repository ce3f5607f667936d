//! Integration tests for the versioned deployment protocol over an
//! in-memory object store.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;

use quay_core::{DeploymentMetadata, Trigger, VersionId, WorkflowName};
use quay_store::{ArtifactStore, RollbackOutcome, StoreError};

fn metadata_for(workflow: &str, version: &str, checksum: &str) -> DeploymentMetadata {
    DeploymentMetadata {
        name: workflow.to_owned(),
        version: version.to_owned(),
        namespace: "default".to_owned(),
        task_queue: "main-tq".to_owned(),
        trigger: Trigger {
            trigger_type: "manual".to_owned(),
            config: None,
        },
        deployed_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        deployed_by: Some("ci".to_owned()),
        checksum: checksum.to_owned(),
    }
}

fn store_with_backend() -> (ArtifactStore, Arc<InMemory>) {
    let backend = Arc::new(InMemory::new());
    (ArtifactStore::new(backend.clone()), backend)
}

async fn upload(
    store: &ArtifactStore,
    workflow: &str,
    version: &str,
    bundle: &[u8],
) -> String {
    store
        .upload(
            &WorkflowName::new(workflow),
            &VersionId::new(version),
            Bytes::copy_from_slice(bundle),
            &metadata_for(workflow, version, "sha256:0000"),
            false,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn upload_then_metadata_round_trips() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");
    let v = VersionId::new("v1");
    let metadata = metadata_for("orders", "v1", "sha256:c1");

    let key = store
        .upload(&wf, &v, Bytes::from_static(b"bundle-bytes"), &metadata, false)
        .await
        .unwrap();
    assert_eq!(key, "orders/v1/bundle.zip");

    let stored = store.metadata(&wf, &v).await.unwrap().unwrap();
    assert_eq!(stored, metadata);
    assert_eq!(stored.checksum, "sha256:c1");
}

#[tokio::test]
async fn latest_tracks_most_recent_upload() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");

    for version in ["v1", "v2", "v3"] {
        upload(&store, "orders", version, b"b").await;
        let latest = store.latest_version(&wf).await.unwrap().unwrap();
        assert_eq!(latest.as_str(), version);
    }
}

#[tokio::test]
async fn list_versions_descending_excludes_latest_marker() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");

    upload(&store, "orders", "v1", b"b").await;
    upload(&store, "orders", "v2", b"b").await;
    upload(&store, "orders", "v3", b"b").await;

    let versions = store.list_versions(&wf).await.unwrap();
    let names: Vec<&str> = versions.iter().map(VersionId::as_str).collect();
    assert_eq!(names, ["v3", "v2", "v1"]);
}

#[tokio::test]
async fn list_workflows_compares_as_set() {
    let (store, _) = store_with_backend();
    upload(&store, "orders", "v1", b"b").await;
    upload(&store, "billing", "v1", b"b").await;
    upload(&store, "shipping", "v1", b"b").await;

    let mut names: Vec<String> = store
        .list_workflows()
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.to_string())
        .collect();
    names.sort();
    assert_eq!(names, ["billing", "orders", "shipping"]);
}

#[tokio::test]
async fn conflict_without_force_leaves_objects_untouched() {
    let (store, backend) = store_with_backend();
    let wf = WorkflowName::new("orders");
    let v = VersionId::new("v1");

    let original = metadata_for("orders", "v1", "sha256:original");
    store
        .upload(&wf, &v, Bytes::from_static(b"original"), &original, false)
        .await
        .unwrap();

    let replacement = metadata_for("orders", "v1", "sha256:replacement");
    let err = store
        .upload(&wf, &v, Bytes::from_static(b"replacement"), &replacement, false)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    // Bundle, metadata, and pointer are unchanged.
    let bundle = backend
        .get(&ObjectPath::from("orders/v1/bundle.zip"))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert_eq!(bundle.as_ref(), b"original");
    let stored = store.metadata(&wf, &v).await.unwrap().unwrap();
    assert_eq!(stored.checksum, "sha256:original");
    assert_eq!(
        store.latest_version(&wf).await.unwrap().unwrap().as_str(),
        "v1"
    );
}

#[tokio::test]
async fn forced_upload_overwrites() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");
    let v = VersionId::new("v1");

    store
        .upload(
            &wf,
            &v,
            Bytes::from_static(b"one"),
            &metadata_for("orders", "v1", "sha256:one"),
            false,
        )
        .await
        .unwrap();
    store
        .upload(
            &wf,
            &v,
            Bytes::from_static(b"two"),
            &metadata_for("orders", "v1", "sha256:two"),
            true,
        )
        .await
        .unwrap();

    let stored = store.metadata(&wf, &v).await.unwrap().unwrap();
    assert_eq!(stored.checksum, "sha256:two");
}

#[tokio::test]
async fn absent_reads_are_none_not_errors() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("ghost");

    assert!(store.latest_version(&wf).await.unwrap().is_none());
    assert!(store
        .metadata(&wf, &VersionId::new("v1"))
        .await
        .unwrap()
        .is_none());
    assert!(store.list_versions(&wf).await.unwrap().is_empty());
}

#[tokio::test]
async fn unparsable_metadata_reads_as_absent() {
    let (store, backend) = store_with_backend();
    let wf = WorkflowName::new("orders");
    let v = VersionId::new("v1");

    backend
        .put(
            &ObjectPath::from("orders/v1/metadata.json"),
            Bytes::from_static(b"{not json").into(),
        )
        .await
        .unwrap();

    assert!(store.metadata(&wf, &v).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_version_is_idempotent() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");
    let v = VersionId::new("v1");

    upload(&store, "orders", "v1", b"b").await;
    store.delete_version(&wf, &v).await.unwrap();
    // Second delete of an already-absent version succeeds as a no-op.
    store.delete_version(&wf, &v).await.unwrap();

    assert!(store.list_versions(&wf).await.unwrap().is_empty());
}

#[tokio::test]
async fn rollback_steps_one_back_from_latest() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");

    upload(&store, "orders", "20240101-000000", b"b").await;
    upload(&store, "orders", "20240201-000000", b"b").await;
    upload(&store, "orders", "20240301-000000", b"b").await;

    let outcome = store.rollback(&wf, None).await.unwrap();
    match outcome {
        RollbackOutcome::RolledBack { from, to } => {
            assert_eq!(from.unwrap().as_str(), "20240301-000000");
            assert_eq!(to.as_str(), "20240201-000000");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        store.latest_version(&wf).await.unwrap().unwrap().as_str(),
        "20240201-000000"
    );
}

#[tokio::test]
async fn rollback_with_dangling_pointer_picks_second_newest() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");

    upload(&store, "orders", "20240101-000000", b"b").await;
    upload(&store, "orders", "20240201-000000", b"b").await;
    upload(&store, "orders", "20240301-000000", b"b").await;

    // Point at a version that has no objects.
    store
        .set_latest_version(&wf, &VersionId::new("20249999-000000"))
        .await
        .unwrap();

    let outcome = store.rollback(&wf, None).await.unwrap();
    match outcome {
        RollbackOutcome::RolledBack { to, .. } => {
            assert_eq!(to.as_str(), "20240201-000000");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn rollback_from_oldest_picks_second_newest() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");

    upload(&store, "orders", "20240101-000000", b"b").await;
    upload(&store, "orders", "20240201-000000", b"b").await;
    upload(&store, "orders", "20240301-000000", b"b").await;

    store
        .set_latest_version(&wf, &VersionId::new("20240101-000000"))
        .await
        .unwrap();

    let outcome = store.rollback(&wf, None).await.unwrap();
    match outcome {
        RollbackOutcome::RolledBack { to, .. } => {
            assert_eq!(to.as_str(), "20240201-000000");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn rollback_to_current_version_is_a_distinct_no_op() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");

    upload(&store, "orders", "v1", b"b").await;
    upload(&store, "orders", "v2", b"b").await;

    let outcome = store
        .rollback(&wf, Some(&VersionId::new("v2")))
        .await
        .unwrap();
    assert_eq!(outcome, RollbackOutcome::AlreadyCurrent(VersionId::new("v2")));
}

#[tokio::test]
async fn rollback_to_missing_version_is_refused() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");

    upload(&store, "orders", "v1", b"b").await;

    let err = store
        .rollback(&wf, Some(&VersionId::new("v9")))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::VersionNotFound { .. }));
}

#[tokio::test]
async fn rollback_with_single_version_has_no_target() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");

    upload(&store, "orders", "v1", b"b").await;

    let err = store.rollback(&wf, None).await.unwrap_err();
    assert!(matches!(err, StoreError::NoRollbackTarget { .. }));
}

#[tokio::test]
async fn delete_single_repairs_pointer_to_newest_survivor() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");

    upload(&store, "orders", "20240101-000000", b"b").await;
    upload(&store, "orders", "20240201-000000", b"b").await;
    upload(&store, "orders", "20240301-000000", b"b").await;

    let repaired = store
        .delete_single(&wf, &VersionId::new("20240301-000000"))
        .await
        .unwrap();
    // Newest survivor, not "one step older than the deleted version".
    assert_eq!(repaired.unwrap().as_str(), "20240201-000000");
    assert_eq!(
        store.latest_version(&wf).await.unwrap().unwrap().as_str(),
        "20240201-000000"
    );
}

#[tokio::test]
async fn delete_single_of_non_latest_leaves_pointer_alone() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");

    upload(&store, "orders", "v1", b"b").await;
    upload(&store, "orders", "v2", b"b").await;

    let repaired = store.delete_single(&wf, &VersionId::new("v1")).await.unwrap();
    assert!(repaired.is_none());
    assert_eq!(
        store.latest_version(&wf).await.unwrap().unwrap().as_str(),
        "v2"
    );
}

#[tokio::test]
async fn delete_all_orphans_the_pointer() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");

    upload(&store, "orders", "v1", b"b").await;
    upload(&store, "orders", "v2", b"b").await;

    let deleted = store.delete_all(&wf).await.unwrap();
    assert_eq!(deleted.len(), 2);
    assert!(store.list_versions(&wf).await.unwrap().is_empty());

    // The pointer survives and now dangles; metadata for it reads as absent.
    let dangling = store.latest_version(&wf).await.unwrap().unwrap();
    assert_eq!(dangling.as_str(), "v2");
    assert!(store.metadata(&wf, &dangling).await.unwrap().is_none());
}

#[tokio::test]
async fn deploy_rollback_delete_scenario() {
    let (store, _) = store_with_backend();
    let wf = WorkflowName::new("orders");

    upload(&store, "orders", "v1", b"B1").await;
    assert_eq!(
        store.latest_version(&wf).await.unwrap().unwrap().as_str(),
        "v1"
    );

    upload(&store, "orders", "v2", b"B2").await;
    assert_eq!(
        store.latest_version(&wf).await.unwrap().unwrap().as_str(),
        "v2"
    );

    store.rollback(&wf, None).await.unwrap();
    assert_eq!(
        store.latest_version(&wf).await.unwrap().unwrap().as_str(),
        "v1"
    );

    store
        .delete_version(&wf, &VersionId::new("v2"))
        .await
        .unwrap();
    let versions = store.list_versions(&wf).await.unwrap();
    let names: Vec<&str> = versions.iter().map(VersionId::as_str).collect();
    assert_eq!(names, ["v1"]);
}
