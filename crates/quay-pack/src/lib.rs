//! Workflow source bundling.
//!
//! Packs a workflow source directory into a zip archive held in memory and
//! computes the archive's SHA-256 content checksum. The store treats the
//! result as an opaque blob; the zip container is part of the wire layout
//! (`bundle.zip`) consumed by the workflow engine's watcher.
//!
//! Entries are added in sorted path order with fixed timestamps, so packing
//! unchanged sources yields byte-identical archives and therefore identical
//! checksums.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::task::spawn_blocking;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Directory names never included in a bundle.
const SKIP_DIRS: &[&str] = &[".git", ".hg", ".svn", "target", "node_modules", "__pycache__"];

/// Errors that can occur while packaging a workflow source directory.
#[derive(Debug, Error)]
pub enum PackError {
    /// The source directory does not exist or is not a directory.
    #[error("source directory not found: {0}")]
    SourceMissing(PathBuf),

    /// The source directory contains no files to package.
    #[error("source directory is empty: {0}")]
    EmptySource(PathBuf),

    /// Filesystem failure while reading sources.
    #[error("failed to read sources: {0}")]
    Io(#[from] std::io::Error),

    /// Archive construction failure.
    #[error("failed to build archive: {0}")]
    Archive(String),
}

/// Result type alias for packaging operations.
pub type PackResult<T> = Result<T, PackError>;

/// A packaged workflow bundle ready for upload.
#[derive(Debug, Clone)]
pub struct PackedBundle {
    /// The archive bytes.
    pub data: Bytes,
    /// Content checksum of the archive, `sha256:<hex>`.
    pub checksum: String,
    /// Number of files in the archive.
    pub file_count: usize,
}

/// Pack a workflow source directory into an in-memory zip bundle.
pub async fn pack_directory(source: &Path) -> PackResult<PackedBundle> {
    let source = source.to_owned();
    spawn_blocking(move || pack_directory_sync(&source))
        .await
        .map_err(std::io::Error::from)?
}

/// Compute the `sha256:<hex>` content checksum of a blob.
#[must_use]
pub fn checksum(data: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(data)))
}

fn pack_directory_sync(source: &Path) -> PackResult<PackedBundle> {
    if !source.is_dir() {
        return Err(PackError::SourceMissing(source.to_owned()));
    }

    let mut files = collect_files(source)?;
    if files.is_empty() {
        return Err(PackError::EmptySource(source.to_owned()));
    }
    files.sort();

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644);

    for path in &files {
        let relative = path
            .strip_prefix(source)
            .map_err(|e| PackError::Archive(e.to_string()))?;
        let entry_name = relative.to_string_lossy().replace('\\', "/");

        writer
            .start_file(entry_name, options)
            .map_err(|e| PackError::Archive(e.to_string()))?;
        let data = std::fs::read(path)?;
        writer.write_all(&data)?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| PackError::Archive(e.to_string()))?;
    let archive = cursor.into_inner();
    let checksum = checksum(&archive);

    debug!(
        files = files.len(),
        size = archive.len(),
        checksum = %checksum,
        "packaged workflow sources"
    );

    Ok(PackedBundle {
        data: Bytes::from(archive),
        checksum,
        file_count: files.len(),
    })
}

fn collect_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_owned()];

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;

            if file_type.is_dir() {
                let name = entry.file_name();
                let skip = name
                    .to_str()
                    .is_some_and(|n| SKIP_DIRS.contains(&n));
                if !skip {
                    pending.push(path);
                }
            } else if file_type.is_file() {
                files.push(path);
            }
            // Symlinks are skipped: bundles carry file contents only.
        }
    }

    Ok(files)
}
