//! Filesystem asset store rooted at a capability directory.
//!
//! Stored files are content addressed: the name is the SHA-256 of the bytes
//! plus the upload's extension, so re-uploading identical content under the
//! same prefix yields the same path. All I/O goes through `cap_std::fs::Dir`,
//! which refuses to follow paths out of the root.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::ports::{AssetStore, AssetStoreError};
use crate::domain::{AssetPrefix, UploadFile};

/// Asset store writing into a local directory.
#[derive(Clone)]
pub struct LocalAssetStore {
    root: Arc<Dir>,
}

impl LocalAssetStore {
    /// Open (creating when needed) the root directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self {
            root: Arc::new(dir),
        })
    }
}

/// File name for `file`: hex SHA-256 of the content plus the extension.
fn content_address(file: &UploadFile) -> String {
    let digest = hex::encode(Sha256::digest(&file.bytes));
    match file.extension() {
        Some(ext) => format!("{digest}.{ext}"),
        None => digest,
    }
}

/// Accept only non-empty relative paths made of plain components.
fn checked_relative_path(path: &str) -> Result<PathBuf, AssetStoreError> {
    let candidate = Path::new(path);
    let is_plain = !path.is_empty()
        && candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if is_plain {
        Ok(candidate.to_path_buf())
    } else {
        Err(AssetStoreError::invalid_path(path))
    }
}

fn io_error(path: &Path, error: &io::Error) -> AssetStoreError {
    AssetStoreError::io(format!("{}: {error}", path.display()))
}

fn write_file(root: &Dir, relative: &Path, bytes: &[u8]) -> Result<(), AssetStoreError> {
    if let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) {
        root.create_dir_all(parent)
            .map_err(|error| io_error(parent, &error))?;
    }
    root.write(relative, bytes)
        .map_err(|error| io_error(relative, &error))
}

fn remove_file(root: &Dir, relative: &Path) -> Result<(), AssetStoreError> {
    match root.remove_file(relative) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(path = %relative.display(), "asset already absent");
            Ok(())
        }
        Err(error) => Err(io_error(relative, &error)),
    }
}

/// Run blocking filesystem work off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, AssetStoreError>
where
    F: FnOnce() -> Result<T, AssetStoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|error| AssetStoreError::io(format!("asset task failed: {error}")))?
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn upload(
        &self,
        prefix: &AssetPrefix,
        file: &UploadFile,
    ) -> Result<String, AssetStoreError> {
        let path = format!("{prefix}/{}", content_address(file));
        let relative = checked_relative_path(&path)?;
        let root = Arc::clone(&self.root);
        let bytes = file.bytes.clone();

        blocking(move || write_file(&root, &relative, &bytes)).await?;
        debug!(path = %path, size = file.size(), "asset stored");
        Ok(path)
    }

    async fn remove(&self, path: &str) -> Result<(), AssetStoreError> {
        let relative = checked_relative_path(path)?;
        let root = Arc::clone(&self.root);
        blocking(move || remove_file(&root, &relative)).await
    }
}
