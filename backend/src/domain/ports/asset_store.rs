//! Port for binary image asset storage.

use async_trait::async_trait;

use crate::domain::{AssetPrefix, UploadFile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by asset store adapters.
    pub enum AssetStoreError {
        /// The backing store could not be reached or written.
        Io { message: String } =>
            "asset store I/O failed: {message}",
        /// A path escapes the store root or is otherwise unusable.
        InvalidPath { path: String } =>
            "asset path is not valid: {path}",
    }
}

/// Port for uploading and removing stored files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store `file` under `prefix`, returning its stable relative path.
    async fn upload(
        &self,
        prefix: &AssetPrefix,
        file: &UploadFile,
    ) -> Result<String, AssetStoreError>;

    /// Remove a stored file. Removing an absent file succeeds.
    async fn remove(&self, path: &str) -> Result<(), AssetStoreError>;
}

/// Fixture store that derives paths from file names and stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAssetStore;

#[async_trait]
impl AssetStore for FixtureAssetStore {
    async fn upload(
        &self,
        prefix: &AssetPrefix,
        file: &UploadFile,
    ) -> Result<String, AssetStoreError> {
        Ok(format!("{prefix}/{}", file.file_name))
    }

    async fn remove(&self, _path: &str) -> Result<(), AssetStoreError> {
        Ok(())
    }
}
