//! Port for post-commit asset cleanup.
//!
//! Catalogue mutations hand stale asset paths to this queue only after the
//! record change has been persisted. Removal is best-effort: each path is
//! attempted independently and failures are logged, never retried, and
//! never surfaced to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::AssetCleanup;

use super::AssetStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetCleanupQueue: Send + Sync {
    /// Schedule removal of the cleanup's paths.
    async fn enqueue(&self, cleanup: AssetCleanup);
}

/// Remove every path in `cleanup`, returning how many removals succeeded.
pub async fn run_asset_cleanup(store: &dyn AssetStore, cleanup: &AssetCleanup) -> usize {
    let mut removed = 0;
    for path in cleanup.paths() {
        match store.remove(path).await {
            Ok(()) => removed += 1,
            Err(error) => warn!(
                game_id = %cleanup.game_id(),
                reason = cleanup.reason().as_str(),
                path = %path,
                error = %error,
                "asset cleanup failed"
            ),
        }
    }
    debug!(
        game_id = %cleanup.game_id(),
        reason = cleanup.reason().as_str(),
        removed,
        total = cleanup.paths().len(),
        "asset cleanup finished"
    );
    removed
}

/// Queue that performs cleanup before `enqueue` returns.
#[derive(Clone)]
pub struct InlineAssetCleanupQueue {
    store: Arc<dyn AssetStore>,
}

impl InlineAssetCleanupQueue {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AssetCleanupQueue for InlineAssetCleanupQueue {
    async fn enqueue(&self, cleanup: AssetCleanup) {
        if cleanup.is_empty() {
            return;
        }
        run_asset_cleanup(self.store.as_ref(), &cleanup).await;
    }
}
