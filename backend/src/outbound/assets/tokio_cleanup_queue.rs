//! Cleanup queue running each task on a detached Tokio task.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{AssetCleanupQueue, AssetStore, run_asset_cleanup};
use crate::domain::{AssetCleanup, TraceId};

/// Spawns removal work so the originating request returns immediately.
///
/// The request's trace id, when present, is re-entered on the spawned task
/// so removal warnings correlate with the mutation that caused them.
#[derive(Clone)]
pub struct TokioAssetCleanupQueue {
    store: Arc<dyn AssetStore>,
}

impl TokioAssetCleanupQueue {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AssetCleanupQueue for TokioAssetCleanupQueue {
    async fn enqueue(&self, cleanup: AssetCleanup) {
        if cleanup.is_empty() {
            return;
        }
        debug!(
            game_id = %cleanup.game_id(),
            reason = cleanup.reason().as_str(),
            paths = cleanup.paths().len(),
            "asset cleanup scheduled"
        );

        let store = Arc::clone(&self.store);
        let trace_id = TraceId::current();
        tokio::spawn(async move {
            let work = run_asset_cleanup(store.as_ref(), &cleanup);
            match trace_id {
                Some(trace_id) => {
                    TraceId::scope(trace_id, work).await;
                }
                None => {
                    work.await;
                }
            }
        });
    }
}
