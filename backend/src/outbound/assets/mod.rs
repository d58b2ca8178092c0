//! Image asset adapters: local filesystem storage and spawned cleanup.

mod local_asset_store;
mod tokio_cleanup_queue;

pub use local_asset_store::LocalAssetStore;
pub use tokio_cleanup_queue::TokioAssetCleanupQueue;
