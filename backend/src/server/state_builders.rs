//! Builders wiring Diesel repositories and the asset store into the puzzle
//! services exposed through [`HttpState`].

use std::io;
use std::path::Path;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use games_backend::domain::ports::{AssetCleanupQueue, AssetStore};
use games_backend::domain::{LeaderboardService, PuzzleCatalogService, PuzzleSessionService};
use games_backend::inbound::http::state::HttpState;
use games_backend::outbound::assets::{LocalAssetStore, TokioAssetCleanupQueue};
use games_backend::outbound::persistence::{
    DbPool, DieselGameRepository, DieselLeaderboardRepository, DieselPuzzleSessionRepository,
};

use super::ServerConfig;

/// Build handler state from the server configuration.
///
/// Uses database-backed services when a pool is configured, otherwise the
/// fixture ports.
///
/// # Errors
/// Returns [`io::Error`] when the asset root cannot be created or opened.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    match &config.db_pool {
        Some(pool) => build_persistent_state(pool, &config.asset_root),
        None => {
            info!("no database configured; serving fixture puzzle ports");
            Ok(HttpState::fixtures())
        }
    }
}

fn build_persistent_state(pool: &DbPool, asset_root: &Path) -> io::Result<HttpState> {
    let assets = Arc::new(LocalAssetStore::open(asset_root)?);
    let cleanup_store: Arc<dyn AssetStore> = assets.clone();
    let cleanup: Arc<dyn AssetCleanupQueue> = Arc::new(TokioAssetCleanupQueue::new(cleanup_store));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let games = Arc::new(DieselGameRepository::new(pool.clone()));
    let catalog = Arc::new(PuzzleCatalogService::new(
        games.clone(),
        assets,
        cleanup,
        clock.clone(),
    ));
    let sessions = Arc::new(PuzzleSessionService::new(
        games.clone(),
        Arc::new(DieselPuzzleSessionRepository::new(pool.clone())),
        clock,
    ));
    let leaderboard = Arc::new(LeaderboardService::new(
        games,
        Arc::new(DieselLeaderboardRepository::new(pool.clone())),
    ));

    info!(asset_root = %asset_root.display(), "puzzle services backed by PostgreSQL");
    Ok(HttpState::new(
        catalog.clone(),
        catalog,
        sessions,
        leaderboard,
    ))
}
