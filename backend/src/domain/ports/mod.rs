//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod asset_cleanup_queue;
mod asset_store;
mod game_repository;
mod leaderboard_query;
mod leaderboard_repository;
mod puzzle_catalog_command;
mod puzzle_catalog_query;
mod puzzle_session_command;
mod puzzle_session_repository;

#[cfg(test)]
pub use asset_cleanup_queue::MockAssetCleanupQueue;
pub use asset_cleanup_queue::{AssetCleanupQueue, InlineAssetCleanupQueue, run_asset_cleanup};
#[cfg(test)]
pub use asset_store::MockAssetStore;
pub use asset_store::{AssetStore, AssetStoreError, FixtureAssetStore};
#[cfg(test)]
pub use game_repository::MockGameRepository;
pub use game_repository::{FixtureGameRepository, GameRepository, GameRepositoryError};
#[cfg(test)]
pub use leaderboard_query::MockLeaderboardQuery;
pub use leaderboard_query::{
    FixtureLeaderboardQuery, LeaderboardQuery, LeaderboardRequest, LeaderboardResponse,
    RankedEntry,
};
#[cfg(test)]
pub use leaderboard_repository::MockLeaderboardRepository;
pub use leaderboard_repository::{
    FixtureLeaderboardRepository, LeaderboardRepository, LeaderboardRepositoryError,
};
#[cfg(test)]
pub use puzzle_catalog_command::MockPuzzleCatalogCommand;
pub use puzzle_catalog_command::{
    CreatePuzzleRequest, CreatePuzzleResponse, DeletePuzzleRequest, DeletePuzzleResponse,
    FixturePuzzleCatalogCommand, PuzzleCatalogCommand, UpdatePuzzleRequest, UpdatePuzzleResponse,
    UploadPuzzleImageRequest, UploadPuzzleImageResponse,
};
#[cfg(test)]
pub use puzzle_catalog_query::MockPuzzleCatalogQuery;
pub use puzzle_catalog_query::{
    FixturePuzzleCatalogQuery, GetPuzzleForEditRequest, GetPuzzleForEditResponse,
    GetPuzzleRequest, GetPuzzleResponse, ListPuzzlesRequest, ListPuzzlesResponse,
    PuzzleCatalogQuery, PuzzleConfigPayload, PuzzleDetail, PuzzleEditView, PuzzleSummary,
};
#[cfg(test)]
pub use puzzle_session_command::MockPuzzleSessionCommand;
pub use puzzle_session_command::{
    FinishPuzzleRequest, FinishPuzzleResponse, FixturePuzzleSessionCommand, PuzzleSessionCommand,
    StartPuzzleRequest, StartPuzzleResponse,
};
#[cfg(test)]
pub use puzzle_session_repository::MockPuzzleSessionRepository;
pub use puzzle_session_repository::{
    FixturePuzzleSessionRepository, PuzzleSessionRepository, PuzzleSessionRepositoryError,
};
