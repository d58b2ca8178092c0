//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on the
//! driving ports, so they can be tested with fixtures or mocks.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureLeaderboardQuery, FixturePuzzleCatalogCommand, FixturePuzzleCatalogQuery,
    FixturePuzzleSessionCommand, LeaderboardQuery, PuzzleCatalogCommand, PuzzleCatalogQuery,
    PuzzleSessionCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalog: Arc<dyn PuzzleCatalogQuery>,
    pub catalog_command: Arc<dyn PuzzleCatalogCommand>,
    pub sessions: Arc<dyn PuzzleSessionCommand>,
    pub leaderboard: Arc<dyn LeaderboardQuery>,
}

impl HttpState {
    pub fn new(
        catalog: Arc<dyn PuzzleCatalogQuery>,
        catalog_command: Arc<dyn PuzzleCatalogCommand>,
        sessions: Arc<dyn PuzzleSessionCommand>,
        leaderboard: Arc<dyn LeaderboardQuery>,
    ) -> Self {
        Self {
            catalog,
            catalog_command,
            sessions,
            leaderboard,
        }
    }

    /// State backed entirely by fixtures, used when no database is configured.
    ///
    /// # Examples
    /// ```
    /// use games_backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::fixtures();
    /// let _catalog = state.catalog.clone();
    /// ```
    pub fn fixtures() -> Self {
        Self::new(
            Arc::new(FixturePuzzleCatalogQuery),
            Arc::new(FixturePuzzleCatalogCommand),
            Arc::new(FixturePuzzleSessionCommand),
            Arc::new(FixtureLeaderboardQuery),
        )
    }
}
