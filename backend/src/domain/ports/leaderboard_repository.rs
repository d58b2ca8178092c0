//! Port for reading leaderboard entries.
//!
//! Entries are written by the session repository when a finish is recorded.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{LeaderboardEntry, LeaderboardLimit};

use super::define_port_error;

define_port_error! {
    /// Errors raised by leaderboard repository adapters.
    pub enum LeaderboardRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "leaderboard repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "leaderboard repository query failed: {message}",
    }
}

/// Port for reading leaderboard entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Best entries for a game, already ordered by the ranking rule and
    /// limited to `limit` rows.
    async fn top_for_game(
        &self,
        game_id: &Uuid,
        limit: LeaderboardLimit,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardRepositoryError>;
}

/// Fixture implementation for tests that do not exercise leaderboard storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeaderboardRepository;

#[async_trait]
impl LeaderboardRepository for FixtureLeaderboardRepository {
    async fn top_for_game(
        &self,
        _game_id: &Uuid,
        _limit: LeaderboardLimit,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardRepositoryError> {
        Ok(Vec::new())
    }
}
