//! Port for puzzle session persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{LeaderboardEntry, PuzzleSession, SessionCompletion};

use super::define_port_error;

define_port_error! {
    /// Errors raised by puzzle session repository adapters.
    pub enum PuzzleSessionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "puzzle session repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "puzzle session repository query failed: {message}",
    }
}

/// Port for recording sessions and their completion.
///
/// Finishing is one unit of work. The session's completion, the optional
/// leaderboard award and the player's games-played total are either all
/// stored or none are, so a failed finish can be retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PuzzleSessionRepository: Send + Sync {
    /// Persist a freshly started session.
    async fn create(&self, session: &PuzzleSession) -> Result<(), PuzzleSessionRepositoryError>;

    /// Find a session by id.
    async fn find_by_id(
        &self,
        session_id: &Uuid,
    ) -> Result<Option<PuzzleSession>, PuzzleSessionRepositoryError>;

    /// Record the completion if the session is still active.
    ///
    /// The active check and write happen in one conditional statement.
    /// When it matches and an `award` is given, the entry is appended and the
    /// entry's user gains one finished game, all within the same
    /// transaction. Returns `false` without writing anything when the session
    /// was already finished, so at most one caller ever observes `true`.
    async fn record_finish(
        &self,
        session_id: &Uuid,
        completion: &SessionCompletion,
        award: Option<LeaderboardEntry>,
    ) -> Result<bool, PuzzleSessionRepositoryError>;
}

/// Fixture implementation for tests that do not exercise session persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePuzzleSessionRepository;

#[async_trait]
impl PuzzleSessionRepository for FixturePuzzleSessionRepository {
    async fn create(&self, _session: &PuzzleSession) -> Result<(), PuzzleSessionRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _session_id: &Uuid,
    ) -> Result<Option<PuzzleSession>, PuzzleSessionRepositoryError> {
        Ok(None)
    }

    async fn record_finish(
        &self,
        _session_id: &Uuid,
        _completion: &SessionCompletion,
        _award: Option<LeaderboardEntry>,
    ) -> Result<bool, PuzzleSessionRepositoryError> {
        Ok(true)
    }
}
