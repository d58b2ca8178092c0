//! Puzzle session services.
//!
//! Start records a session row, then bumps the play counter with a single
//! atomic increment. Finish scores the session and, for identified players,
//! hands a leaderboard award to the session repository so the completion,
//! the entry and the games-played total are stored together.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    FinishPuzzleRequest, FinishPuzzleResponse, GameRepository, PuzzleConfigPayload,
    PuzzleSessionCommand, PuzzleSessionRepository, PuzzleSessionRepositoryError,
    StartPuzzleRequest, StartPuzzleResponse,
};
use crate::domain::puzzle_games::{load_puzzle, map_game_repository_error, puzzle_not_found};
use crate::domain::{
    Difficulty, Error, LeaderboardEntry, PuzzleConfig, PuzzleSession, ReportedOutcome,
    SessionTransitionError, grid_size_for_difficulty, time_limit_for_difficulty,
};

fn map_session_error(error: PuzzleSessionRepositoryError) -> Error {
    match error {
        PuzzleSessionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("puzzle session repository unavailable: {message}"))
        }
        PuzzleSessionRepositoryError::Query { message } => {
            Error::internal(format!("puzzle session repository error: {message}"))
        }
    }
}

fn session_not_found(session_id: Uuid) -> Error {
    Error::not_found(format!("puzzle session {session_id} not found"))
}

fn already_finished(session_id: Uuid) -> Error {
    Error::conflict(format!("puzzle session {session_id} has already finished"))
}

/// Configuration snapshot played at `difficulty`.
///
/// Stored images are kept; grid and time limit come from the difficulty.
fn play_config(config: &PuzzleConfig, difficulty: Difficulty) -> PuzzleConfigPayload {
    let grid = grid_size_for_difficulty(Some(difficulty));
    PuzzleConfigPayload {
        rows: grid.rows,
        cols: grid.cols,
        difficulty,
        time_limit_sec: time_limit_for_difficulty(Some(difficulty)),
        ..PuzzleConfigPayload::from(config)
    }
}

/// Session service implementing the session command driving port.
#[derive(Clone)]
pub struct PuzzleSessionService<G, S> {
    games: Arc<G>,
    sessions: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<G, S> PuzzleSessionService<G, S> {
    pub fn new(games: Arc<G>, sessions: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            games,
            sessions,
            clock,
        }
    }
}

#[async_trait]
impl<G, S> PuzzleSessionCommand for PuzzleSessionService<G, S>
where
    G: GameRepository,
    S: PuzzleSessionRepository,
{
    async fn start_puzzle(
        &self,
        request: StartPuzzleRequest,
    ) -> Result<StartPuzzleResponse, Error> {
        let (game, config) = load_puzzle(self.games.as_ref(), request.game_id).await?;
        if !game.is_published {
            return Err(Error::forbidden(format!(
                "puzzle {} is not published",
                game.id
            )));
        }

        let difficulty = request.difficulty.unwrap_or(Difficulty::Easy);
        let session = PuzzleSession::start(
            Uuid::new_v4(),
            game.id,
            request.player,
            difficulty,
            self.clock.utc(),
        );
        self.sessions
            .create(&session)
            .await
            .map_err(map_session_error)?;

        // Only a recorded session counts as a play.
        let incremented = self
            .games
            .increment_total_played(&game.id)
            .await
            .map_err(map_game_repository_error)?;
        if !incremented {
            return Err(puzzle_not_found(game.id));
        }

        info!(
            session_id = %session.id(),
            game_id = %game.id,
            player = %session.player(),
            difficulty = %difficulty,
            "puzzle session started"
        );
        Ok(StartPuzzleResponse {
            session_id: session.id(),
            game_id: game.id,
            name: game.name,
            started_at: session.started_at(),
            config: play_config(&config, difficulty),
        })
    }

    async fn finish_puzzle(
        &self,
        request: FinishPuzzleRequest,
    ) -> Result<FinishPuzzleResponse, Error> {
        let (game, _config) = load_puzzle(self.games.as_ref(), request.game_id).await?;

        let session = self
            .sessions
            .find_by_id(&request.session_id)
            .await
            .map_err(map_session_error)?
            .filter(|session| session.game_id() == game.id)
            .ok_or_else(|| session_not_found(request.session_id))?;
        if !session.is_owned_by(&request.player) {
            return Err(Error::forbidden(format!(
                "puzzle session {} belongs to another player",
                session.id()
            )));
        }

        let completion = session
            .complete(
                self.clock.utc(),
                ReportedOutcome {
                    time_taken_sec: request.time_taken_sec,
                    move_count: request.move_count,
                },
            )
            .map_err(|SessionTransitionError::AlreadyFinished { session_id }| {
                already_finished(session_id)
            })?;

        let award = session.player().user_id().map(|user_id| LeaderboardEntry {
            id: Uuid::new_v4(),
            user_id: user_id.clone(),
            game_id: game.id,
            score: completion.score,
            difficulty: session.difficulty(),
            time_taken_sec: completion.time_taken_sec,
            created_at: completion.finished_at,
        });
        let leaderboard_entry_id = award.as_ref().map(|entry| entry.id);

        let recorded = self
            .sessions
            .record_finish(&session.id(), &completion, award)
            .await
            .map_err(map_session_error)?;
        if !recorded {
            return Err(already_finished(session.id()));
        }

        info!(
            session_id = %session.id(),
            game_id = %game.id,
            player = %session.player(),
            score = completion.score,
            "puzzle session finished"
        );
        Ok(FinishPuzzleResponse {
            session_id: session.id(),
            game_id: game.id,
            game_name: game.name,
            thumbnail: game.thumbnail_image,
            difficulty: session.difficulty(),
            started_at: session.started_at(),
            finished_at: completion.finished_at,
            time_taken_sec: completion.time_taken_sec,
            move_count: completion.move_count,
            score: completion.score,
            leaderboard_entry_id,
        })
    }
}

#[cfg(test)]
#[path = "puzzle_session_service_tests.rs"]
mod tests;
