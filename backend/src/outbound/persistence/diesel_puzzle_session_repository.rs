//! PostgreSQL-backed `PuzzleSessionRepository` implementation.
//!
//! Completion is a conditional `UPDATE ... WHERE finished_at IS NULL` so
//! concurrent finish requests for one session cannot both succeed. The
//! leaderboard insert and the user's games-played increment share its
//! transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{PuzzleSessionRepository, PuzzleSessionRepositoryError};
use crate::domain::{LeaderboardEntry, Player, PuzzleSession, SessionCompletion, UserId};

use super::diesel_helpers::{
    from_db_int, map_basic_diesel_error, map_basic_pool_error, parse_difficulty, to_db_int,
};
use super::diesel_leaderboard_repository::entry_to_row;
use super::models::{NewPuzzleSessionRow, PuzzleSessionCompletionUpdate, PuzzleSessionRow};
use super::pool::{DbPool, PoolError};
use super::schema::{leaderboard_entries, puzzle_sessions, users};

/// Diesel-backed implementation of the puzzle session port.
#[derive(Clone)]
pub struct DieselPuzzleSessionRepository {
    pool: DbPool,
}

impl DieselPuzzleSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PuzzleSessionRepositoryError {
    map_basic_pool_error(error, PuzzleSessionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PuzzleSessionRepositoryError {
    map_basic_diesel_error(
        error,
        PuzzleSessionRepositoryError::query,
        PuzzleSessionRepositoryError::connection,
    )
}

/// Rebuild the domain session, rejecting partially written completions.
fn row_to_session(row: PuzzleSessionRow) -> Result<PuzzleSession, PuzzleSessionRepositoryError> {
    let difficulty = parse_difficulty(&row.difficulty).map_err(PuzzleSessionRepositoryError::query)?;
    let player = Player::from(row.user_id.map(UserId::from_uuid));

    let completion = match (row.finished_at, row.time_taken_sec, row.move_count, row.score) {
        (None, _, _, _) => None,
        (Some(finished_at), Some(time_taken_sec), Some(move_count), Some(score)) => {
            Some(SessionCompletion {
                finished_at,
                time_taken_sec: from_db_int(time_taken_sec, "time_taken_sec")
                    .map_err(PuzzleSessionRepositoryError::query)?,
                move_count: from_db_int(move_count, "move_count")
                    .map_err(PuzzleSessionRepositoryError::query)?,
                score: from_db_int(score, "score").map_err(PuzzleSessionRepositoryError::query)?,
            })
        }
        (Some(_), _, _, _) => {
            return Err(PuzzleSessionRepositoryError::query(format!(
                "session {} is finished but lacks completion columns",
                row.id
            )));
        }
    };

    Ok(PuzzleSession::restore(
        row.id,
        row.game_id,
        player,
        difficulty,
        row.started_at,
        completion,
    ))
}

fn completion_update(
    completion: &SessionCompletion,
) -> Result<PuzzleSessionCompletionUpdate, PuzzleSessionRepositoryError> {
    Ok(PuzzleSessionCompletionUpdate {
        finished_at: completion.finished_at,
        time_taken_sec: to_db_int(completion.time_taken_sec, "time_taken_sec")
            .map_err(PuzzleSessionRepositoryError::query)?,
        move_count: to_db_int(completion.move_count, "move_count")
            .map_err(PuzzleSessionRepositoryError::query)?,
        score: to_db_int(completion.score, "score").map_err(PuzzleSessionRepositoryError::query)?,
    })
}

#[async_trait]
impl PuzzleSessionRepository for DieselPuzzleSessionRepository {
    async fn create(&self, session: &PuzzleSession) -> Result<(), PuzzleSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewPuzzleSessionRow {
            id: session.id(),
            game_id: session.game_id(),
            user_id: session.player().user_id().map(|user_id| *user_id.as_uuid()),
            difficulty: session.difficulty().as_str(),
            started_at: session.started_at(),
        };

        diesel::insert_into(puzzle_sessions::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        session_id: &Uuid,
    ) -> Result<Option<PuzzleSession>, PuzzleSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = puzzle_sessions::table
            .filter(puzzle_sessions::id.eq(session_id))
            .select(PuzzleSessionRow::as_select())
            .first::<PuzzleSessionRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_session).transpose()
    }

    async fn record_finish(
        &self,
        session_id: &Uuid,
        completion: &SessionCompletion,
        award: Option<LeaderboardEntry>,
    ) -> Result<bool, PuzzleSessionRepositoryError> {
        let changes = completion_update(completion)?;
        let award_row = award
            .as_ref()
            .map(entry_to_row)
            .transpose()
            .map_err(PuzzleSessionRepositoryError::query)?;
        let finished_at = completion.finished_at;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let affected = diesel::update(
                    puzzle_sessions::table
                        .filter(puzzle_sessions::id.eq(session_id))
                        .filter(puzzle_sessions::finished_at.is_null()),
                )
                .set(&changes)
                .execute(conn)
                .await?;
                if affected != 1 {
                    return Ok(false);
                }

                let Some(row) = award_row else {
                    return Ok(true);
                };
                diesel::insert_into(leaderboard_entries::table)
                    .values(&row)
                    .execute(conn)
                    .await?;

                let credited = diesel::update(users::table.filter(users::id.eq(row.user_id)))
                    .set((
                        users::total_game_played.eq(users::total_game_played + 1_i64),
                        users::updated_at.eq(finished_at),
                    ))
                    .execute(conn)
                    .await?;
                if credited == 0 {
                    debug!(user_id = %row.user_id, "no user row to credit with a finished game");
                }
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion and error mapping.
    use chrono::{Duration, TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{Difficulty, SessionState};

    #[fixture]
    fn active_row() -> PuzzleSessionRow {
        PuzzleSessionRow {
            id: Uuid::new_v4(),
            game_id: Uuid::new_v4(),
            user_id: None,
            difficulty: "medium".to_owned(),
            started_at: Utc
                .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
                .single()
                .expect("valid fixture timestamp"),
            finished_at: None,
            time_taken_sec: None,
            move_count: None,
            score: None,
        }
    }

    #[rstest]
    fn active_row_restores_anonymous_session(active_row: PuzzleSessionRow) {
        let session = row_to_session(active_row).expect("row converts");
        assert_eq!(session.player(), &Player::Anonymous);
        assert_eq!(session.difficulty(), Difficulty::Medium);
        assert_eq!(session.state(), SessionState::Active);
    }

    #[rstest]
    fn finished_row_restores_completion(mut active_row: PuzzleSessionRow) {
        let user = Uuid::new_v4();
        active_row.user_id = Some(user);
        active_row.finished_at = Some(active_row.started_at + Duration::seconds(95));
        active_row.time_taken_sec = Some(95);
        active_row.move_count = Some(40);
        active_row.score = Some(825);

        let session = row_to_session(active_row).expect("row converts");

        assert_eq!(
            session.player(),
            &Player::Identified(UserId::from_uuid(user))
        );
        let completion = session.completion().expect("completion present");
        assert_eq!(completion.time_taken_sec, 95);
        assert_eq!(completion.score, 825);
    }

    #[rstest]
    fn half_written_completion_is_rejected(mut active_row: PuzzleSessionRow) {
        active_row.finished_at = Some(active_row.started_at);
        let err = row_to_session(active_row).expect_err("missing columns");
        assert!(matches!(err, PuzzleSessionRepositoryError::Query { .. }));
    }

    #[rstest]
    fn unknown_difficulty_is_a_query_error(mut active_row: PuzzleSessionRow) {
        active_row.difficulty = "nightmare".to_owned();
        let err = row_to_session(active_row).expect_err("bad difficulty");
        assert!(matches!(err, PuzzleSessionRepositoryError::Query { .. }));
    }

    #[rstest]
    fn oversized_score_cannot_be_written() {
        let completion = SessionCompletion {
            finished_at: Utc::now(),
            time_taken_sec: 10,
            move_count: 1,
            score: u32::MAX,
        };
        assert!(completion_update(&completion).is_err());
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(err, PuzzleSessionRepositoryError::Connection { .. }));
    }
}
