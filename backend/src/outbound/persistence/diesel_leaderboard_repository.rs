//! PostgreSQL-backed `LeaderboardRepository` implementation.
//!
//! Rows are appended by the session repository inside its finish
//! transaction; this adapter only reads them.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{LeaderboardRepository, LeaderboardRepositoryError};
use crate::domain::{LeaderboardEntry, LeaderboardLimit, UserId};

use super::diesel_helpers::{
    from_db_int, map_basic_diesel_error, map_basic_pool_error, parse_difficulty, to_db_int,
};
use super::models::LeaderboardEntryRow;
use super::pool::{DbPool, PoolError};
use super::schema::leaderboard_entries;

/// Diesel-backed implementation of the leaderboard port.
#[derive(Clone)]
pub struct DieselLeaderboardRepository {
    pool: DbPool,
}

impl DieselLeaderboardRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LeaderboardRepositoryError {
    map_basic_pool_error(error, LeaderboardRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LeaderboardRepositoryError {
    map_basic_diesel_error(
        error,
        LeaderboardRepositoryError::query,
        LeaderboardRepositoryError::connection,
    )
}

pub(super) fn entry_to_row(entry: &LeaderboardEntry) -> Result<LeaderboardEntryRow, String> {
    Ok(LeaderboardEntryRow {
        id: entry.id,
        user_id: *entry.user_id.as_uuid(),
        game_id: entry.game_id,
        score: to_db_int(entry.score, "score")?,
        difficulty: entry.difficulty.as_str().to_owned(),
        time_taken_sec: to_db_int(entry.time_taken_sec, "time_taken_sec")?,
        created_at: entry.created_at,
    })
}

fn row_to_entry(row: LeaderboardEntryRow) -> Result<LeaderboardEntry, LeaderboardRepositoryError> {
    Ok(LeaderboardEntry {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        game_id: row.game_id,
        score: from_db_int(row.score, "score").map_err(LeaderboardRepositoryError::query)?,
        difficulty: parse_difficulty(&row.difficulty).map_err(LeaderboardRepositoryError::query)?,
        time_taken_sec: from_db_int(row.time_taken_sec, "time_taken_sec")
            .map_err(LeaderboardRepositoryError::query)?,
        created_at: row.created_at,
    })
}

#[async_trait]
impl LeaderboardRepository for DieselLeaderboardRepository {
    async fn top_for_game(
        &self,
        game_id: &Uuid,
        limit: LeaderboardLimit,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LeaderboardEntryRow> = leaderboard_entries::table
            .filter(leaderboard_entries::game_id.eq(game_id))
            .order((
                leaderboard_entries::score.desc(),
                leaderboard_entries::created_at.asc(),
                leaderboard_entries::id.asc(),
            ))
            .limit(i64::from(limit.get()))
            .select(LeaderboardEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_entry).collect()
    }
}
