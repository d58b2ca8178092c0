//! Driving port for leaderboard reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Difficulty, Error, LeaderboardEntry, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRequest {
    pub game_id: Uuid,
    /// Requested size; clamped to `1..=100`, default 10.
    pub limit: Option<u32>,
}

/// One ranked leaderboard row. Ranks start at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: u32,
    pub entry_id: Uuid,
    pub user_id: UserId,
    pub score: u32,
    pub difficulty: Difficulty,
    pub time_taken_sec: u32,
    pub created_at: DateTime<Utc>,
}

impl RankedEntry {
    pub fn new(rank: u32, entry: LeaderboardEntry) -> Self {
        Self {
            rank,
            entry_id: entry.id,
            user_id: entry.user_id,
            score: entry.score,
            difficulty: entry.difficulty,
            time_taken_sec: entry.time_taken_sec,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub game_id: Uuid,
    pub entries: Vec<RankedEntry>,
}

/// Driving port for leaderboard queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardQuery: Send + Sync {
    /// Best entries for a puzzle, score descending.
    async fn top(&self, request: LeaderboardRequest) -> Result<LeaderboardResponse, Error>;
}

/// Fixture query returning an empty board for any game.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeaderboardQuery;

#[async_trait]
impl LeaderboardQuery for FixtureLeaderboardQuery {
    async fn top(&self, request: LeaderboardRequest) -> Result<LeaderboardResponse, Error> {
        Ok(LeaderboardResponse {
            game_id: request.game_id,
            entries: Vec::new(),
        })
    }
}
