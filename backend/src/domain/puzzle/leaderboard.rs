//! Leaderboard ranking rules.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::Difficulty;
use crate::domain::UserId;

/// Default number of entries returned by a leaderboard query.
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 10;
/// Largest number of entries a single query may return.
pub const MAX_LEADERBOARD_LIMIT: u32 = 100;

/// Immutable record of an identified player's finished attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub game_id: Uuid,
    pub score: u32,
    pub difficulty: Difficulty,
    pub time_taken_sec: u32,
    pub created_at: DateTime<Utc>,
}

/// Requested leaderboard size, clamped to `1..=MAX_LEADERBOARD_LIMIT`.
///
/// # Examples
/// ```
/// use games_backend::domain::LeaderboardLimit;
///
/// assert_eq!(LeaderboardLimit::from_requested(None).get(), 10);
/// assert_eq!(LeaderboardLimit::from_requested(Some(0)).get(), 1);
/// assert_eq!(LeaderboardLimit::from_requested(Some(5_000)).get(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardLimit(u32);

impl LeaderboardLimit {
    pub fn from_requested(requested: Option<u32>) -> Self {
        Self(
            requested
                .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
                .clamp(1, MAX_LEADERBOARD_LIMIT),
        )
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for LeaderboardLimit {
    fn default() -> Self {
        Self(DEFAULT_LEADERBOARD_LIMIT)
    }
}

/// Ranking order: score descending, then earlier entries, then id.
pub fn compare_entries(left: &LeaderboardEntry, right: &LeaderboardEntry) -> Ordering {
    right
        .score
        .cmp(&left.score)
        .then_with(|| left.created_at.cmp(&right.created_at))
        .then_with(|| left.id.cmp(&right.id))
}

/// Order `entries` for `game_id` and keep the first `limit`.
///
/// Entries belonging to other games are dropped, so adapters that over-fetch
/// still produce a correct board.
pub fn rank(
    game_id: Uuid,
    entries: Vec<LeaderboardEntry>,
    limit: LeaderboardLimit,
) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<_> = entries
        .into_iter()
        .filter(|entry| entry.game_id == game_id)
        .collect();
    ranked.sort_by(compare_entries);
    ranked.truncate(limit.get() as usize);
    ranked
}
