//! Driving port for puzzle play sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Difficulty, Error, Player};

use super::puzzle_catalog_query::PuzzleConfigPayload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartPuzzleRequest {
    pub player: Player,
    pub game_id: Uuid,
    /// Requested difficulty; easy when absent.
    pub difficulty: Option<Difficulty>,
}

/// Configuration snapshot for a new session.
///
/// `config` carries the stored images with a grid and time limit derived
/// from the session difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPuzzleResponse {
    pub session_id: Uuid,
    pub game_id: Uuid,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub config: PuzzleConfigPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishPuzzleRequest {
    pub player: Player,
    pub session_id: Uuid,
    pub game_id: Uuid,
    pub time_taken_sec: Option<u32>,
    pub move_count: Option<u32>,
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishPuzzleResponse {
    pub session_id: Uuid,
    pub game_id: Uuid,
    pub game_name: String,
    pub thumbnail: Option<String>,
    pub difficulty: Difficulty,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub time_taken_sec: u32,
    pub move_count: u32,
    pub score: u32,
    /// Present only for identified players.
    pub leaderboard_entry_id: Option<Uuid>,
}

/// Driving port for the session lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PuzzleSessionCommand: Send + Sync {
    /// Starts a session on a published puzzle and bumps its play counter.
    async fn start_puzzle(&self, request: StartPuzzleRequest)
    -> Result<StartPuzzleResponse, Error>;

    /// Finishes a session, scoring it and recording identified results.
    ///
    /// A second finish of the same session fails with `Conflict`.
    async fn finish_puzzle(
        &self,
        request: FinishPuzzleRequest,
    ) -> Result<FinishPuzzleResponse, Error>;
}

/// Fixture command for tests that do not exercise sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePuzzleSessionCommand;

#[async_trait]
impl PuzzleSessionCommand for FixturePuzzleSessionCommand {
    async fn start_puzzle(
        &self,
        request: StartPuzzleRequest,
    ) -> Result<StartPuzzleResponse, Error> {
        Err(Error::not_found(format!(
            "puzzle {} not found",
            request.game_id
        )))
    }

    async fn finish_puzzle(
        &self,
        request: FinishPuzzleRequest,
    ) -> Result<FinishPuzzleResponse, Error> {
        Err(Error::not_found(format!(
            "puzzle session {} not found",
            request.session_id
        )))
    }
}
