//! Driving port for puzzle catalogue reads.
//!
//! Inbound adapters list and fetch puzzle games through this port without
//! depending on how records or configuration blobs are stored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Actor, Difficulty, Error, Game, PuzzleConfig, UserId};

/// Serializable puzzle configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleConfigPayload {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub images: Vec<String>,
    pub thumbnail: String,
    pub rows: u8,
    pub cols: u8,
    pub difficulty: Difficulty,
    pub time_limit_sec: u32,
}

impl From<&PuzzleConfig> for PuzzleConfigPayload {
    fn from(config: &PuzzleConfig) -> Self {
        let grid = config.grid();
        Self {
            title: config.title().to_owned(),
            description: config.description().map(str::to_owned),
            image_url: config.image_url().to_owned(),
            images: config.images().to_vec(),
            thumbnail: config.thumbnail().to_owned(),
            rows: grid.rows,
            cols: grid.cols,
            difficulty: config.difficulty(),
            time_limit_sec: config.time_limit_sec(),
        }
    }
}

/// Catalogue listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub difficulty: Difficulty,
    pub rows: u8,
    pub cols: u8,
    pub total_played: i64,
    pub is_published: bool,
}

impl PuzzleSummary {
    pub fn new(game: &Game, config: &PuzzleConfig) -> Self {
        let grid = config.grid();
        Self {
            id: game.id,
            name: game.name.clone(),
            description: game.description.clone(),
            thumbnail: game.thumbnail_image.clone(),
            difficulty: config.difficulty(),
            rows: grid.rows,
            cols: grid.cols,
            total_played: game.total_played,
            is_published: game.is_published,
        }
    }
}

/// Full public view of one puzzle. Omits the creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleDetail {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub is_published: bool,
    pub total_played: i64,
    pub created_at: DateTime<Utc>,
    pub config: PuzzleConfigPayload,
}

impl PuzzleDetail {
    pub fn new(game: &Game, config: &PuzzleConfig) -> Self {
        Self {
            id: game.id,
            name: game.name.clone(),
            description: game.description.clone(),
            thumbnail: game.thumbnail_image.clone(),
            is_published: game.is_published,
            total_played: game.total_played,
            created_at: game.created_at,
            config: PuzzleConfigPayload::from(config),
        }
    }
}

/// Editor view of one puzzle, including its creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleEditView {
    #[serde(flatten)]
    pub detail: PuzzleDetail,
    pub creator_id: UserId,
}

/// Request to list the catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPuzzlesRequest {
    pub include_unpublished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPuzzlesResponse {
    pub puzzles: Vec<PuzzleSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPuzzleRequest {
    pub game_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPuzzleResponse {
    pub puzzle: PuzzleDetail,
}

/// Request to load a puzzle for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPuzzleForEditRequest {
    pub actor: Actor,
    pub game_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPuzzleForEditResponse {
    pub puzzle: PuzzleEditView,
}

/// Driving port for puzzle catalogue reads.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() -> Result<(), games_backend::domain::Error> {
/// use games_backend::domain::ports::{
///     FixturePuzzleCatalogQuery, ListPuzzlesRequest, PuzzleCatalogQuery,
/// };
///
/// let response = FixturePuzzleCatalogQuery
///     .list_puzzles(ListPuzzlesRequest::default())
///     .await?;
/// assert!(response.puzzles.is_empty());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PuzzleCatalogQuery: Send + Sync {
    /// Lists puzzle summaries, newest first.
    ///
    /// Unpublished puzzles are only included when requested.
    async fn list_puzzles(&self, request: ListPuzzlesRequest)
    -> Result<ListPuzzlesResponse, Error>;

    /// Fetches one puzzle. Missing and non-puzzle games are `NotFound`.
    async fn get_puzzle(&self, request: GetPuzzleRequest) -> Result<GetPuzzleResponse, Error>;

    /// Fetches one puzzle for editing. `Forbidden` unless the actor is an
    /// editor or the creator.
    async fn get_puzzle_for_edit(
        &self,
        request: GetPuzzleForEditRequest,
    ) -> Result<GetPuzzleForEditResponse, Error>;
}

/// Fixture query with an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePuzzleCatalogQuery;

#[async_trait]
impl PuzzleCatalogQuery for FixturePuzzleCatalogQuery {
    async fn list_puzzles(
        &self,
        _request: ListPuzzlesRequest,
    ) -> Result<ListPuzzlesResponse, Error> {
        Ok(ListPuzzlesResponse {
            puzzles: Vec::new(),
        })
    }

    async fn get_puzzle(&self, request: GetPuzzleRequest) -> Result<GetPuzzleResponse, Error> {
        Err(Error::not_found(format!(
            "puzzle {} not found",
            request.game_id
        )))
    }

    async fn get_puzzle_for_edit(
        &self,
        request: GetPuzzleForEditRequest,
    ) -> Result<GetPuzzleForEditResponse, Error> {
        Err(Error::not_found(format!(
            "puzzle {} not found",
            request.game_id
        )))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::{Game, GameTemplate, PUZZLE_TEMPLATE_SLUG};

    fn game() -> Game {
        Game {
            id: Uuid::new_v4(),
            name: "Harbour".to_owned(),
            description: Some("Boats".to_owned()),
            thumbnail_image: Some("puzzle/1/t.png".to_owned()),
            template: GameTemplate {
                id: Uuid::new_v4(),
                slug: PUZZLE_TEMPLATE_SLUG.to_owned(),
            },
            creator_id: UserId::random(),
            is_published: true,
            total_played: 4,
            game_json: json!({ "imageUrl": "puzzle/1/a.png", "rows": 4, "cols": 6 }),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn summary_uses_author_grid() {
        let game = game();
        let config = game
            .puzzle_config()
            .expect("decodable")
            .expect("puzzle config");

        let summary = PuzzleSummary::new(&game, &config);

        assert_eq!((summary.rows, summary.cols), (4, 6));
        assert_eq!(summary.difficulty, Difficulty::Medium);
        assert_eq!(summary.total_played, 4);
    }

    #[rstest]
    fn edit_view_flattens_detail_and_adds_creator() {
        let game = game();
        let config = game
            .puzzle_config()
            .expect("decodable")
            .expect("puzzle config");
        let view = PuzzleEditView {
            detail: PuzzleDetail::new(&game, &config),
            creator_id: game.creator_id.clone(),
        };

        let value = serde_json::to_value(&view).expect("serialise");
        assert_eq!(value["name"], "Harbour");
        assert_eq!(value["creatorId"], game.creator_id.to_string());
        assert_eq!(value["config"]["timeLimitSec"], 600);
    }

    #[rstest]
    fn detail_has_no_creator_field() {
        let game = game();
        let config = game
            .puzzle_config()
            .expect("decodable")
            .expect("puzzle config");
        let value = serde_json::to_value(PuzzleDetail::new(&game, &config)).expect("serialise");
        assert!(value.get("creatorId").is_none());
    }
}
