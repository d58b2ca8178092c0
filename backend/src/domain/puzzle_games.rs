//! Shared game lookups and error mapping for the puzzle services.

use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::domain::ports::{AssetStoreError, GameRepository, GameRepositoryError};
use crate::domain::{Error, Game, GameTemplate, PUZZLE_TEMPLATE_SLUG, PuzzleConfig};

pub(crate) fn map_game_repository_error(error: GameRepositoryError) -> Error {
    match error {
        GameRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("game repository unavailable: {message}"))
        }
        GameRepositoryError::Query { message } => {
            Error::internal(format!("game repository error: {message}"))
        }
        GameRepositoryError::DuplicateName { name } => duplicate_name_error(&name),
    }
}

pub(crate) fn map_asset_store_error(error: AssetStoreError) -> Error {
    match error {
        AssetStoreError::Io { message } => {
            Error::service_unavailable(format!("asset store unavailable: {message}"))
        }
        AssetStoreError::InvalidPath { path } => {
            Error::internal(format!("asset store rejected path: {path}"))
        }
    }
}

pub(crate) fn duplicate_name_error(name: &str) -> Error {
    Error::invalid_request(format!("a puzzle named {name} already exists")).with_details(json!({
        "field": "name",
        "code": "duplicate",
    }))
}

pub(crate) fn puzzle_not_found(game_id: Uuid) -> Error {
    Error::not_found(format!("puzzle {game_id} not found"))
}

/// Resolve the puzzle template, or `None` when it has not been provisioned.
pub(crate) async fn find_puzzle_template<G>(games: &G) -> Result<Option<GameTemplate>, Error>
where
    G: GameRepository + ?Sized,
{
    games
        .find_template(PUZZLE_TEMPLATE_SLUG)
        .await
        .map_err(map_game_repository_error)
}

/// Load a game that must exist and belong to the puzzle template.
pub(crate) async fn load_puzzle_game<G>(games: &G, game_id: Uuid) -> Result<Game, Error>
where
    G: GameRepository + ?Sized,
{
    games
        .find_by_id(&game_id)
        .await
        .map_err(map_game_repository_error)?
        .filter(|game| game.template.is_puzzle())
        .ok_or_else(|| puzzle_not_found(game_id))
}

/// Load a puzzle game together with its decoded configuration.
///
/// A stored blob that no longer decodes is an internal error.
pub(crate) async fn load_puzzle<G>(games: &G, game_id: Uuid) -> Result<(Game, PuzzleConfig), Error>
where
    G: GameRepository + ?Sized,
{
    let game = load_puzzle_game(games, game_id).await?;
    match game.puzzle_config() {
        Ok(Some(config)) => Ok((game, config)),
        Ok(None) => Err(puzzle_not_found(game_id)),
        Err(decode_error) => {
            error!(%game_id, error = %decode_error, "stored puzzle configuration is invalid");
            Err(Error::internal(format!(
                "puzzle {game_id} has an invalid configuration"
            )))
        }
    }
}
