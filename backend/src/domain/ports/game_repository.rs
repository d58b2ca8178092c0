//! Port for game record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Game, GameTemplate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by game repository adapters.
    pub enum GameRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "game repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "game repository query failed: {message}",
        /// Another game of the same template already uses this name.
        DuplicateName { name: String } =>
            "a game named {name} already exists",
    }
}

/// Port for reading and writing game records.
///
/// Counter increments are single atomic statements; adapters must not read
/// the counter and write it back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Resolve a template by slug.
    async fn find_template(&self, slug: &str) -> Result<Option<GameTemplate>, GameRepositoryError>;

    /// Find a game by id, whatever its template.
    async fn find_by_id(&self, game_id: &Uuid) -> Result<Option<Game>, GameRepositoryError>;

    /// Find a game of `template_id` with exactly this name.
    async fn find_by_name(
        &self,
        template_id: &Uuid,
        name: &str,
    ) -> Result<Option<Game>, GameRepositoryError>;

    /// List games of a template, newest first.
    async fn list_by_template(
        &self,
        template_id: &Uuid,
        include_unpublished: bool,
    ) -> Result<Vec<Game>, GameRepositoryError>;

    /// Insert a new record.
    async fn insert(&self, game: &Game) -> Result<(), GameRepositoryError>;

    /// Overwrite the mutable fields of an existing record, stamping it with
    /// `updated_at`.
    ///
    /// Returns `false` when no record with the game's id exists.
    async fn update(
        &self,
        game: &Game,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, GameRepositoryError>;

    /// Delete a record, returning `false` when it was already absent.
    async fn delete(&self, game_id: &Uuid) -> Result<bool, GameRepositoryError>;

    /// Add one to the play counter, returning `false` when the game is absent.
    async fn increment_total_played(&self, game_id: &Uuid) -> Result<bool, GameRepositoryError>;
}

/// Fixture implementation for tests that do not exercise game persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGameRepository;

#[async_trait]
impl GameRepository for FixtureGameRepository {
    async fn find_template(
        &self,
        _slug: &str,
    ) -> Result<Option<GameTemplate>, GameRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(&self, _game_id: &Uuid) -> Result<Option<Game>, GameRepositoryError> {
        Ok(None)
    }

    async fn find_by_name(
        &self,
        _template_id: &Uuid,
        _name: &str,
    ) -> Result<Option<Game>, GameRepositoryError> {
        Ok(None)
    }

    async fn list_by_template(
        &self,
        _template_id: &Uuid,
        _include_unpublished: bool,
    ) -> Result<Vec<Game>, GameRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _game: &Game) -> Result<(), GameRepositoryError> {
        Ok(())
    }

    async fn update(
        &self,
        _game: &Game,
        _updated_at: DateTime<Utc>,
    ) -> Result<bool, GameRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _game_id: &Uuid) -> Result<bool, GameRepositoryError> {
        Ok(false)
    }

    async fn increment_total_played(&self, _game_id: &Uuid) -> Result<bool, GameRepositoryError> {
        Ok(false)
    }
}
