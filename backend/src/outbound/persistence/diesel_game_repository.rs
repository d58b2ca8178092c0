//! PostgreSQL-backed `GameRepository` implementation using Diesel ORM.
//!
//! Games are always read joined to their template so the domain can tell
//! puzzle records from others without a second lookup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{GameRepository, GameRepositoryError};
use crate::domain::{Game, GameTemplate, UserId};

use super::diesel_helpers::{is_unique_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::{GameRow, GameTemplateRow, GameUpdate, NewGameRow};
use super::pool::{DbPool, PoolError};
use super::schema::{game_templates, games};

/// Diesel-backed implementation of the game repository port.
#[derive(Clone)]
pub struct DieselGameRepository {
    pool: DbPool,
}

impl DieselGameRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GameRepositoryError {
    map_basic_pool_error(error, GameRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> GameRepositoryError {
    map_basic_diesel_error(
        error,
        GameRepositoryError::query,
        GameRepositoryError::connection,
    )
}

/// Map write failures, turning the `(template, name)` unique index into a
/// duplicate-name error.
fn map_write_error(error: diesel::result::Error, name: &str) -> GameRepositoryError {
    if is_unique_violation(&error) {
        GameRepositoryError::duplicate_name(name)
    } else {
        map_diesel_error(error)
    }
}

fn row_to_game((row, template): (GameRow, GameTemplateRow)) -> Game {
    Game {
        id: row.id,
        name: row.name,
        description: row.description,
        thumbnail_image: row.thumbnail_image,
        template: GameTemplate {
            id: template.id,
            slug: template.slug,
        },
        creator_id: UserId::from_uuid(row.creator_id),
        is_published: row.is_published,
        total_played: row.total_played,
        game_json: row.game_json,
        created_at: row.created_at,
    }
}

fn game_changes(game: &Game, updated_at: DateTime<Utc>) -> GameUpdate<'_> {
    GameUpdate {
        name: &game.name,
        description: game.description.as_deref(),
        thumbnail_image: game.thumbnail_image.as_deref(),
        is_published: game.is_published,
        game_json: &game.game_json,
        updated_at,
    }
}

#[async_trait]
impl GameRepository for DieselGameRepository {
    async fn find_template(&self, slug: &str) -> Result<Option<GameTemplate>, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = game_templates::table
            .filter(game_templates::slug.eq(slug))
            .select(GameTemplateRow::as_select())
            .first::<GameTemplateRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(|template| GameTemplate {
            id: template.id,
            slug: template.slug,
        }))
    }

    async fn find_by_id(&self, game_id: &Uuid) -> Result<Option<Game>, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = games::table
            .inner_join(game_templates::table)
            .filter(games::id.eq(game_id))
            .select((GameRow::as_select(), GameTemplateRow::as_select()))
            .first::<(GameRow, GameTemplateRow)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_game))
    }

    async fn find_by_name(
        &self,
        template_id: &Uuid,
        name: &str,
    ) -> Result<Option<Game>, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = games::table
            .inner_join(game_templates::table)
            .filter(games::game_template_id.eq(template_id))
            .filter(games::name.eq(name))
            .select((GameRow::as_select(), GameTemplateRow::as_select()))
            .first::<(GameRow, GameTemplateRow)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_game))
    }

    async fn list_by_template(
        &self,
        template_id: &Uuid,
        include_unpublished: bool,
    ) -> Result<Vec<Game>, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = games::table
            .inner_join(game_templates::table)
            .filter(games::game_template_id.eq(template_id))
            .order((games::created_at.desc(), games::id.desc()))
            .select((GameRow::as_select(), GameTemplateRow::as_select()))
            .into_boxed();
        if !include_unpublished {
            query = query.filter(games::is_published.eq(true));
        }

        let rows: Vec<(GameRow, GameTemplateRow)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_game).collect())
    }

    async fn insert(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewGameRow {
            id: game.id,
            name: &game.name,
            description: game.description.as_deref(),
            thumbnail_image: game.thumbnail_image.as_deref(),
            game_template_id: game.template.id,
            creator_id: *game.creator_id.as_uuid(),
            is_published: game.is_published,
            total_played: game.total_played,
            game_json: &game.game_json,
            created_at: game.created_at,
            updated_at: game.created_at,
        };

        diesel::insert_into(games::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, &game.name))
    }

    async fn update(
        &self,
        game: &Game,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = game_changes(game, updated_at);

        let affected = diesel::update(games::table.filter(games::id.eq(game.id)))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &game.name))?;

        Ok(affected > 0)
    }

    async fn delete(&self, game_id: &Uuid) -> Result<bool, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(games::table.filter(games::id.eq(game_id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn increment_total_played(&self, game_id: &Uuid) -> Result<bool, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(games::table.filter(games::id.eq(game_id)))
            .set(games::total_played.eq(games::total_played + 1_i64))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }
}
