//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{game_templates, games, leaderboard_entries, puzzle_sessions};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = game_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GameTemplateRow {
    pub id: Uuid,
    pub slug: String,
}

/// Row struct for reading from the games table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = games)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GameRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub thumbnail_image: Option<String>,
    pub creator_id: Uuid,
    pub is_published: bool,
    pub total_played: i64,
    pub game_json: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = games)]
pub(crate) struct NewGameRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub thumbnail_image: Option<&'a str>,
    pub game_template_id: Uuid,
    pub creator_id: Uuid,
    pub is_published: bool,
    pub total_played: i64,
    pub game_json: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for the mutable game columns.
///
/// `treat_none_as_null` lets an update clear the description.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = games)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct GameUpdate<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub thumbnail_image: Option<&'a str>,
    pub is_published: bool,
    pub game_json: &'a serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = puzzle_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PuzzleSessionRow {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Option<Uuid>,
    pub difficulty: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub time_taken_sec: Option<i32>,
    pub move_count: Option<i32>,
    pub score: Option<i32>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = puzzle_sessions)]
pub(crate) struct NewPuzzleSessionRow<'a> {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Option<Uuid>,
    pub difficulty: &'a str,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = puzzle_sessions)]
pub(crate) struct PuzzleSessionCompletionUpdate {
    pub finished_at: DateTime<Utc>,
    pub time_taken_sec: i32,
    pub move_count: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = leaderboard_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LeaderboardEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub score: i32,
    pub difficulty: String,
    pub time_taken_sec: i32,
    pub created_at: DateTime<Utc>,
}
