//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. Migrations
//! are provisioned outside this repository; `diesel print-schema` against a
//! live database regenerates this file.

diesel::table! {
    /// Game templates (`puzzle`, `quiz`, ...).
    game_templates (id) {
        id -> Uuid,
        /// Stable lowercase identifier, unique.
        slug -> Varchar,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Playable games of every template.
    ///
    /// `(game_template_id, name)` is unique.
    games (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        thumbnail_image -> Nullable<Text>,
        game_template_id -> Uuid,
        creator_id -> Uuid,
        is_published -> Bool,
        /// Play counter; only ever changed by `total_played + 1`.
        total_played -> Int8,
        /// Template-specific configuration blob.
        game_json -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per puzzle play-through.
    ///
    /// The completion columns are null until the session finishes.
    puzzle_sessions (id) {
        id -> Uuid,
        game_id -> Uuid,
        /// Null for anonymous players.
        user_id -> Nullable<Uuid>,
        difficulty -> Varchar,
        started_at -> Timestamptz,
        finished_at -> Nullable<Timestamptz>,
        time_taken_sec -> Nullable<Int4>,
        move_count -> Nullable<Int4>,
        score -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Immutable finished attempts by identified players.
    leaderboard_entries (id) {
        id -> Uuid,
        user_id -> Uuid,
        game_id -> Uuid,
        score -> Int4,
        difficulty -> Varchar,
        time_taken_sec -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Platform users. Only the play statistics are written here.
    users (id) {
        id -> Uuid,
        total_game_played -> Int8,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(games -> game_templates (game_template_id));
diesel::joinable!(puzzle_sessions -> games (game_id));
diesel::joinable!(leaderboard_entries -> games (game_id));

diesel::allow_tables_to_appear_in_same_query!(
    game_templates,
    games,
    puzzle_sessions,
    leaderboard_entries,
    users,
);
