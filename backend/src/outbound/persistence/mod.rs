//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel rows and domain
//! types and hold no game rules. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) never leave this module.
//!
//! ```ignore
//! use games_backend::outbound::persistence::{DbPool, DieselGameRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/games")).await?;
//! let games = DieselGameRepository::new(pool.clone());
//! ```

pub(crate) mod diesel_helpers;
mod diesel_game_repository;
mod diesel_leaderboard_repository;
mod diesel_puzzle_session_repository;
mod models;
mod pool;
mod schema;

pub use diesel_game_repository::DieselGameRepository;
pub use diesel_leaderboard_repository::DieselLeaderboardRepository;
pub use diesel_puzzle_session_repository::DieselPuzzleSessionRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
