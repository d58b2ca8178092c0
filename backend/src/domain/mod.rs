//! Domain primitives, services and ports.
//!
//! Purpose: define the puzzle game rules and the services that drive them,
//! independent of HTTP and storage. Services depend only on the traits in
//! [`ports`]; adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - Error / ErrorCode: tagged failure returned by every driving port.
//! - Game / GameConfig: stored game record and its template-keyed blob.
//! - puzzle: configuration codec, scoring, sessions, ranking and validation.
//! - PuzzleCatalogService, PuzzleSessionService, LeaderboardService: driving
//!   port implementations.

pub mod asset;
pub mod error;
pub mod game;
mod leaderboard_service;
pub mod ports;
pub mod puzzle;
mod puzzle_catalog_service;
mod puzzle_games;
mod puzzle_session_service;
pub mod trace_id;
pub mod user;

pub use self::asset::{
    AssetCleanup, AssetPrefix, CleanupReason, MAX_IMAGE_BYTES, UploadFile,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::game::{Game, GameConfig, GameTemplate, PUZZLE_TEMPLATE_SLUG};
pub use self::leaderboard_service::LeaderboardService;
pub use self::puzzle::*;
pub use self::puzzle_catalog_service::PuzzleCatalogService;
pub use self::puzzle_session_service::PuzzleSessionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Actor, Player, UserId, UserRole, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use games_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
