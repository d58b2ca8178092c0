//! Puzzle game rules: configuration codec, scoring, sessions and ranking.

pub mod config;
pub mod leaderboard;
pub mod scoring;
pub mod session;
pub mod validation;

pub use self::config::{
    Difficulty, EASY_TIME_LIMIT_SEC, GridSize, HARD_TIME_LIMIT_SEC, MEDIUM_TIME_LIMIT_SEC,
    PuzzleConfig, PuzzleConfigDecodeError, PuzzleConfigDraft, UnknownDifficulty,
    decode_puzzle_config, encode_puzzle_config, grid_size_for_difficulty,
    time_limit_for_difficulty,
};
pub use self::leaderboard::{
    DEFAULT_LEADERBOARD_LIMIT, LeaderboardEntry, LeaderboardLimit, MAX_LEADERBOARD_LIMIT,
    compare_entries, rank,
};
pub use self::scoring::{MAX_SCORE, MIN_SCORE, MOVE_PENALTY, score_session};
pub use self::session::{
    PuzzleSession, ReportedOutcome, SessionCompletion, SessionState, SessionTransitionError,
};
pub use self::validation::{
    DEFAULT_GRID_SIDE, MAX_DESCRIPTION_CHARS, MAX_GRID_SIDE, MAX_NAME_CHARS, MAX_PUZZLE_IMAGES,
    MIN_GRID_SIDE, PuzzleValidationError, normalize_description, normalize_puzzle_name,
    validate_grid_side, validate_image, validate_puzzle_images,
};
