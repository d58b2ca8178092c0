//! OpenAPI schema definitions for domain types.
//!
//! Domain and port types stay free of `utoipa` derives. The wrappers here
//! mirror their JSON shape and register under the domain type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed request, failed validation or duplicate puzzle name.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Not permitted, or the puzzle is unpublished.
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// The session has already finished.
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "a puzzle with this name already exists")]
    message: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// `{ "field": ..., "code": ... }` for validation failures.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Difficulty`].
#[derive(ToSchema)]
#[schema(as = Difficulty)]
pub enum DifficultySchema {
    #[schema(rename = "easy")]
    Easy,
    #[schema(rename = "medium")]
    Medium,
    #[schema(rename = "hard")]
    Hard,
}

/// OpenAPI schema for [`crate::domain::ports::PuzzleConfigPayload`].
#[derive(ToSchema)]
#[schema(as = PuzzleConfig, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PuzzleConfigSchema {
    title: String,
    description: Option<String>,
    /// Primary image path.
    image_url: String,
    images: Vec<String>,
    thumbnail: String,
    #[schema(minimum = 2, maximum = 10)]
    rows: u8,
    #[schema(minimum = 2, maximum = 10)]
    cols: u8,
    difficulty: DifficultySchema,
    #[schema(example = 600)]
    time_limit_sec: u32,
}

/// OpenAPI schema for [`crate::domain::ports::PuzzleSummary`].
#[derive(ToSchema)]
#[schema(as = PuzzleSummary, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PuzzleSummarySchema {
    #[schema(format = "uuid")]
    id: String,
    name: String,
    description: Option<String>,
    thumbnail: Option<String>,
    difficulty: DifficultySchema,
    rows: u8,
    cols: u8,
    total_played: i64,
    is_published: bool,
}

/// OpenAPI schema for [`crate::domain::ports::ListPuzzlesResponse`].
#[derive(ToSchema)]
#[schema(as = PuzzleList)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PuzzleListSchema {
    puzzles: Vec<PuzzleSummarySchema>,
}

/// OpenAPI schema for [`crate::domain::ports::PuzzleDetail`].
#[derive(ToSchema)]
#[schema(as = PuzzleDetail, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PuzzleDetailSchema {
    #[schema(format = "uuid")]
    id: String,
    name: String,
    description: Option<String>,
    thumbnail: Option<String>,
    is_published: bool,
    total_played: i64,
    #[schema(format = "date-time")]
    created_at: String,
    config: PuzzleConfigSchema,
    /// Present on the edit view only.
    #[schema(format = "uuid")]
    creator_id: Option<String>,
}

/// Wrapper returned by the detail and edit endpoints.
#[derive(ToSchema)]
#[schema(as = PuzzleEnvelope)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PuzzleEnvelopeSchema {
    puzzle: PuzzleDetailSchema,
}

/// Identifier returned by create, update and delete.
#[derive(ToSchema)]
#[schema(as = PuzzleMutation, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PuzzleMutationSchema {
    #[schema(format = "uuid")]
    game_id: String,
}

/// OpenAPI schema for [`crate::domain::ports::UploadPuzzleImageResponse`].
#[derive(ToSchema)]
#[schema(as = UploadedImage)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UploadedImageSchema {
    #[schema(example = "puzzle/uploads/anonymous/9f86d081.png")]
    path: String,
}

/// OpenAPI schema for [`crate::domain::ports::StartPuzzleResponse`].
#[derive(ToSchema)]
#[schema(as = StartedPuzzle, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct StartedPuzzleSchema {
    #[schema(format = "uuid")]
    session_id: String,
    #[schema(format = "uuid")]
    game_id: String,
    name: String,
    #[schema(format = "date-time")]
    started_at: String,
    /// Grid and time limit derived from the chosen difficulty.
    config: PuzzleConfigSchema,
}

/// OpenAPI schema for [`crate::domain::ports::FinishPuzzleResponse`].
#[derive(ToSchema)]
#[schema(as = FinishedPuzzle, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct FinishedPuzzleSchema {
    #[schema(format = "uuid")]
    session_id: String,
    #[schema(format = "uuid")]
    game_id: String,
    game_name: String,
    thumbnail: Option<String>,
    difficulty: DifficultySchema,
    #[schema(format = "date-time")]
    started_at: String,
    #[schema(format = "date-time")]
    finished_at: String,
    time_taken_sec: u32,
    move_count: u32,
    #[schema(minimum = 100, maximum = 1000)]
    score: u32,
    #[schema(format = "uuid")]
    leaderboard_entry_id: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ports::RankedEntry`].
#[derive(ToSchema)]
#[schema(as = RankedEntry, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct RankedEntrySchema {
    #[schema(minimum = 1)]
    rank: u32,
    #[schema(format = "uuid")]
    entry_id: String,
    #[schema(format = "uuid")]
    user_id: String,
    score: u32,
    difficulty: DifficultySchema,
    time_taken_sec: u32,
    #[schema(format = "date-time")]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::ports::LeaderboardResponse`].
#[derive(ToSchema)]
#[schema(as = Leaderboard, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct LeaderboardSchema {
    #[schema(format = "uuid")]
    game_id: String,
    entries: Vec<RankedEntrySchema>,
}
