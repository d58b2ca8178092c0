//! Puzzle game HTTP handlers.
//!
//! ```text
//! GET    /api/v1/game/game-type/puzzle
//! POST   /api/v1/game/game-type/puzzle
//! POST   /api/v1/game/game-type/puzzle/upload-image
//! POST   /api/v1/game/game-type/puzzle/finish
//! GET    /api/v1/game/game-type/puzzle/{game_id}
//! PATCH  /api/v1/game/game-type/puzzle/{game_id}
//! DELETE /api/v1/game/game-type/puzzle/{game_id}
//! GET    /api/v1/game/game-type/puzzle/{game_id}/edit
//! GET    /api/v1/game/game-type/puzzle/{game_id}/leaderboard
//! POST   /api/v1/game/game-type/puzzle/{game_id}/start
//! ```
//!
//! Uploaded images travel base64-encoded inside the JSON body.

use actix_web::{delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Difficulty;
use crate::domain::ports::{
    CreatePuzzleRequest, CreatePuzzleResponse, DeletePuzzleRequest, DeletePuzzleResponse,
    FinishPuzzleRequest, FinishPuzzleResponse, GetPuzzleForEditRequest, GetPuzzleForEditResponse,
    GetPuzzleRequest, GetPuzzleResponse, LeaderboardRequest, LeaderboardResponse,
    ListPuzzlesRequest, ListPuzzlesResponse, StartPuzzleRequest, StartPuzzleResponse,
    UpdatePuzzleRequest, UpdatePuzzleResponse, UploadPuzzleImageRequest, UploadPuzzleImageResponse,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    ErrorSchema, FinishedPuzzleSchema, LeaderboardSchema, PuzzleEnvelopeSchema,
    PuzzleListSchema, PuzzleMutationSchema, StartedPuzzleSchema, UploadedImageSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, UploadBody, decode_upload, decode_uploads, parse_difficulty, parse_uuid,
};

const GAME_ID: FieldName = FieldName::new("gameId");

/// Query parameters for the puzzle list.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListPuzzlesQuery {
    /// Honoured for admin callers only.
    #[serde(default)]
    pub include_unpublished: bool,
}

/// Query parameters for the leaderboard.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQueryParams {
    /// Number of entries, clamped to `1..=100`; default 10.
    pub limit: Option<u32>,
}

/// Request payload for creating a puzzle.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePuzzleBody {
    pub name: String,
    pub description: Option<String>,
    pub rows: Option<u8>,
    pub cols: Option<u8>,
    #[schema(example = "medium")]
    pub difficulty: Option<String>,
    pub is_published: Option<bool>,
    pub thumbnail: Option<UploadBody>,
    #[serde(default)]
    pub puzzle_images: Vec<UploadBody>,
}

/// Request payload for a partial puzzle update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePuzzleBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rows: Option<u8>,
    pub cols: Option<u8>,
    pub difficulty: Option<String>,
    pub is_published: Option<bool>,
    pub thumbnail: Option<UploadBody>,
    /// Replaces every stored image when present.
    pub puzzle_images: Option<Vec<UploadBody>>,
}

/// Request payload for a standalone image upload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UploadImageBody {
    pub image: UploadBody,
}

/// Request payload for starting a session.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct StartPuzzleBody {
    /// Unknown labels fall back to `easy`.
    #[schema(example = "easy")]
    pub difficulty: Option<String>,
}

/// Request payload for finishing a session.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinishPuzzleBody {
    #[schema(format = "uuid")]
    pub session_id: String,
    #[schema(format = "uuid")]
    pub game_id: String,
    /// Client-measured seconds; ignored when longer than the server measurement.
    pub time_taken: Option<u32>,
    pub move_count: Option<u32>,
}

/// List puzzles, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/game/game-type/puzzle",
    params(ListPuzzlesQuery),
    responses(
        (status = 200, description = "Puzzle summaries", body = PuzzleListSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["puzzles"],
    operation_id = "listPuzzles",
    security([])
)]
#[get("/game/game-type/puzzle")]
pub async fn list_puzzles(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListPuzzlesQuery>,
) -> ApiResult<web::Json<ListPuzzlesResponse>> {
    let include_unpublished = query.include_unpublished && session.is_editor()?;
    let response = state
        .catalog
        .list_puzzles(ListPuzzlesRequest {
            include_unpublished,
        })
        .await?;
    Ok(web::Json(response))
}

/// Fetch one puzzle.
#[utoipa::path(
    get,
    path = "/api/v1/game/game-type/puzzle/{game_id}",
    params(("game_id" = Uuid, Path, description = "Puzzle identifier")),
    responses(
        (status = 200, description = "Puzzle detail", body = PuzzleEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["puzzles"],
    operation_id = "getPuzzle",
    security([])
)]
#[get("/game/game-type/puzzle/{game_id}")]
pub async fn get_puzzle(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<GetPuzzleResponse>> {
    let game_id = parse_uuid(&path, GAME_ID)?;
    let response = state.catalog.get_puzzle(GetPuzzleRequest { game_id }).await?;
    Ok(web::Json(response))
}

/// Fetch a puzzle with its creator for the edit form.
#[utoipa::path(
    get,
    path = "/api/v1/game/game-type/puzzle/{game_id}/edit",
    params(("game_id" = Uuid, Path, description = "Puzzle identifier")),
    responses(
        (status = 200, description = "Editable puzzle", body = PuzzleEnvelopeSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["puzzles"],
    operation_id = "getPuzzleForEdit",
    security(("SessionCookie" = []))
)]
#[get("/game/game-type/puzzle/{game_id}/edit")]
pub async fn get_puzzle_for_edit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<GetPuzzleForEditResponse>> {
    let actor = session.require_editor()?;
    let game_id = parse_uuid(&path, GAME_ID)?;
    let response = state
        .catalog
        .get_puzzle_for_edit(GetPuzzleForEditRequest { actor, game_id })
        .await?;
    Ok(web::Json(response))
}

/// Best finished attempts for a puzzle.
#[utoipa::path(
    get,
    path = "/api/v1/game/game-type/puzzle/{game_id}/leaderboard",
    params(("game_id" = Uuid, Path, description = "Puzzle identifier"), LeaderboardQueryParams),
    responses(
        (status = 200, description = "Ranked entries", body = LeaderboardSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["puzzles"],
    operation_id = "getPuzzleLeaderboard",
    security([])
)]
#[get("/game/game-type/puzzle/{game_id}/leaderboard")]
pub async fn get_leaderboard(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<LeaderboardQueryParams>,
) -> ApiResult<web::Json<LeaderboardResponse>> {
    let game_id = parse_uuid(&path, GAME_ID)?;
    let response = state
        .leaderboard
        .top(LeaderboardRequest {
            game_id,
            limit: query.limit,
        })
        .await?;
    Ok(web::Json(response))
}

/// Start a timed session. Anonymous players are allowed.
#[utoipa::path(
    post,
    path = "/api/v1/game/game-type/puzzle/{game_id}/start",
    params(("game_id" = Uuid, Path, description = "Puzzle identifier")),
    request_body = StartPuzzleBody,
    responses(
        (status = 200, description = "Session started", body = StartedPuzzleSchema),
        (status = 403, description = "Puzzle is unpublished", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["puzzles"],
    operation_id = "startPuzzle",
    security([])
)]
#[post("/game/game-type/puzzle/{game_id}/start")]
pub async fn start_puzzle(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: Option<web::Json<StartPuzzleBody>>,
) -> ApiResult<web::Json<StartPuzzleResponse>> {
    let game_id = parse_uuid(&path, GAME_ID)?;
    let difficulty = payload
        .and_then(|body| body.into_inner().difficulty)
        .and_then(|raw| Difficulty::lenient(&raw));
    let response = state
        .sessions
        .start_puzzle(StartPuzzleRequest {
            player: session.player()?,
            game_id,
            difficulty,
        })
        .await?;
    Ok(web::Json(response))
}

/// Finish a session and record the score.
#[utoipa::path(
    post,
    path = "/api/v1/game/game-type/puzzle/finish",
    request_body = FinishPuzzleBody,
    responses(
        (status = 200, description = "Session finished", body = FinishedPuzzleSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Session belongs to another player", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Session already finished", body = ErrorSchema)
    ),
    tags = ["puzzles"],
    operation_id = "finishPuzzle",
    security([])
)]
#[post("/game/game-type/puzzle/finish")]
pub async fn finish_puzzle(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FinishPuzzleBody>,
) -> ApiResult<web::Json<FinishPuzzleResponse>> {
    let body = payload.into_inner();
    let request = FinishPuzzleRequest {
        player: session.player()?,
        session_id: parse_uuid(&body.session_id, FieldName::new("sessionId"))?,
        game_id: parse_uuid(&body.game_id, GAME_ID)?,
        time_taken_sec: body.time_taken,
        move_count: body.move_count,
    };
    let response = state.sessions.finish_puzzle(request).await?;
    Ok(web::Json(response))
}

/// Upload one image outside of a create or update.
#[utoipa::path(
    post,
    path = "/api/v1/game/game-type/puzzle/upload-image",
    request_body = UploadImageBody,
    responses(
        (status = 200, description = "Image stored", body = UploadedImageSchema),
        (status = 400, description = "Invalid image", body = ErrorSchema),
        (status = 503, description = "Asset store unavailable", body = ErrorSchema)
    ),
    tags = ["puzzles"],
    operation_id = "uploadPuzzleImage",
    security([])
)]
#[post("/game/game-type/puzzle/upload-image")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UploadImageBody>,
) -> ApiResult<web::Json<UploadPuzzleImageResponse>> {
    let file = decode_upload(payload.into_inner().image, FieldName::new("image"))?;
    let response = state
        .catalog_command
        .upload_image(UploadPuzzleImageRequest {
            player: session.player()?,
            file,
        })
        .await?;
    Ok(web::Json(response))
}

/// Create a puzzle with its thumbnail and images.
#[utoipa::path(
    post,
    path = "/api/v1/game/game-type/puzzle",
    request_body = CreatePuzzleBody,
    responses(
        (status = 200, description = "Puzzle created", body = PuzzleMutationSchema),
        (status = 400, description = "Invalid request or duplicate name", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Puzzle template missing", body = ErrorSchema)
    ),
    tags = ["puzzles"],
    operation_id = "createPuzzle",
    security(("SessionCookie" = []))
)]
#[post("/game/game-type/puzzle")]
pub async fn create_puzzle(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePuzzleBody>,
) -> ApiResult<web::Json<CreatePuzzleResponse>> {
    let actor = session.require_editor()?;
    let body = payload.into_inner();
    let request = CreatePuzzleRequest {
        actor,
        name: body.name,
        description: body.description,
        rows: body.rows,
        cols: body.cols,
        difficulty: parse_difficulty(body.difficulty.as_deref(), FieldName::new("difficulty"))?,
        is_published: body.is_published,
        thumbnail: body
            .thumbnail
            .map(|upload| decode_upload(upload, FieldName::new("thumbnail")))
            .transpose()?,
        puzzle_images: decode_uploads(body.puzzle_images, FieldName::new("puzzleImages"))?,
    };
    let response = state.catalog_command.create_puzzle(request).await?;
    Ok(web::Json(response))
}

/// Apply a partial update.
#[utoipa::path(
    patch,
    path = "/api/v1/game/game-type/puzzle/{game_id}",
    params(("game_id" = Uuid, Path, description = "Puzzle identifier")),
    request_body = UpdatePuzzleBody,
    responses(
        (status = 200, description = "Puzzle updated", body = PuzzleMutationSchema),
        (status = 400, description = "Invalid request or duplicate name", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["puzzles"],
    operation_id = "updatePuzzle",
    security(("SessionCookie" = []))
)]
#[patch("/game/game-type/puzzle/{game_id}")]
pub async fn update_puzzle(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdatePuzzleBody>,
) -> ApiResult<web::Json<UpdatePuzzleResponse>> {
    let actor = session.require_editor()?;
    let game_id = parse_uuid(&path, GAME_ID)?;
    let body = payload.into_inner();
    let request = UpdatePuzzleRequest {
        name: body.name,
        description: body.description,
        rows: body.rows,
        cols: body.cols,
        difficulty: parse_difficulty(body.difficulty.as_deref(), FieldName::new("difficulty"))?,
        is_published: body.is_published,
        thumbnail: body
            .thumbnail
            .map(|upload| decode_upload(upload, FieldName::new("thumbnail")))
            .transpose()?,
        puzzle_images: body
            .puzzle_images
            .map(|uploads| decode_uploads(uploads, FieldName::new("puzzleImages")))
            .transpose()?,
        ..UpdatePuzzleRequest::empty(actor, game_id)
    };
    let response = state.catalog_command.update_puzzle(request).await?;
    Ok(web::Json(response))
}

/// Delete a puzzle and schedule removal of its images.
#[utoipa::path(
    delete,
    path = "/api/v1/game/game-type/puzzle/{game_id}",
    params(("game_id" = Uuid, Path, description = "Puzzle identifier")),
    responses(
        (status = 200, description = "Puzzle deleted", body = PuzzleMutationSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["puzzles"],
    operation_id = "deletePuzzle",
    security(("SessionCookie" = []))
)]
#[delete("/game/game-type/puzzle/{game_id}")]
pub async fn delete_puzzle(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletePuzzleResponse>> {
    let actor = session.require_editor()?;
    let game_id = parse_uuid(&path, GAME_ID)?;
    let response = state
        .catalog_command
        .delete_puzzle(DeletePuzzleRequest { actor, game_id })
        .await?;
    Ok(web::Json(response))
}

/// Register every puzzle route on a scope or app.
///
/// Literal paths are registered before `{game_id}` patterns.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_puzzles)
        .service(create_puzzle)
        .service(upload_image)
        .service(finish_puzzle)
        .service(get_puzzle_for_edit)
        .service(get_leaderboard)
        .service(start_puzzle)
        .service(get_puzzle)
        .service(update_puzzle)
        .service(delete_puzzle);
}

#[cfg(test)]
#[path = "puzzles_tests.rs"]
mod tests;
