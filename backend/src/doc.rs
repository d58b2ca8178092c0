//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every puzzle and health endpoint together with the
//! schema wrappers from [`crate::inbound::http::schemas`], so domain types
//! stay free of utoipa derives. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::puzzles::{
    CreatePuzzleBody, FinishPuzzleBody, StartPuzzleBody, UpdatePuzzleBody, UploadImageBody,
};
use crate::inbound::http::schemas::{
    DifficultySchema, ErrorCodeSchema, ErrorSchema, FinishedPuzzleSchema, LeaderboardSchema,
    PuzzleConfigSchema, PuzzleDetailSchema, PuzzleEnvelopeSchema, PuzzleListSchema,
    PuzzleMutationSchema, PuzzleSummarySchema, RankedEntrySchema, StartedPuzzleSchema,
    UploadedImageSchema,
};
use crate::inbound::http::validation::UploadBody;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie written by the platform auth service.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Games backend API",
        description = "Puzzle catalogue, timed puzzle sessions and leaderboards."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::puzzles::list_puzzles,
        crate::inbound::http::puzzles::get_puzzle,
        crate::inbound::http::puzzles::get_puzzle_for_edit,
        crate::inbound::http::puzzles::get_leaderboard,
        crate::inbound::http::puzzles::start_puzzle,
        crate::inbound::http::puzzles::finish_puzzle,
        crate::inbound::http::puzzles::upload_image,
        crate::inbound::http::puzzles::create_puzzle,
        crate::inbound::http::puzzles::update_puzzle,
        crate::inbound::http::puzzles::delete_puzzle,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        DifficultySchema,
        PuzzleConfigSchema,
        PuzzleSummarySchema,
        PuzzleListSchema,
        PuzzleDetailSchema,
        PuzzleEnvelopeSchema,
        PuzzleMutationSchema,
        UploadedImageSchema,
        StartedPuzzleSchema,
        FinishedPuzzleSchema,
        RankedEntrySchema,
        LeaderboardSchema,
        UploadBody,
        CreatePuzzleBody,
        UpdatePuzzleBody,
        UploadImageBody,
        StartPuzzleBody,
        FinishPuzzleBody,
    )),
    tags(
        (name = "puzzles", description = "Puzzle catalogue, sessions and leaderboards"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
