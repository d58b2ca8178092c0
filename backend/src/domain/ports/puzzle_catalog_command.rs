//! Driving port for puzzle catalogue mutations.
//!
//! Requests carry already-decoded [`UploadFile`] values; how files reach the
//! adapter is the adapter's concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Actor, AssetPrefix, Difficulty, Error, Player, UploadFile};

/// Input for creating a puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePuzzleRequest {
    pub actor: Actor,
    pub name: String,
    pub description: Option<String>,
    pub rows: Option<u8>,
    pub cols: Option<u8>,
    pub difficulty: Option<Difficulty>,
    pub is_published: Option<bool>,
    pub thumbnail: Option<UploadFile>,
    pub puzzle_images: Vec<UploadFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePuzzleResponse {
    pub game_id: Uuid,
}

/// Partial update of a puzzle. `None` leaves a field unchanged.
///
/// A blank `description` clears it. Supplying `puzzle_images` replaces the
/// whole image set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePuzzleRequest {
    pub actor: Actor,
    pub game_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub rows: Option<u8>,
    pub cols: Option<u8>,
    pub difficulty: Option<Difficulty>,
    pub is_published: Option<bool>,
    pub thumbnail: Option<UploadFile>,
    pub puzzle_images: Option<Vec<UploadFile>>,
}

impl UpdatePuzzleRequest {
    /// An update that changes nothing.
    pub fn empty(actor: Actor, game_id: Uuid) -> Self {
        Self {
            actor,
            game_id,
            name: None,
            description: None,
            rows: None,
            cols: None,
            difficulty: None,
            is_published: None,
            thumbnail: None,
            puzzle_images: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePuzzleResponse {
    pub game_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePuzzleRequest {
    pub actor: Actor,
    pub game_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePuzzleResponse {
    pub game_id: Uuid,
}

/// Standalone image upload outside of create/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPuzzleImageRequest {
    pub player: Player,
    pub file: UploadFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPuzzleImageResponse {
    pub path: String,
}

/// Driving port for puzzle catalogue write operations.
///
/// Implementations verify that the actor is an editor or the creator before
/// mutating an existing record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PuzzleCatalogCommand: Send + Sync {
    /// Creates a puzzle and uploads its images. Duplicate names are rejected
    /// with `InvalidRequest`.
    async fn create_puzzle(
        &self,
        request: CreatePuzzleRequest,
    ) -> Result<CreatePuzzleResponse, Error>;

    /// Applies a partial update, then schedules removal of images the record
    /// no longer references.
    async fn update_puzzle(
        &self,
        request: UpdatePuzzleRequest,
    ) -> Result<UpdatePuzzleResponse, Error>;

    /// Deletes a puzzle, then schedules removal of every image it referenced.
    async fn delete_puzzle(
        &self,
        request: DeletePuzzleRequest,
    ) -> Result<DeletePuzzleResponse, Error>;

    /// Stores one image under the uploader's namespace.
    async fn upload_image(
        &self,
        request: UploadPuzzleImageRequest,
    ) -> Result<UploadPuzzleImageResponse, Error>;
}

/// Fixture command that accepts every request without persisting it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePuzzleCatalogCommand;

#[async_trait]
impl PuzzleCatalogCommand for FixturePuzzleCatalogCommand {
    async fn create_puzzle(
        &self,
        _request: CreatePuzzleRequest,
    ) -> Result<CreatePuzzleResponse, Error> {
        Ok(CreatePuzzleResponse {
            game_id: Uuid::new_v4(),
        })
    }

    async fn update_puzzle(
        &self,
        request: UpdatePuzzleRequest,
    ) -> Result<UpdatePuzzleResponse, Error> {
        Ok(UpdatePuzzleResponse {
            game_id: request.game_id,
        })
    }

    async fn delete_puzzle(
        &self,
        request: DeletePuzzleRequest,
    ) -> Result<DeletePuzzleResponse, Error> {
        Ok(DeletePuzzleResponse {
            game_id: request.game_id,
        })
    }

    async fn upload_image(
        &self,
        request: UploadPuzzleImageRequest,
    ) -> Result<UploadPuzzleImageResponse, Error> {
        let prefix = AssetPrefix::for_uploader(&request.player);
        Ok(UploadPuzzleImageResponse {
            path: format!("{prefix}/{}", request.file.file_name),
        })
    }
}
