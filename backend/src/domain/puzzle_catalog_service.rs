//! Puzzle catalogue services.
//!
//! Implements the catalogue query and command driving ports. Mutations
//! upload images before persisting the record and hand stale paths to the
//! cleanup queue only after the record change succeeded.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    AssetCleanupQueue, AssetStore, CreatePuzzleRequest, CreatePuzzleResponse, DeletePuzzleRequest,
    DeletePuzzleResponse, GameRepository, GetPuzzleForEditRequest, GetPuzzleForEditResponse,
    GetPuzzleRequest, GetPuzzleResponse, ListPuzzlesRequest, ListPuzzlesResponse,
    PuzzleCatalogCommand, PuzzleCatalogQuery, PuzzleDetail, PuzzleEditView, PuzzleSummary,
    UpdatePuzzleRequest, UpdatePuzzleResponse, UploadPuzzleImageRequest,
    UploadPuzzleImageResponse,
};
use crate::domain::puzzle_games::{
    duplicate_name_error, find_puzzle_template, load_puzzle, load_puzzle_game,
    map_asset_store_error, map_game_repository_error, puzzle_not_found,
};
use crate::domain::{
    Actor, AssetCleanup, AssetPrefix, DEFAULT_GRID_SIDE, Difficulty, Error, Game, GameConfig,
    PuzzleConfig, PuzzleConfigDraft, PuzzleValidationError, UploadFile, normalize_description,
    normalize_puzzle_name, validate_grid_side, validate_image, validate_puzzle_images,
};

/// Catalogue service implementing the query and command driving ports.
#[derive(Clone)]
pub struct PuzzleCatalogService<G, A> {
    games: Arc<G>,
    assets: Arc<A>,
    cleanup: Arc<dyn AssetCleanupQueue>,
    clock: Arc<dyn Clock>,
}

impl<G, A> PuzzleCatalogService<G, A> {
    pub fn new(
        games: Arc<G>,
        assets: Arc<A>,
        cleanup: Arc<dyn AssetCleanupQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            games,
            assets,
            cleanup,
            clock,
        }
    }
}

fn ensure_may_edit(actor: &Actor, game: &Game) -> Result<(), Error> {
    if actor.may_edit(&game.creator_id) {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "user {} may not modify puzzle {}",
            actor.user_id, game.id
        )))
    }
}

/// Images uploaded during one mutation, tracked so they can be discarded if
/// the mutation fails before it is persisted.
///
/// Uploads are content addressed, so re-uploading an image the stored record
/// already points at yields the same path. Such paths are `referenced` and
/// survive an abandoned batch.
struct UploadBatch {
    game_id: Uuid,
    prefix: AssetPrefix,
    paths: BTreeSet<String>,
    referenced: BTreeSet<String>,
}

impl UploadBatch {
    fn new(game_id: Uuid) -> Self {
        Self {
            game_id,
            prefix: AssetPrefix::for_game(game_id),
            paths: BTreeSet::new(),
            referenced: BTreeSet::new(),
        }
    }

    fn for_existing(game: &Game) -> Self {
        Self {
            referenced: game.asset_paths(),
            ..Self::new(game.id)
        }
    }

    fn into_cleanup(self) -> AssetCleanup {
        let orphans = self.paths.difference(&self.referenced).cloned().collect();
        AssetCleanup::abandoned(self.game_id, orphans)
    }
}

impl<G, A> PuzzleCatalogService<G, A>
where
    G: GameRepository,
    A: AssetStore,
{
    async fn upload_into(&self, batch: &mut UploadBatch, file: &UploadFile) -> Result<String, Error> {
        let path = self
            .assets
            .upload(&batch.prefix, file)
            .await
            .map_err(map_asset_store_error)?;
        batch.paths.insert(path.clone());
        Ok(path)
    }

    async fn upload_all(
        &self,
        batch: &mut UploadBatch,
        files: &[UploadFile],
    ) -> Result<Vec<String>, Error> {
        let mut paths = Vec::with_capacity(files.len());
        for file in files {
            paths.push(self.upload_into(batch, file).await?);
        }
        Ok(paths)
    }

    /// Discard a batch's uploads and pass `error` through.
    async fn abandon<T>(&self, batch: UploadBatch, error: Error) -> Result<T, Error> {
        let cleanup = batch.into_cleanup();
        if !cleanup.is_empty() {
            self.cleanup.enqueue(cleanup).await;
        }
        Err(error)
    }

    async fn ensure_name_free(
        &self,
        template_id: Uuid,
        name: &str,
        own_id: Option<Uuid>,
    ) -> Result<(), Error> {
        let existing = self
            .games
            .find_by_name(&template_id, name)
            .await
            .map_err(map_game_repository_error)?;
        match existing {
            Some(other) if Some(other.id) != own_id => Err(duplicate_name_error(name)),
            _ => Ok(()),
        }
    }
}

fn split_images(paths: Vec<String>) -> Result<(String, Vec<String>), Error> {
    let primary = paths
        .first()
        .cloned()
        .ok_or_else(|| Error::from(PuzzleValidationError::ImageCount {
            max: crate::domain::MAX_PUZZLE_IMAGES,
            actual: 0,
        }))?;
    Ok((primary, paths))
}

#[async_trait]
impl<G, A> PuzzleCatalogQuery for PuzzleCatalogService<G, A>
where
    G: GameRepository,
    A: AssetStore,
{
    async fn list_puzzles(
        &self,
        request: ListPuzzlesRequest,
    ) -> Result<ListPuzzlesResponse, Error> {
        let Some(template) = find_puzzle_template(self.games.as_ref()).await? else {
            return Ok(ListPuzzlesResponse {
                puzzles: Vec::new(),
            });
        };

        let games = self
            .games
            .list_by_template(&template.id, request.include_unpublished)
            .await
            .map_err(map_game_repository_error)?;

        let puzzles = games
            .iter()
            .filter(|game| request.include_unpublished || game.is_published)
            .filter_map(|game| match game.config() {
                Ok(GameConfig::Puzzle(config)) => Some(PuzzleSummary::new(game, &config)),
                Ok(GameConfig::Other { .. }) => None,
                Err(error) => {
                    warn!(game_id = %game.id, %error, "skipping puzzle with undecodable configuration");
                    None
                }
            })
            .collect();

        Ok(ListPuzzlesResponse { puzzles })
    }

    async fn get_puzzle(&self, request: GetPuzzleRequest) -> Result<GetPuzzleResponse, Error> {
        let (game, config) = load_puzzle(self.games.as_ref(), request.game_id).await?;
        Ok(GetPuzzleResponse {
            puzzle: PuzzleDetail::new(&game, &config),
        })
    }

    async fn get_puzzle_for_edit(
        &self,
        request: GetPuzzleForEditRequest,
    ) -> Result<GetPuzzleForEditResponse, Error> {
        let (game, config) = load_puzzle(self.games.as_ref(), request.game_id).await?;
        ensure_may_edit(&request.actor, &game)?;
        Ok(GetPuzzleForEditResponse {
            puzzle: PuzzleEditView {
                detail: PuzzleDetail::new(&game, &config),
                creator_id: game.creator_id,
            },
        })
    }
}

#[async_trait]
impl<G, A> PuzzleCatalogCommand for PuzzleCatalogService<G, A>
where
    G: GameRepository,
    A: AssetStore,
{
    async fn create_puzzle(
        &self,
        request: CreatePuzzleRequest,
    ) -> Result<CreatePuzzleResponse, Error> {
        let name = normalize_puzzle_name(&request.name)?;
        let description = normalize_description(request.description.as_deref())?;
        let rows = validate_grid_side("rows", request.rows.unwrap_or(DEFAULT_GRID_SIDE))?;
        let cols = validate_grid_side("cols", request.cols.unwrap_or(DEFAULT_GRID_SIDE))?;
        let thumbnail = request
            .thumbnail
            .as_ref()
            .ok_or(PuzzleValidationError::MissingThumbnail)?;
        validate_image("thumbnail", thumbnail)?;
        validate_puzzle_images(&request.puzzle_images)?;

        let template = find_puzzle_template(self.games.as_ref())
            .await?
            .ok_or_else(|| Error::not_found("puzzle template not found"))?;
        self.ensure_name_free(template.id, &name, None).await?;

        let game_id = Uuid::new_v4();
        let mut batch = UploadBatch::new(game_id);
        let thumbnail_path = match self.upload_into(&mut batch, thumbnail).await {
            Ok(path) => path,
            Err(error) => return self.abandon(batch, error).await,
        };
        let image_paths = match self.upload_all(&mut batch, &request.puzzle_images).await {
            Ok(paths) => paths,
            Err(error) => return self.abandon(batch, error).await,
        };
        let (image_url, images) = split_images(image_paths)?;

        let config = PuzzleConfig::new(PuzzleConfigDraft {
            title: name.clone(),
            description: description.clone(),
            image_url,
            images,
            thumbnail: Some(thumbnail_path.clone()),
            rows,
            cols,
            difficulty: request.difficulty.unwrap_or(Difficulty::Medium),
        });
        let game = Game {
            id: game_id,
            name,
            description,
            thumbnail_image: Some(thumbnail_path),
            template,
            creator_id: request.actor.user_id.clone(),
            is_published: request.is_published.unwrap_or(false),
            total_played: 0,
            game_json: GameConfig::Puzzle(config).encode(),
            created_at: self.clock.utc(),
        };

        if let Err(error) = self.games.insert(&game).await {
            return self.abandon(batch, map_game_repository_error(error)).await;
        }

        info!(game_id = %game.id, creator = %game.creator_id, "puzzle created");
        Ok(CreatePuzzleResponse { game_id })
    }

    async fn update_puzzle(
        &self,
        request: UpdatePuzzleRequest,
    ) -> Result<UpdatePuzzleResponse, Error> {
        let (game, config) = load_puzzle(self.games.as_ref(), request.game_id).await?;
        ensure_may_edit(&request.actor, &game)?;

        let name = match request.name.as_deref() {
            Some(raw) => normalize_puzzle_name(raw)?,
            None => game.name.clone(),
        };
        let description = match request.description.as_deref() {
            Some(raw) => normalize_description(Some(raw))?,
            None => game.description.clone(),
        };
        let rows = request
            .rows
            .map(|value| validate_grid_side("rows", value))
            .transpose()?;
        let cols = request
            .cols
            .map(|value| validate_grid_side("cols", value))
            .transpose()?;
        if let Some(thumbnail) = &request.thumbnail {
            validate_image("thumbnail", thumbnail)?;
        }
        if let Some(images) = &request.puzzle_images {
            validate_puzzle_images(images)?;
        }
        if name != game.name {
            self.ensure_name_free(game.template.id, &name, Some(game.id))
                .await?;
        }

        let mut batch = UploadBatch::for_existing(&game);
        let thumbnail_path = match &request.thumbnail {
            Some(file) => match self.upload_into(&mut batch, file).await {
                Ok(path) => Some(path),
                Err(error) => return self.abandon(batch, error).await,
            },
            None => None,
        };
        let image_paths = match &request.puzzle_images {
            Some(files) => match self.upload_all(&mut batch, files).await {
                Ok(paths) => Some(paths),
                Err(error) => return self.abandon(batch, error).await,
            },
            None => None,
        };

        let before = game.asset_paths();
        let mut draft = config.into_draft();
        draft.title = name.clone();
        draft.description = description.clone();
        if let Some(rows) = rows {
            draft.rows = rows;
        }
        if let Some(cols) = cols {
            draft.cols = cols;
        }
        if let Some(difficulty) = request.difficulty {
            draft.difficulty = difficulty;
        }
        if let Some(path) = &thumbnail_path {
            draft.thumbnail = Some(path.clone());
        }
        if let Some(paths) = image_paths {
            let (image_url, images) = split_images(paths)?;
            draft.image_url = image_url;
            draft.images = images;
        }

        let updated = Game {
            name,
            description,
            thumbnail_image: thumbnail_path.or_else(|| game.thumbnail_image.clone()),
            is_published: request.is_published.unwrap_or(game.is_published),
            game_json: GameConfig::Puzzle(PuzzleConfig::new(draft)).encode(),
            ..game
        };

        match self.games.update(&updated, self.clock.utc()).await {
            Ok(true) => {}
            Ok(false) => return self.abandon(batch, puzzle_not_found(updated.id)).await,
            Err(error) => return self.abandon(batch, map_game_repository_error(error)).await,
        }

        let stale = AssetCleanup::replaced(updated.id, &before, &updated.asset_paths());
        if !stale.is_empty() {
            self.cleanup.enqueue(stale).await;
        }

        info!(game_id = %updated.id, actor = %request.actor.user_id, "puzzle updated");
        Ok(UpdatePuzzleResponse {
            game_id: updated.id,
        })
    }

    async fn delete_puzzle(
        &self,
        request: DeletePuzzleRequest,
    ) -> Result<DeletePuzzleResponse, Error> {
        let game = load_puzzle_game(self.games.as_ref(), request.game_id).await?;
        ensure_may_edit(&request.actor, &game)?;

        let paths = game.asset_paths();
        let deleted = self
            .games
            .delete(&game.id)
            .await
            .map_err(map_game_repository_error)?;
        if !deleted {
            return Err(puzzle_not_found(game.id));
        }

        let cleanup = AssetCleanup::deleted(game.id, paths);
        if !cleanup.is_empty() {
            self.cleanup.enqueue(cleanup).await;
        }

        info!(game_id = %game.id, actor = %request.actor.user_id, "puzzle deleted");
        Ok(DeletePuzzleResponse { game_id: game.id })
    }

    async fn upload_image(
        &self,
        request: UploadPuzzleImageRequest,
    ) -> Result<UploadPuzzleImageResponse, Error> {
        validate_image("image", &request.file)?;
        let prefix = AssetPrefix::for_uploader(&request.player);
        let path = self
            .assets
            .upload(&prefix, &request.file)
            .await
            .map_err(map_asset_store_error)?;
        Ok(UploadPuzzleImageResponse { path })
    }
}

#[cfg(test)]
#[path = "puzzle_catalog_service_tests.rs"]
mod tests;
