//! Game records and their template-keyed configuration.
//!
//! A [`Game`] stores its configuration as an opaque JSON blob. The shape of
//! that blob depends on the game's template, so it is only interpreted
//! through [`GameConfig`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::puzzle::{
    PuzzleConfig, PuzzleConfigDecodeError, decode_puzzle_config, encode_puzzle_config,
};

/// Slug of the template whose games this service manages.
pub const PUZZLE_TEMPLATE_SLUG: &str = "puzzle";

/// Classification tag selecting a game's configuration schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTemplate {
    pub id: Uuid,
    pub slug: String,
}

impl GameTemplate {
    pub fn is_puzzle(&self) -> bool {
        self.slug == PUZZLE_TEMPLATE_SLUG
    }
}

/// Template-specific configuration decoded from a game's blob.
#[derive(Debug, Clone, PartialEq)]
pub enum GameConfig {
    Puzzle(PuzzleConfig),
    /// Configuration owned by another template, kept verbatim.
    Other { template: String, raw: Value },
}

impl GameConfig {
    /// Decode `blob` according to `template_slug`.
    pub fn decode(template_slug: &str, blob: &Value) -> Result<Self, PuzzleConfigDecodeError> {
        if template_slug == PUZZLE_TEMPLATE_SLUG {
            decode_puzzle_config(blob).map(Self::Puzzle)
        } else {
            Ok(Self::Other {
                template: template_slug.to_owned(),
                raw: blob.clone(),
            })
        }
    }

    pub fn encode(&self) -> Value {
        match self {
            Self::Puzzle(config) => encode_puzzle_config(config),
            Self::Other { raw, .. } => raw.clone(),
        }
    }

    pub fn as_puzzle(&self) -> Option<&PuzzleConfig> {
        match self {
            Self::Puzzle(config) => Some(config),
            Self::Other { .. } => None,
        }
    }
}

/// A playable game as held by the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub thumbnail_image: Option<String>,
    pub template: GameTemplate,
    pub creator_id: UserId,
    pub is_published: bool,
    pub total_played: i64,
    pub game_json: Value,
    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn config(&self) -> Result<GameConfig, PuzzleConfigDecodeError> {
        GameConfig::decode(&self.template.slug, &self.game_json)
    }

    /// Decoded puzzle configuration, or `None` for other templates.
    pub fn puzzle_config(&self) -> Result<Option<PuzzleConfig>, PuzzleConfigDecodeError> {
        match self.config()? {
            GameConfig::Puzzle(config) => Ok(Some(config)),
            GameConfig::Other { .. } => Ok(None),
        }
    }

    /// Every distinct asset path this record references.
    ///
    /// An undecodable blob contributes nothing, so deleting a corrupt record
    /// still removes its thumbnail.
    pub fn asset_paths(&self) -> BTreeSet<String> {
        let mut paths = self
            .config()
            .ok()
            .and_then(|config| config.as_puzzle().map(PuzzleConfig::image_paths))
            .unwrap_or_default();
        if let Some(thumbnail) = self.thumbnail_image.as_ref().filter(|p| !p.is_empty()) {
            paths.insert(thumbnail.clone());
        }
        paths
    }
}
