//! Image asset value types.
//!
//! Uploaded files travel through the domain as [`UploadFile`] values. Stored
//! assets are addressed by relative paths under a namespaced prefix, and
//! stale paths are collected into an [`AssetCleanup`] task once the owning
//! record change has been persisted.

use std::collections::BTreeSet;
use std::fmt;

use uuid::Uuid;

use crate::domain::Player;

/// Largest accepted image upload, in bytes.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Root prefix shared by all puzzle assets.
const PUZZLE_ASSET_ROOT: &str = "puzzle";

/// A decoded file ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Lowercase file extension when it is short and alphanumeric.
    ///
    /// # Examples
    /// ```
    /// use games_backend::domain::UploadFile;
    ///
    /// assert_eq!(UploadFile::new("Harbour.PNG", vec![]).extension().as_deref(), Some("png"));
    /// assert_eq!(UploadFile::new("../../etc/passwd", vec![]).extension(), None);
    /// ```
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() || ext.len() > 8 {
            return None;
        }
        ext.chars()
            .all(|ch| ch.is_ascii_alphanumeric())
            .then(|| ext.to_ascii_lowercase())
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Namespaced directory under which assets are stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetPrefix(String);

impl AssetPrefix {
    /// Prefix for assets owned by a puzzle game.
    pub fn for_game(game_id: Uuid) -> Self {
        Self(format!("{PUZZLE_ASSET_ROOT}/{game_id}"))
    }

    /// Prefix for standalone uploads by `player`.
    ///
    /// # Examples
    /// ```
    /// use games_backend::domain::{AssetPrefix, Player};
    ///
    /// assert_eq!(
    ///     AssetPrefix::for_uploader(&Player::Anonymous).as_str(),
    ///     "puzzle/uploads/anonymous"
    /// );
    /// ```
    pub fn for_uploader(player: &Player) -> Self {
        Self(format!("{PUZZLE_ASSET_ROOT}/uploads/{player}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a cleanup task was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupReason {
    /// Paths dropped by an update.
    Replaced,
    /// Paths owned by a deleted game.
    Deleted,
    /// Uploads orphaned by a mutation that failed before it was persisted.
    Abandoned,
}

impl CleanupReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replaced => "replaced",
            Self::Deleted => "deleted",
            Self::Abandoned => "abandoned",
        }
    }
}

/// Post-commit, best-effort removal of asset paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCleanup {
    game_id: Uuid,
    reason: CleanupReason,
    paths: BTreeSet<String>,
}

impl AssetCleanup {
    /// Remove every path a deleted game referenced.
    pub fn deleted(game_id: Uuid, paths: BTreeSet<String>) -> Self {
        Self {
            game_id,
            reason: CleanupReason::Deleted,
            paths,
        }
    }

    /// Remove uploads that no persisted record references.
    pub fn abandoned(game_id: Uuid, paths: BTreeSet<String>) -> Self {
        Self {
            game_id,
            reason: CleanupReason::Abandoned,
            paths,
        }
    }

    /// Remove paths referenced `before` an update but not `after` it.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeSet;
    /// use games_backend::domain::AssetCleanup;
    /// use uuid::Uuid;
    ///
    /// let before: BTreeSet<String> = ["a.png", "b.png"].map(String::from).into();
    /// let after: BTreeSet<String> = ["b.png", "c.png"].map(String::from).into();
    /// let cleanup = AssetCleanup::replaced(Uuid::nil(), &before, &after);
    /// assert_eq!(cleanup.paths().iter().collect::<Vec<_>>(), ["a.png"]);
    /// ```
    pub fn replaced(game_id: Uuid, before: &BTreeSet<String>, after: &BTreeSet<String>) -> Self {
        Self {
            game_id,
            reason: CleanupReason::Replaced,
            paths: before.difference(after).cloned().collect(),
        }
    }

    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    pub fn reason(&self) -> CleanupReason {
        self.reason
    }

    pub fn paths(&self) -> &BTreeSet<String> {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
