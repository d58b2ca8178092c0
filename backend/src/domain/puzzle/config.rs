//! Puzzle configuration codec.
//!
//! Games store their configuration as an opaque JSON blob. This module owns
//! the puzzle variant of that blob: decoding and encoding it, and the pure
//! difficulty lookups that derive grid size and time limit.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Time limit for easy puzzles, in seconds.
pub const EASY_TIME_LIMIT_SEC: u32 = 300;
/// Time limit for medium puzzles and the fallback for unknown difficulties.
pub const MEDIUM_TIME_LIMIT_SEC: u32 = 600;
/// Time limit for hard puzzles, in seconds.
pub const HARD_TIME_LIMIT_SEC: u32 = 900;

/// Gameplay difficulty of a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse a difficulty label, returning `None` for unknown labels instead
    /// of an error.
    ///
    /// # Examples
    /// ```
    /// use games_backend::domain::Difficulty;
    ///
    /// assert_eq!(Difficulty::lenient("hard"), Some(Difficulty::Hard));
    /// assert_eq!(Difficulty::lenient("nightmare"), None);
    /// ```
    pub fn lenient(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    /// Lowercase wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a difficulty label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("difficulty must be easy, medium or hard, got {0:?}")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(UnknownDifficulty(other.to_owned())),
        }
    }
}

/// Time limit in seconds for a difficulty.
///
/// Absent or unrecognised difficulties fall back to the medium limit rather
/// than failing.
///
/// # Examples
/// ```
/// use games_backend::domain::{Difficulty, time_limit_for_difficulty};
///
/// assert_eq!(time_limit_for_difficulty(Some(Difficulty::Easy)), 300);
/// assert_eq!(time_limit_for_difficulty(Difficulty::lenient("unknown")), 600);
/// ```
pub fn time_limit_for_difficulty(difficulty: Option<Difficulty>) -> u32 {
    match difficulty {
        Some(Difficulty::Easy) => EASY_TIME_LIMIT_SEC,
        Some(Difficulty::Medium) | None => MEDIUM_TIME_LIMIT_SEC,
        Some(Difficulty::Hard) => HARD_TIME_LIMIT_SEC,
    }
}

/// Square grid dimensions used at play time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: u8,
    pub cols: u8,
}

impl GridSize {
    const fn square(side: u8) -> Self {
        Self {
            rows: side,
            cols: side,
        }
    }
}

/// Grid used when playing at `difficulty`, ignoring any author-declared
/// rows/cols.
///
/// # Examples
/// ```
/// use games_backend::domain::{Difficulty, grid_size_for_difficulty};
///
/// let grid = grid_size_for_difficulty(Some(Difficulty::Hard));
/// assert_eq!((grid.rows, grid.cols), (5, 5));
/// assert_eq!(grid_size_for_difficulty(None).rows, 3);
/// ```
pub fn grid_size_for_difficulty(difficulty: Option<Difficulty>) -> GridSize {
    match difficulty {
        Some(Difficulty::Easy) | None => GridSize::square(3),
        Some(Difficulty::Medium) => GridSize::square(4),
        Some(Difficulty::Hard) => GridSize::square(5),
    }
}

/// Author-supplied puzzle settings before derived fields are filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleConfigDraft {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub images: Vec<String>,
    pub thumbnail: Option<String>,
    pub rows: u8,
    pub cols: u8,
    pub difficulty: Difficulty,
}

/// Decoded puzzle configuration.
///
/// ## Invariants
/// - `time_limit_sec` is always [`time_limit_for_difficulty`] of
///   `difficulty`.
/// - `thumbnail` equals `image_url` unless a thumbnail was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleConfig {
    title: String,
    description: Option<String>,
    image_url: String,
    images: Vec<String>,
    thumbnail: String,
    rows: u8,
    cols: u8,
    difficulty: Difficulty,
}

impl PuzzleConfig {
    /// Build a configuration, defaulting the thumbnail to the primary image.
    pub fn new(draft: PuzzleConfigDraft) -> Self {
        let PuzzleConfigDraft {
            title,
            description,
            image_url,
            images,
            thumbnail,
            rows,
            cols,
            difficulty,
        } = draft;
        let thumbnail = thumbnail.unwrap_or_else(|| image_url.clone());
        Self {
            title,
            description,
            image_url,
            images,
            thumbnail,
            rows,
            cols,
            difficulty,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Primary puzzle image.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Secondary images uploaded alongside the primary one.
    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn thumbnail(&self) -> &str {
        &self.thumbnail
    }

    /// Author-declared grid, used for catalogue display only.
    pub fn grid(&self) -> GridSize {
        GridSize {
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn time_limit_sec(&self) -> u32 {
        time_limit_for_difficulty(Some(self.difficulty))
    }

    /// Every distinct asset path the configuration references.
    pub fn image_paths(&self) -> BTreeSet<String> {
        std::iter::once(&self.image_url)
            .chain(self.images.iter())
            .chain(std::iter::once(&self.thumbnail))
            .filter(|path| !path.is_empty())
            .cloned()
            .collect()
    }

    /// Convert back into a draft for editing.
    pub fn into_draft(self) -> PuzzleConfigDraft {
        PuzzleConfigDraft {
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            images: self.images,
            thumbnail: Some(self.thumbnail),
            rows: self.rows,
            cols: self.cols,
            difficulty: self.difficulty,
        }
    }
}

/// Errors raised while decoding a stored puzzle blob.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleConfigDecodeError {
    /// A required field is absent.
    #[error("puzzle configuration is missing `{field}`")]
    MissingField { field: &'static str },
    /// A field is present but has the wrong shape.
    #[error("puzzle configuration is malformed: {message}")]
    Malformed { message: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PuzzleBlobIn {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    images: Option<Vec<String>>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    rows: Option<u8>,
    #[serde(default)]
    cols: Option<u8>,
    #[serde(default)]
    difficulty: Option<String>,
}

/// Decode a stored blob into a [`PuzzleConfig`].
///
/// `imageUrl`, `rows` and `cols` are required. A stored `timeLimitSec` is
/// ignored and recomputed from the difficulty; unknown difficulties decode
/// as medium.
///
/// # Examples
/// ```
/// use games_backend::domain::{Difficulty, decode_puzzle_config};
/// use serde_json::json;
///
/// let config = decode_puzzle_config(&json!({
///     "title": "Harbour",
///     "imageUrl": "puzzle/1/harbour.png",
///     "rows": 4,
///     "cols": 3,
///     "difficulty": "hard",
///     "timeLimitSec": 1
/// }))
/// .expect("valid blob");
/// assert_eq!(config.difficulty(), Difficulty::Hard);
/// assert_eq!(config.time_limit_sec(), 900);
/// assert_eq!(config.thumbnail(), "puzzle/1/harbour.png");
/// ```
pub fn decode_puzzle_config(blob: &Value) -> Result<PuzzleConfig, PuzzleConfigDecodeError> {
    let raw = PuzzleBlobIn::deserialize(blob).map_err(|err| PuzzleConfigDecodeError::Malformed {
        message: err.to_string(),
    })?;

    let image_url = raw
        .image_url
        .filter(|url| !url.trim().is_empty())
        .ok_or(PuzzleConfigDecodeError::MissingField { field: "imageUrl" })?;
    let rows = raw
        .rows
        .ok_or(PuzzleConfigDecodeError::MissingField { field: "rows" })?;
    let cols = raw
        .cols
        .ok_or(PuzzleConfigDecodeError::MissingField { field: "cols" })?;
    if rows == 0 || cols == 0 {
        return Err(PuzzleConfigDecodeError::Malformed {
            message: "rows and cols must be positive".to_owned(),
        });
    }

    let difficulty = raw
        .difficulty
        .as_deref()
        .and_then(Difficulty::lenient)
        .unwrap_or(Difficulty::Medium);

    Ok(PuzzleConfig::new(PuzzleConfigDraft {
        title: raw.title.unwrap_or_default(),
        description: raw.description,
        image_url,
        images: raw.images.unwrap_or_default(),
        thumbnail: raw.thumbnail.filter(|thumb| !thumb.trim().is_empty()),
        rows,
        cols,
        difficulty,
    }))
}

/// Encode a configuration into its stored blob form.
pub fn encode_puzzle_config(config: &PuzzleConfig) -> Value {
    let mut blob = Map::new();
    blob.insert("title".to_owned(), json!(config.title));
    if let Some(description) = &config.description {
        blob.insert("description".to_owned(), json!(description));
    }
    blob.insert("imageUrl".to_owned(), json!(config.image_url));
    if !config.images.is_empty() {
        blob.insert("images".to_owned(), json!(config.images));
    }
    blob.insert("thumbnail".to_owned(), json!(config.thumbnail));
    blob.insert("rows".to_owned(), json!(config.rows));
    blob.insert("cols".to_owned(), json!(config.cols));
    blob.insert("difficulty".to_owned(), json!(config.difficulty.as_str()));
    blob.insert("timeLimitSec".to_owned(), json!(config.time_limit_sec()));
    Value::Object(blob)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
