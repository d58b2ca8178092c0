//! Input constraints for puzzle catalogue mutations.

use serde_json::json;

use crate::domain::{Error, MAX_IMAGE_BYTES, UploadFile};

pub const MAX_NAME_CHARS: usize = 128;
pub const MAX_DESCRIPTION_CHARS: usize = 256;
pub const MIN_GRID_SIDE: u8 = 2;
pub const MAX_GRID_SIDE: u8 = 10;
/// Grid side used on create when rows or cols are omitted.
pub const DEFAULT_GRID_SIDE: u8 = 3;
pub const MAX_PUZZLE_IMAGES: usize = 5;

/// Reasons a catalogue mutation input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("{field} must be between {min} and {max}, got {value}")]
    GridOutOfRange {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },
    #[error("between 1 and {max} puzzle images are required, got {actual}")]
    ImageCount { max: usize, actual: usize },
    #[error("a thumbnail image is required")]
    MissingThumbnail,
    #[error("{field} must not be empty")]
    EmptyFile { field: &'static str },
    #[error("{field} exceeds the {max} byte limit")]
    FileTooLarge { field: &'static str, max: usize },
}

impl PuzzleValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::DescriptionTooLong { .. } => "description",
            Self::GridOutOfRange { field, .. }
            | Self::EmptyFile { field }
            | Self::FileTooLarge { field, .. } => field,
            Self::ImageCount { .. } => "puzzleImages",
            Self::MissingThumbnail => "thumbnail",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::MissingThumbnail => "missing_field",
            Self::NameTooLong { .. } | Self::DescriptionTooLong { .. } => "too_long",
            Self::GridOutOfRange { .. } => "out_of_range",
            Self::ImageCount { .. } => "invalid_count",
            Self::EmptyFile { .. } => "empty_file",
            Self::FileTooLarge { .. } => "file_too_large",
        }
    }
}

impl From<PuzzleValidationError> for Error {
    fn from(err: PuzzleValidationError) -> Self {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": err.field(),
            "code": err.code(),
        }))
    }
}

/// Trim a puzzle name and check its length.
///
/// # Examples
/// ```
/// use games_backend::domain::normalize_puzzle_name;
///
/// assert_eq!(normalize_puzzle_name("  Harbour ").as_deref(), Ok("Harbour"));
/// assert!(normalize_puzzle_name("   ").is_err());
/// ```
pub fn normalize_puzzle_name(raw: &str) -> Result<String, PuzzleValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(PuzzleValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(PuzzleValidationError::NameTooLong {
            max: MAX_NAME_CHARS,
        });
    }
    Ok(name.to_owned())
}

/// Trim an optional description; blank input becomes `None`.
pub fn normalize_description(
    raw: Option<&str>,
) -> Result<Option<String>, PuzzleValidationError> {
    let Some(description) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(PuzzleValidationError::DescriptionTooLong {
            max: MAX_DESCRIPTION_CHARS,
        });
    }
    Ok(Some(description.to_owned()))
}

pub fn validate_grid_side(field: &'static str, value: u8) -> Result<u8, PuzzleValidationError> {
    if (MIN_GRID_SIDE..=MAX_GRID_SIDE).contains(&value) {
        Ok(value)
    } else {
        Err(PuzzleValidationError::GridOutOfRange {
            field,
            value,
            min: MIN_GRID_SIDE,
            max: MAX_GRID_SIDE,
        })
    }
}

/// Check a single uploaded image against the size limit.
pub fn validate_image(field: &'static str, file: &UploadFile) -> Result<(), PuzzleValidationError> {
    if file.bytes.is_empty() {
        return Err(PuzzleValidationError::EmptyFile { field });
    }
    if file.size() > MAX_IMAGE_BYTES {
        return Err(PuzzleValidationError::FileTooLarge {
            field,
            max: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// Check the puzzle image set supplied on create, or on update when present.
pub fn validate_puzzle_images(images: &[UploadFile]) -> Result<(), PuzzleValidationError> {
    if images.is_empty() || images.len() > MAX_PUZZLE_IMAGES {
        return Err(PuzzleValidationError::ImageCount {
            max: MAX_PUZZLE_IMAGES,
            actual: images.len(),
        });
    }
    images
        .iter()
        .try_for_each(|image| validate_image("puzzleImages", image))
}
