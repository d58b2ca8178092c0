//! Caller identity primitives.
//!
//! The surrounding request layer authenticates callers; the domain only sees
//! the resulting identity. Players may be anonymous, while catalogue
//! mutations always come from an identified [`Actor`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by identity constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("unknown user role: {0}")]
    UnknownRole(String),
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self::from_uuid(parsed))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Platform role attached to an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    User,
}

impl UserRole {
    /// Whether the role may edit any puzzle regardless of who created it.
    pub fn is_editor(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }

    /// Wire representation used in session cookies.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Authenticated caller performing a catalogue operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Actor {
    /// Build an actor from its identity and role.
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Whether this actor may mutate a record created by `creator_id`.
    ///
    /// # Examples
    /// ```
    /// use games_backend::domain::{Actor, UserId, UserRole};
    ///
    /// let creator = UserId::random();
    /// let author = Actor::new(creator.clone(), UserRole::User);
    /// let stranger = Actor::new(UserId::random(), UserRole::User);
    /// let admin = Actor::new(UserId::random(), UserRole::Admin);
    ///
    /// assert!(author.may_edit(&creator));
    /// assert!(!stranger.may_edit(&creator));
    /// assert!(admin.may_edit(&creator));
    /// ```
    pub fn may_edit(&self, creator_id: &UserId) -> bool {
        self.role.is_editor() || &self.user_id == creator_id
    }
}

/// Identity of a puzzle player.
///
/// Anonymous players may start and finish sessions but never appear on a
/// leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Player {
    Identified(UserId),
    Anonymous,
}

impl Player {
    /// Identifier of an identified player.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Identified(user_id) => Some(user_id),
            Self::Anonymous => None,
        }
    }
}

impl From<Option<UserId>> for Player {
    fn from(value: Option<UserId>) -> Self {
        value.map_or(Self::Anonymous, Self::Identified)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identified(user_id) => user_id.fmt(f),
            Self::Anonymous => f.write_str("anonymous"),
        }
    }
}
