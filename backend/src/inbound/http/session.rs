//! Caller identity read from the signed session cookie.
//!
//! The platform's auth service writes `user_id` and `user_role` into the
//! cookie; this backend only reads them. Handlers turn the cookie into a
//! [`Player`] for gameplay or an [`Actor`] for catalogue mutations.

use std::str::FromStr;

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Actor, Error, Player, UserId, UserRole};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USER_ROLE_KEY: &str = "user_role";

/// Newtype wrapper exposing identity lookups over the Actix session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    fn read_string(&self, key: &str) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Current user id, if the cookie carries a valid one.
    ///
    /// A malformed id is logged and treated as absent.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let Some(raw) = self.read_string(USER_ID_KEY)? else {
            return Ok(None);
        };
        match UserId::new(raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// Role of the current user. Missing or unknown roles read as `User`.
    pub fn user_role(&self) -> Result<UserRole, Error> {
        let role = self.read_string(USER_ROLE_KEY)?;
        Ok(match role.as_deref().map(UserRole::from_str) {
            Some(Ok(role)) => role,
            Some(Err(error)) => {
                warn!(%error, "unknown role in session cookie");
                UserRole::User
            }
            None => UserRole::User,
        })
    }

    /// Identity for gameplay endpoints; anonymous when nobody is logged in.
    pub fn player(&self) -> Result<Player, Error> {
        Ok(Player::from(self.user_id()?))
    }

    /// Whether the caller may see unpublished puzzles.
    pub fn is_editor(&self) -> Result<bool, Error> {
        Ok(self.user_id()?.is_some() && self.user_role()?.is_editor())
    }

    /// Require a logged-in caller or return `401 Unauthorized`.
    pub fn require_actor(&self) -> Result<Actor, Error> {
        let user_id = self
            .user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))?;
        Ok(Actor::new(user_id, self.user_role()?))
    }

    /// Require an `ADMIN` or `SUPER_ADMIN` caller.
    pub fn require_editor(&self) -> Result<Actor, Error> {
        let actor = self.require_actor()?;
        if actor.role.is_editor() {
            Ok(actor)
        } else {
            Err(Error::forbidden("puzzle management requires an admin role"))
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
