//! Test helpers for inbound HTTP components.

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, post, test, web};
use serde::{Deserialize, Serialize};

use super::session::{USER_ID_KEY, USER_ROLE_KEY};
use crate::domain::{UserId, UserRole};

/// Build a session middleware configured for tests.
///
/// Each call generates a fresh key, names the cookie `session` and drops the
/// `Secure` flag so plain HTTP test requests keep it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestLogin {
    pub user_id: String,
    pub role: String,
}

/// Stand-in for the platform auth service: writes identity into the cookie.
#[post("/test-login")]
pub async fn test_login(session: Session, body: web::Json<TestLogin>) -> HttpResponse {
    let body = body.into_inner();
    let stored = session
        .insert(USER_ID_KEY, body.user_id)
        .and_then(|()| session.insert(USER_ROLE_KEY, body.role));
    match stored {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

/// Log in through [`test_login`] and return the session cookie.
pub async fn login_cookie<S>(app: &S, user_id: &UserId, role: UserRole) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/test-login")
        .set_json(TestLogin {
            user_id: user_id.to_string(),
            role: role.as_str().to_owned(),
        })
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_success(), "test login failed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
