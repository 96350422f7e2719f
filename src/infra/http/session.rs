use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::application::{
    auth::{SESSION_COOKIE_NAME, SESSION_TTL, SessionClaims},
    error::AppError,
};

use super::HttpState;

pub(super) const LOGIN_PATH: &str = "/login";

/// Admit requests carrying a valid session cookie; everyone else goes to the login page.
pub(super) async fn require_session(
    State(state): State<HttpState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match current_session(&state, &jar) {
        Ok(Some(claims)) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Ok(None) => Redirect::to(LOGIN_PATH).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Claims of the session cookie, if one is present and verifies.
pub(super) fn current_session(
    state: &HttpState,
    jar: &CookieJar,
) -> Result<Option<SessionClaims>, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
        return Ok(None);
    };
    Ok(state.sessions.verify(cookie.value())?)
}

pub(super) fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(SESSION_TTL)
        .path("/")
        .build()
}

pub(super) fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}
