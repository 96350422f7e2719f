use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{application::error::AppError, domain::order::encode_uri_component};

use super::{
    HttpState,
    session::{LOGIN_PATH, current_session, expired_session_cookie, session_cookie},
};

const DASHBOARD_PATH: &str = "/dashboard";
const INVALID_CREDENTIALS_MESSAGE: &str = "Email atau password salah.";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct LoginForm {
    email: Option<String>,
    password: Option<String>,
    redirect_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct LoginQuery {
    error: Option<String>,
    redirect: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginView {
    error: Option<&'static str>,
    redirect: Option<String>,
}

/// Already signed-in visitors skip straight to the dashboard.
pub(super) async fn login_page(
    State(state): State<HttpState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> Response {
    match current_session(&state, &jar) {
        Ok(Some(_)) => return Redirect::to(DASHBOARD_PATH).into_response(),
        Ok(None) => {}
        Err(err) => return err.into_response(),
    }

    let error = (query.error.as_deref() == Some("invalid")).then_some(INVALID_CREDENTIALS_MESSAGE);
    Json(LoginView {
        error,
        redirect: dashboard_target(query.redirect.as_deref()),
    })
    .into_response()
}

pub(super) async fn login(
    State(state): State<HttpState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.as_deref().map(str::trim).unwrap_or_default();
    let password = form.password.as_deref().map(str::trim).unwrap_or_default();
    let target = dashboard_target(form.redirect_to.as_deref());

    let valid = match state.sessions.validate_credentials(email, password) {
        Ok(valid) => valid,
        Err(err) => return AppError::from(err).into_response(),
    };

    if !valid {
        warn!(
            target = "maherbites::http::auth",
            "Rejected dashboard login attempt"
        );
        let location = match target {
            Some(target) => format!(
                "{LOGIN_PATH}?error=invalid&redirect={}",
                encode_uri_component(&target)
            ),
            None => format!("{LOGIN_PATH}?error=invalid"),
        };
        return Redirect::to(&location).into_response();
    }

    let token = match state.sessions.issue(email) {
        Ok(token) => token,
        Err(err) => return AppError::from(err).into_response(),
    };

    info!(target = "maherbites::http::auth", "Dashboard session issued");
    let jar = jar.add(session_cookie(token, state.secure_cookies));
    let location = target.unwrap_or_else(|| DASHBOARD_PATH.to_string());
    (jar, Redirect::to(&location)).into_response()
}

pub(super) async fn logout(jar: CookieJar) -> Response {
    let jar = jar.add(expired_session_cookie());
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}

/// Only dashboard paths are honoured as post-login destinations.
pub(super) fn dashboard_target(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|target| target.starts_with(DASHBOARD_PATH))
        .map(str::to_string)
}
