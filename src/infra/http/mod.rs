mod auth;
mod dashboard;
mod forms;
mod middleware;
mod public;
mod session;
mod state;


pub use state::HttpState;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::application::error::{CatalogError, ErrorReport, HttpError};
use crate::application::repos::RepoError;
use crate::domain::error::DomainError;

use self::middleware::{log_responses, set_request_context};

/// Public JSON reads, login/logout and the session-gated dashboard.
pub fn build_router(state: HttpState) -> Router {
    let dashboard = Router::new()
        .route("/dashboard", get(dashboard::summary))
        .route("/dashboard/site", post(dashboard::upsert_site))
        .route("/dashboard/categories", post(dashboard::upsert_category))
        .route(
            "/dashboard/categories/delete",
            post(dashboard::delete_category),
        )
        .route("/dashboard/products", post(dashboard::upsert_product))
        .route("/dashboard/products/delete", post(dashboard::delete_product))
        .route("/dashboard/faqs", post(dashboard::upsert_faq))
        .route("/dashboard/faqs/delete", post(dashboard::delete_faq))
        .route(
            "/dashboard/testimonials",
            post(dashboard::upsert_testimonial),
        )
        .route(
            "/dashboard/testimonials/delete",
            post(dashboard::delete_testimonial),
        )
        .route("/dashboard/seed", post(dashboard::seed))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session::require_session,
        ));

    Router::new()
        .merge(public::routes())
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout).post(auth::logout))
        .merge(dashboard)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Map a repository error to a consistent HTTP error response.
pub fn repo_error_to_http(source: &'static str, err: RepoError) -> HttpError {
    match err {
        RepoError::Duplicate { constraint } => {
            HttpError::new(source, StatusCode::CONFLICT, "Duplicate record", constraint)
        }
        RepoError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Resource not found",
            "resource not found",
        ),
        RepoError::InvalidInput { message } => {
            HttpError::new(source, StatusCode::BAD_REQUEST, "Invalid input", message)
        }
        RepoError::Integrity { message } => HttpError::new(
            source,
            StatusCode::CONFLICT,
            "Integrity constraint violated",
            message,
        ),
        RepoError::Timeout => HttpError::new(
            source,
            StatusCode::SERVICE_UNAVAILABLE,
            "Database timeout",
            "Database timeout",
        ),
        RepoError::Persistence(message) => HttpError::new(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Persistence error",
            message,
        ),
    }
}

pub fn catalog_error_to_http(source: &'static str, err: CatalogError) -> HttpError {
    match err {
        CatalogError::Repo(err) => repo_error_to_http(source, err),
        CatalogError::Validation(err @ DomainError::Validation { .. }) => {
            HttpError::from_error(source, StatusCode::BAD_REQUEST, "Invalid input", &err)
        }
        CatalogError::Validation(err @ DomainError::NotFound { .. }) => {
            HttpError::from_error(source, StatusCode::NOT_FOUND, "Resource not found", &err)
        }
    }
}
