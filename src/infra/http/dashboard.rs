use axum::{
    Extension, Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    application::{
        auth::SessionClaims,
        dashboard::DashboardSummary,
        error::{CatalogError, ErrorReport},
        faqs::FaqCommand,
        products::ProductCommand,
        repos::SeedReport,
        testimonials::TestimonialCommand,
    },
    domain::order::encode_uri_component,
};

use super::{
    HttpState,
    auth::dashboard_target,
    catalog_error_to_http,
    forms::{CategoryForm, DeleteForm, FaqForm, ProductForm, SiteForm, TestimonialForm},
};

const SITE_PATH: &str = "/dashboard/site";
const CATEGORIES_PATH: &str = "/dashboard/categories";
const PRODUCTS_PATH: &str = "/dashboard/products";
const FAQS_PATH: &str = "/dashboard/faqs";
const TESTIMONIALS_PATH: &str = "/dashboard/testimonials";

const STATUS_SUCCESS: &str = "success";
const STATUS_DELETED: &str = "deleted";
const STATUS_ERROR: &str = "error";

#[derive(Serialize)]
struct SummaryBody {
    email: String,
    summary: DashboardSummary,
}

#[derive(Serialize)]
struct SeedFailureBody {
    message: &'static str,
    error: String,
}

#[derive(Serialize)]
struct SeedBody {
    message: &'static str,
    results: SeedReport,
}

pub(super) async fn summary(
    State(state): State<HttpState>,
    Extension(claims): Extension<SessionClaims>,
) -> Response {
    match state.dashboard.summary().await {
        Ok(summary) => Json(SummaryBody {
            email: claims.email,
            summary,
        })
        .into_response(),
        Err(err) => catalog_error_to_http("infra::http::dashboard::summary", err).into_response(),
    }
}

pub(super) async fn upsert_site(State(state): State<HttpState>, Form(form): Form<SiteForm>) -> Response {
    let outcome = state.site.upsert(form.into()).await.map(|_| ());
    redirect_with_status("infra::http::dashboard::upsert_site", SITE_PATH, STATUS_SUCCESS, outcome)
}

pub(super) async fn upsert_category(
    State(state): State<HttpState>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let outcome = state.categories.upsert(form.into()).await.map(|_| ());
    redirect_with_status(
        "infra::http::dashboard::upsert_category",
        CATEGORIES_PATH,
        STATUS_SUCCESS,
        outcome,
    )
}

pub(super) async fn delete_category(
    State(state): State<HttpState>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let outcome = match form.key() {
        Some(id) => state.categories.delete(id).await,
        None => Err(CatalogError::validation("id", "must not be empty")),
    };
    redirect_with_status(
        "infra::http::dashboard::delete_category",
        CATEGORIES_PATH,
        STATUS_DELETED,
        outcome,
    )
}

/// Redirects back to the product editor; `redirectTo` may carry an `{id}` placeholder.
pub(super) async fn upsert_product(
    State(state): State<HttpState>,
    Form(form): Form<ProductForm>,
) -> Response {
    const SOURCE: &str = "infra::http::dashboard::upsert_product";

    let id = form
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    let Some(id) = id else {
        // An unfilled `{id}` template has nowhere to point; use the list.
        let path = dashboard_target(form.redirect_to.as_deref())
            .filter(|template| !template.contains("{id}"))
            .unwrap_or_else(|| PRODUCTS_PATH.to_string());
        return redirect_with_status(
            SOURCE,
            &path,
            STATUS_SUCCESS,
            Err(CatalogError::validation("id", "must not be empty")),
        );
    };

    let target = match dashboard_target(form.redirect_to.as_deref()) {
        Some(template) => template.replace("{id}", &id),
        None => format!("{PRODUCTS_PATH}/{id}"),
    };

    let outcome = match ProductCommand::try_from(form) {
        Ok(command) => state.products.upsert(command).await.map(|_| ()),
        Err(err) => Err(err),
    };
    let status = status_for(SOURCE, STATUS_SUCCESS, outcome);
    Redirect::to(&format!(
        "{target}?status={status}&id={}",
        encode_uri_component(&id)
    ))
    .into_response()
}

pub(super) async fn delete_product(
    State(state): State<HttpState>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let path = dashboard_target(form.redirect_to.as_deref())
        .unwrap_or_else(|| PRODUCTS_PATH.to_string());
    let outcome = match form.key() {
        Some(id) => state.products.delete(id).await,
        None => Err(CatalogError::validation("id", "must not be empty")),
    };
    redirect_with_status(
        "infra::http::dashboard::delete_product",
        &path,
        STATUS_DELETED,
        outcome,
    )
}

pub(super) async fn upsert_faq(State(state): State<HttpState>, Form(form): Form<FaqForm>) -> Response {
    let outcome = match FaqCommand::try_from(form) {
        Ok(command) => state.faqs.upsert(command).await.map(|_| ()),
        Err(err) => Err(err),
    };
    redirect_with_status("infra::http::dashboard::upsert_faq", FAQS_PATH, STATUS_SUCCESS, outcome)
}

pub(super) async fn delete_faq(State(state): State<HttpState>, Form(form): Form<DeleteForm>) -> Response {
    let outcome = match form.numeric_key() {
        Ok(id) => state.faqs.delete(id).await,
        Err(err) => Err(err),
    };
    redirect_with_status("infra::http::dashboard::delete_faq", FAQS_PATH, STATUS_DELETED, outcome)
}

pub(super) async fn upsert_testimonial(
    State(state): State<HttpState>,
    Form(form): Form<TestimonialForm>,
) -> Response {
    let outcome = match TestimonialCommand::try_from(form) {
        Ok(command) => state.testimonials.upsert(command).await.map(|_| ()),
        Err(err) => Err(err),
    };
    redirect_with_status(
        "infra::http::dashboard::upsert_testimonial",
        TESTIMONIALS_PATH,
        STATUS_SUCCESS,
        outcome,
    )
}

pub(super) async fn delete_testimonial(
    State(state): State<HttpState>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let outcome = match form.numeric_key() {
        Ok(id) => state.testimonials.delete(id).await,
        Err(err) => Err(err),
    };
    redirect_with_status(
        "infra::http::dashboard::delete_testimonial",
        TESTIMONIALS_PATH,
        STATUS_DELETED,
        outcome,
    )
}

pub(super) async fn seed(State(state): State<HttpState>) -> Response {
    match state.seed.run().await {
        Ok(results) => {
            info!(
                target = "maherbites::http::dashboard",
                products_created = results.products_created,
                "Seed triggered from dashboard"
            );
            Json(SeedBody {
                message: "Seeder executed successfully",
                results,
            })
            .into_response()
        }
        Err(err) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            let report = ErrorReport::from_error("infra::http::dashboard::seed", status, &err);
            let mut response = (
                status,
                Json(SeedFailureBody {
                    message: "Seeder execution failed",
                    error: err.to_string(),
                }),
            )
                .into_response();
            report.attach(&mut response);
            response
        }
    }
}

fn redirect_with_status(
    source: &'static str,
    path: &str,
    success: &'static str,
    outcome: Result<(), CatalogError>,
) -> Response {
    let status = status_for(source, success, outcome);
    Redirect::to(&format!("{path}?status={status}")).into_response()
}

/// Failures are logged here since the redirect itself is not an error response.
fn status_for(
    source: &'static str,
    success: &'static str,
    outcome: Result<(), CatalogError>,
) -> &'static str {
    match outcome {
        Ok(()) => success,
        Err(CatalogError::Validation(err)) => {
            warn!(
                target = "maherbites::http::dashboard",
                source,
                error = %err,
                "Rejected dashboard submission"
            );
            STATUS_ERROR
        }
        Err(CatalogError::Repo(err)) => {
            error!(
                target = "maherbites::http::dashboard",
                source,
                error = %err,
                "Dashboard write failed"
            );
            STATUS_ERROR
        }
    }
}
