use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    application::{error::HttpError, products::DEFAULT_BEST_SELLER_LIMIT, products::OrderRequest},
    domain::entities::SiteRecord,
};

use super::{HttpState, catalog_error_to_http, db_health_response};

pub(super) fn routes() -> Router<HttpState> {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/site", get(site))
        .route("/api/seo", get(seo))
        .route("/api/categories", get(categories))
        .route("/api/categories/{slug}", get(category_detail))
        .route("/api/products", get(products))
        .route("/api/products/best-sellers", get(best_sellers))
        .route("/api/products/{slug}", get(product_detail))
        .route("/api/products/{slug}/order-link", get(order_link))
        .route("/api/faqs", get(faqs))
        .route("/api/testimonials", get(testimonials))
        .route("/_health/db", get(public_health))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductQuery {
    q: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BestSellerQuery {
    limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrderLinkQuery {
    qty: Option<u32>,
    variant: Option<String>,
    note: Option<String>,
}

#[derive(Serialize)]
struct PingBody {
    message: &'static str,
    site: SiteRecord,
}

#[derive(Serialize)]
struct OrderLinkBody {
    url: String,
}

async fn ping(State(state): State<HttpState>) -> Response {
    match state.site.get_site().await {
        Ok(site) => Json(PingBody {
            message: "Pong",
            site,
        })
        .into_response(),
        Err(err) => catalog_error_to_http("infra::http::public::ping", err).into_response(),
    }
}

async fn site(State(state): State<HttpState>) -> Response {
    match state.site.get_site().await {
        Ok(site) => Json(site).into_response(),
        Err(err) => catalog_error_to_http("infra::http::public::site", err).into_response(),
    }
}

async fn seo(State(state): State<HttpState>) -> Response {
    match state.site.seo_config().await {
        Ok(seo) => Json(seo).into_response(),
        Err(err) => catalog_error_to_http("infra::http::public::seo", err).into_response(),
    }
}

async fn categories(State(state): State<HttpState>) -> Response {
    match state.categories.get_all().await {
        Ok(categories) => Json(categories).into_response(),
        Err(err) => catalog_error_to_http("infra::http::public::categories", err).into_response(),
    }
}

async fn category_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    const SOURCE: &str = "infra::http::public::category_detail";
    match state.categories.get_by_slug(&slug).await {
        Ok(Some(category)) => Json(category).into_response(),
        Ok(None) => not_found(SOURCE, format!("category `{slug}` does not exist")),
        Err(err) => catalog_error_to_http(SOURCE, err).into_response(),
    }
}

/// `?q=` searches; `?category=` narrows by category slug and is ignored when unknown.
async fn products(State(state): State<HttpState>, Query(query): Query<ProductQuery>) -> Response {
    const SOURCE: &str = "infra::http::public::products";

    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let mut products = match search {
        Some(q) => state.products.search(q).await,
        None => state.products.get_all().await,
    };

    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|slug| !slug.is_empty());
    if let (Ok(list), Some(slug)) = (products.as_mut(), category) {
        match state.categories.get_by_slug(slug).await {
            Ok(Some(category)) => list.retain(|product| product.category_id == category.id),
            Ok(None) => {}
            Err(err) => return catalog_error_to_http(SOURCE, err).into_response(),
        }
    }

    match products {
        Ok(products) => Json(products).into_response(),
        Err(err) => catalog_error_to_http(SOURCE, err).into_response(),
    }
}

async fn best_sellers(
    State(state): State<HttpState>,
    Query(query): Query<BestSellerQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(DEFAULT_BEST_SELLER_LIMIT);
    match state.products.best_sellers(limit).await {
        Ok(products) => Json(products).into_response(),
        Err(err) => {
            catalog_error_to_http("infra::http::public::best_sellers", err).into_response()
        }
    }
}

async fn product_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    const SOURCE: &str = "infra::http::public::product_detail";
    match state.products.get_by_slug(&slug).await {
        Ok(Some(product)) => Json(product).into_response(),
        Ok(None) => not_found(SOURCE, format!("product `{slug}` does not exist")),
        Err(err) => catalog_error_to_http(SOURCE, err).into_response(),
    }
}

async fn order_link(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
    Query(query): Query<OrderLinkQuery>,
) -> Response {
    const SOURCE: &str = "infra::http::public::order_link";

    let site = match state.site.get_site().await {
        Ok(site) => site,
        Err(err) => return catalog_error_to_http(SOURCE, err).into_response(),
    };
    let request = OrderRequest {
        quantity: query.qty,
        variant: query.variant,
        note: query.note,
    };

    match state
        .products
        .order_link(&slug, &site.whatsapp, &request)
        .await
    {
        Ok(Some(url)) => Json(OrderLinkBody { url }).into_response(),
        Ok(None) => not_found(SOURCE, format!("product `{slug}` does not exist")),
        Err(err) => catalog_error_to_http(SOURCE, err).into_response(),
    }
}

async fn faqs(State(state): State<HttpState>) -> Response {
    match state.faqs.get_all().await {
        Ok(faqs) => Json(faqs).into_response(),
        Err(err) => catalog_error_to_http("infra::http::public::faqs", err).into_response(),
    }
}

async fn testimonials(State(state): State<HttpState>) -> Response {
    match state.testimonials.get_all().await {
        Ok(testimonials) => Json(testimonials).into_response(),
        Err(err) => {
            catalog_error_to_http("infra::http::public::testimonials", err).into_response()
        }
    }
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.ping().await)
}

fn not_found(source: &'static str, detail: String) -> Response {
    HttpError::new(source, StatusCode::NOT_FOUND, "Resource not found", detail).into_response()
}
