//! Dashboard form payloads and their conversion into service commands.
//!
//! Every field arrives as optional text so malformed submissions end in a
//! `?status=error` redirect instead of an extractor rejection.

use std::str::FromStr;

use serde::{Deserialize, de::DeserializeOwned};
use tracing::error;

use crate::{
    application::{
        categories::CategoryCommand,
        error::CatalogError,
        faqs::FaqCommand,
        products::ProductCommand,
        repos::{NewProductImage, NewVariant},
        site::SiteCommand,
        testimonials::TestimonialCommand,
    },
    domain::types::{Currency, TestimonialSource},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct SiteForm {
    name: Option<String>,
    domain: Option<String>,
    locale: Option<String>,
    whatsapp: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    hours: Option<String>,
    logo_light: Option<String>,
    logo_dark: Option<String>,
    instagram: Option<String>,
    tiktok: Option<String>,
    facebook: Option<String>,
    default_title: Option<String>,
    default_description: Option<String>,
    keywords: Option<String>,
    og_image: Option<String>,
    twitter_handle: Option<String>,
}

impl From<SiteForm> for SiteCommand {
    fn from(form: SiteForm) -> Self {
        Self {
            name: text(form.name),
            domain: text(form.domain),
            locale: form.locale,
            whatsapp: text(form.whatsapp),
            email: text(form.email),
            phone: text(form.phone),
            address: text(form.address),
            hours: form.hours,
            logo_light: text(form.logo_light),
            logo_dark: text(form.logo_dark),
            instagram: form.instagram,
            tiktok: form.tiktok,
            facebook: form.facebook,
            default_title: text(form.default_title),
            default_description: text(form.default_description),
            keywords: split_list(form.keywords.as_deref()),
            og_image: text(form.og_image),
            twitter_handle: form.twitter_handle,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct CategoryForm {
    id: Option<String>,
    slug: Option<String>,
    name: Option<String>,
    description: Option<String>,
}

impl From<CategoryForm> for CategoryCommand {
    fn from(form: CategoryForm) -> Self {
        Self {
            id: text(form.id),
            slug: text(form.slug),
            name: text(form.name),
            description: form.description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct ProductForm {
    pub(super) id: Option<String>,
    pub(super) redirect_to: Option<String>,
    slug: Option<String>,
    sku: Option<String>,
    name: Option<String>,
    price: Option<String>,
    currency: Option<String>,
    category_id: Option<String>,
    tags: Option<String>,
    short_desc: Option<String>,
    long_desc: Option<String>,
    rating: Option<String>,
    weight_gram: Option<String>,
    ingredients: Option<String>,
    allergens: Option<String>,
    shelf_life_days: Option<String>,
    storage: Option<String>,
    best_seller: Option<String>,
    images: Option<String>,
    variants: Option<String>,
}

impl TryFrom<ProductForm> for ProductCommand {
    type Error = CatalogError;

    fn try_from(form: ProductForm) -> Result<Self, Self::Error> {
        let currency = match form.currency.as_deref().map(str::trim) {
            None | Some("") => Currency::default(),
            Some(code) => Currency::from_str(code)
                .map_err(|err| CatalogError::validation("currency", err.to_string()))?,
        };
        let price = match form.price.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| CatalogError::validation("price", format!("`{raw}` is not a whole number")))?,
        };

        Ok(Self {
            id: text(form.id),
            slug: form.slug,
            sku: form.sku.filter(|sku| !sku.trim().is_empty()),
            name: text(form.name),
            price,
            currency,
            category_id: text(form.category_id),
            tags: split_list(form.tags.as_deref()),
            short_desc: text(form.short_desc),
            long_desc: text(form.long_desc),
            rating: parse_number(form.rating.as_deref()),
            weight_gram: parse_number(form.weight_gram.as_deref()),
            ingredients: split_list(form.ingredients.as_deref()),
            allergens: split_list(form.allergens.as_deref()),
            shelf_life_days: parse_number(form.shelf_life_days.as_deref()),
            storage: form.storage.filter(|storage| !storage.trim().is_empty()),
            best_seller: parse_checkbox_flag(form.best_seller.as_deref()),
            images: parse_json_list::<NewProductImage>("images", form.images.as_deref()),
            variants: parse_json_list::<NewVariant>("variants", form.variants.as_deref()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct FaqForm {
    id: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    sort_order: Option<String>,
}

impl TryFrom<FaqForm> for FaqCommand {
    type Error = CatalogError;

    fn try_from(form: FaqForm) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(form.id.as_deref())?,
            question: text(form.question),
            answer: text(form.answer),
            sort_order: parse_number(form.sort_order.as_deref()).unwrap_or(0),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct TestimonialForm {
    id: Option<String>,
    name: Option<String>,
    handle: Option<String>,
    message: Option<String>,
    rating: Option<String>,
    source: Option<String>,
    sort_order: Option<String>,
}

impl TryFrom<TestimonialForm> for TestimonialCommand {
    type Error = CatalogError;

    fn try_from(form: TestimonialForm) -> Result<Self, Self::Error> {
        let rating = parse_number::<i16>(form.rating.as_deref())
            .ok_or_else(|| CatalogError::validation("rating", "must be a whole number"))?;
        let source = match form.source.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                TestimonialSource::from_str(raw)
                    .map_err(|err| CatalogError::validation("source", err.to_string()))?,
            ),
        };

        Ok(Self {
            id: parse_id(form.id.as_deref())?,
            name: text(form.name),
            handle: form.handle,
            message: text(form.message),
            rating,
            source,
            sort_order: parse_number(form.sort_order.as_deref()).unwrap_or(0),
        })
    }
}

/// Delete forms carry only the row key.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct DeleteForm {
    pub(super) id: Option<String>,
    pub(super) redirect_to: Option<String>,
}

impl DeleteForm {
    pub(super) fn key(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    pub(super) fn numeric_key(&self) -> Result<i32, CatalogError> {
        parse_id(self.key())?.ok_or_else(|| CatalogError::validation("id", "must not be empty"))
    }
}

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn parse_number<T: FromStr>(value: Option<&str>) -> Option<T> {
    value.map(str::trim).and_then(|raw| raw.parse().ok())
}

fn parse_id(value: Option<&str>) -> Result<Option<i32>, CatalogError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| CatalogError::validation("id", format!("`{raw}` is not a numeric id"))),
    }
}

/// Comma-separated input, trimmed, empties dropped.
pub(super) fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub(super) fn parse_checkbox_flag(input: Option<&str>) -> bool {
    matches!(input, Some("on") | Some("true"))
}

/// JSON array fields fall back to an empty list when they do not parse.
pub(super) fn parse_json_list<T: DeserializeOwned>(field: &'static str, value: Option<&str>) -> Vec<T> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Option<Vec<T>>>(raw) {
        Ok(items) => items.unwrap_or_default(),
        Err(err) => {
            error!(
                target = "maherbites::http::forms",
                field,
                error = %err,
                "Discarding unparsable JSON form field"
            );
            Vec::new()
        }
    }
}
