//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::types::{Currency, TestimonialSource};

/// Primary key of the singleton site row.
pub const SITE_ID: i32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteRecord {
    pub id: i32,
    pub name: String,
    pub domain: String,
    pub locale: String,
    pub whatsapp: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub hours: Option<String>,
    pub logo_light: String,
    pub logo_dark: String,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub facebook: Option<String>,
    pub default_title: String,
    pub default_description: String,
    pub keywords: Vec<String>,
    pub og_image: String,
    pub twitter_handle: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl SiteRecord {
    /// Read-time stand-in used until the site row has been written.
    pub fn fallback(now: OffsetDateTime) -> Self {
        Self {
            id: SITE_ID,
            name: "Maher Snack & Cookies".to_string(),
            domain: "https://maherbites.id".to_string(),
            locale: "id-ID".to_string(),
            whatsapp: "https://wa.me/6281234567890".to_string(),
            email: "hello@maherbites.id".to_string(),
            phone: "+62 812-3456-7890".to_string(),
            address: "Jl. Contoh No. 12, Jakarta Selatan".to_string(),
            hours: Some("Senin–Sabtu 09.00–18.00 WIB".to_string()),
            logo_light: "/images/brand/logo-light.svg".to_string(),
            logo_dark: "/images/brand/logo-dark.svg".to_string(),
            instagram: Some("https://instagram.com/maherbites".to_string()),
            tiktok: Some("https://tiktok.com/@maherbites".to_string()),
            facebook: Some("https://facebook.com/maherbites".to_string()),
            default_title: "Maher Snack & Cookies".to_string(),
            default_description: "Maher Snack & Cookies".to_string(),
            keywords: [
                "maher snack & cookies",
                "cookies",
                "kue kering",
                "snack box",
                "hampers",
                "kue kering premium",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            og_image: "https://maherbites.id/og/default.png".to_string(),
            twitter_handle: Some("@maherbites".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn seo_config(&self) -> SeoConfig {
        SeoConfig {
            default_title: self.default_title.clone(),
            default_description: self.default_description.clone(),
            keywords: self.keywords.clone(),
            og_image: self.og_image.clone(),
            twitter_handle: self.twitter_handle.clone(),
            site_url: self.domain.clone(),
        }
    }
}

/// Search-engine defaults derived from the site record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoConfig {
    pub default_title: String,
    pub default_description: String,
    pub keywords: Vec<String>,
    pub og_image: String,
    pub twitter_handle: Option<String>,
    pub site_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductImage {
    pub src: String,
    pub alt: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantOption {
    pub id: i64,
    pub label: String,
    pub value: Option<String>,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductVariant {
    pub id: i64,
    pub name: String,
    pub options: Vec<VariantOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub id: String,
    pub slug: String,
    pub sku: Option<String>,
    pub name: String,
    /// Whole currency units; rupiah has no minor unit in practice.
    pub price: i64,
    pub currency: Currency,
    pub category_id: String,
    pub tags: Vec<String>,
    pub short_desc: String,
    pub long_desc: String,
    pub rating: Option<f64>,
    pub weight_gram: Option<i32>,
    pub ingredients: Vec<String>,
    pub allergens: Vec<String>,
    pub shelf_life_days: Option<i32>,
    pub storage: Option<String>,
    pub best_seller: bool,
    pub images: Vec<ProductImage>,
    pub variants: Vec<ProductVariant>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ProductRecord {
    /// Find a variant option by its display label across all variants.
    pub fn find_option(&self, label: &str) -> Option<&VariantOption> {
        self.variants
            .iter()
            .flat_map(|variant| variant.options.iter())
            .find(|option| option.label == label)
    }

    pub fn matches_query(&self, normalized_query: &str) -> bool {
        self.name.to_lowercase().contains(normalized_query)
            || self.short_desc.to_lowercase().contains(normalized_query)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(normalized_query))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqRecord {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub sort_order: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestimonialRecord {
    pub id: i32,
    pub name: String,
    pub handle: Option<String>,
    pub message: String,
    pub rating: i16,
    pub source: Option<TestimonialSource>,
    pub sort_order: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
