//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::entities::{
    CategoryRecord, FaqRecord, ProductRecord, SiteRecord, TestimonialRecord,
};
use crate::domain::types::{Currency, TestimonialSource};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpsertSiteParams {
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
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpsertCategoryParams {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProductImage {
    pub src: String,
    pub alt: String,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default, rename = "sortOrder", alias = "sort_order")]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewVariantOption {
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewVariant {
    pub name: String,
    #[serde(default)]
    pub options: Vec<NewVariantOption>,
}

/// Full product state. Images and variants replace whatever is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertProductParams {
    pub id: String,
    pub slug: String,
    pub sku: Option<String>,
    pub name: String,
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
    pub images: Vec<NewProductImage>,
    pub variants: Vec<NewVariant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpsertFaqParams {
    /// Absent or unknown ids create a new row.
    pub id: Option<i32>,
    pub question: String,
    pub answer: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpsertTestimonialParams {
    /// Absent or unknown ids create a new row.
    pub id: Option<i32>,
    pub name: String,
    pub handle: Option<String>,
    pub message: String,
    pub rating: i16,
    pub source: Option<TestimonialSource>,
    pub sort_order: i32,
}

/// Counts of rows created by one seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub site_created: bool,
    pub categories_created: u32,
    pub products_created: u32,
    pub faqs_created: u32,
    pub testimonials_created: u32,
}

#[async_trait]
pub trait SiteRepo: Send + Sync {
    /// The singleton row, if it has been written.
    async fn load_site(&self) -> Result<Option<SiteRecord>, RepoError>;

    async fn upsert_site(&self, params: UpsertSiteParams) -> Result<SiteRecord, RepoError>;
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError>;

    async fn upsert_category(
        &self,
        params: UpsertCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    async fn delete_category(&self, id: &str) -> Result<(), RepoError>;
}

#[async_trait]
pub trait ProductsRepo: Send + Sync {
    /// All products ordered by name, with images and variants attached.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, RepoError>;

    async fn upsert_product(&self, params: UpsertProductParams)
    -> Result<ProductRecord, RepoError>;

    async fn delete_product(&self, id: &str) -> Result<(), RepoError>;
}

#[async_trait]
pub trait FaqsRepo: Send + Sync {
    /// All FAQs ordered by sort order.
    async fn list_faqs(&self) -> Result<Vec<FaqRecord>, RepoError>;

    async fn upsert_faq(&self, params: UpsertFaqParams) -> Result<FaqRecord, RepoError>;

    async fn delete_faq(&self, id: i32) -> Result<(), RepoError>;
}

#[async_trait]
pub trait TestimonialsRepo: Send + Sync {
    /// All testimonials ordered by sort order.
    async fn list_testimonials(&self) -> Result<Vec<TestimonialRecord>, RepoError>;

    async fn upsert_testimonial(
        &self,
        params: UpsertTestimonialParams,
    ) -> Result<TestimonialRecord, RepoError>;

    async fn delete_testimonial(&self, id: i32) -> Result<(), RepoError>;
}

/// Inserts the starter catalog atomically, skipping rows that already exist.
#[async_trait]
pub trait SeedRepo: Send + Sync {
    async fn seed_catalog(
        &self,
        catalog: &crate::application::seed::SeedCatalog,
    ) -> Result<SeedReport, RepoError>;
}

/// Connectivity probe behind `/_health/db`.
#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
