//! Testimonial reads and admin writes.

use std::sync::Arc;

use crate::application::categories::required;
use crate::application::error::CatalogError;
use crate::application::repos::{RepoError, TestimonialsRepo, UpsertTestimonialParams};
use crate::application::site::optional;
use crate::cache::{CacheKey, CacheLayer, CacheOptions, CacheTag, Memoized};
use crate::domain::entities::TestimonialRecord;
use crate::domain::types::TestimonialSource;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

#[derive(Debug, Clone, Default)]
pub struct TestimonialCommand {
    pub id: Option<i32>,
    pub name: String,
    pub handle: Option<String>,
    pub message: String,
    pub rating: i16,
    pub source: Option<TestimonialSource>,
    pub sort_order: i32,
}

#[derive(Clone)]
pub struct TestimonialService {
    repo: Arc<dyn TestimonialsRepo>,
    cache: Arc<CacheLayer>,
    all: Memoized<Vec<TestimonialRecord>, RepoError>,
}

impl TestimonialService {
    pub fn new(repo: Arc<dyn TestimonialsRepo>, cache: Arc<CacheLayer>) -> Self {
        let options = CacheOptions::new(
            CacheKey::new(["testimonials", "all"]),
            [CacheTag::Testimonials],
        )
        .revalidate(cache.config().default_revalidate());
        let reader = Arc::clone(&repo);
        let all = cache.memoize(options, move || {
            let reader = Arc::clone(&reader);
            async move { reader.list_testimonials().await }
        });
        Self { repo, cache, all }
    }

    pub async fn get_all(&self) -> Result<Vec<TestimonialRecord>, CatalogError> {
        Ok(self.all.call().await?)
    }

    pub async fn upsert(
        &self,
        command: TestimonialCommand,
    ) -> Result<TestimonialRecord, CatalogError> {
        if !(MIN_RATING..=MAX_RATING).contains(&command.rating) {
            return Err(CatalogError::validation(
                "rating",
                format!("must be between {MIN_RATING} and {MAX_RATING}"),
            ));
        }
        let params = UpsertTestimonialParams {
            id: command.id,
            name: required("name", &command.name)?,
            handle: optional(command.handle),
            message: required("message", &command.message)?,
            rating: command.rating,
            source: command.source,
            sort_order: command.sort_order,
        };
        let record = self.repo.upsert_testimonial(params).await?;
        self.cache.invalidate(CacheTag::Testimonials);
        Ok(record)
    }

    pub async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        self.repo.delete_testimonial(id).await?;
        self.cache.invalidate(CacheTag::Testimonials);
        Ok(())
    }
}
