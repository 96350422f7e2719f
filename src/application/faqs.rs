//! FAQ reads and admin writes.

use std::sync::Arc;

use crate::application::categories::required;
use crate::application::error::CatalogError;
use crate::application::repos::{FaqsRepo, RepoError, UpsertFaqParams};
use crate::cache::{CacheKey, CacheLayer, CacheOptions, CacheTag, Memoized};
use crate::domain::entities::FaqRecord;

#[derive(Debug, Clone, Default)]
pub struct FaqCommand {
    pub id: Option<i32>,
    pub question: String,
    pub answer: String,
    pub sort_order: i32,
}

#[derive(Clone)]
pub struct FaqService {
    repo: Arc<dyn FaqsRepo>,
    cache: Arc<CacheLayer>,
    all: Memoized<Vec<FaqRecord>, RepoError>,
}

impl FaqService {
    pub fn new(repo: Arc<dyn FaqsRepo>, cache: Arc<CacheLayer>) -> Self {
        let options = CacheOptions::new(CacheKey::new(["faqs", "all"]), [CacheTag::Faqs])
            .revalidate(cache.config().default_revalidate());
        let reader = Arc::clone(&repo);
        let all = cache.memoize(options, move || {
            let reader = Arc::clone(&reader);
            async move { reader.list_faqs().await }
        });
        Self { repo, cache, all }
    }

    /// All FAQs in display order.
    pub async fn get_all(&self) -> Result<Vec<FaqRecord>, CatalogError> {
        Ok(self.all.call().await?)
    }

    pub async fn upsert(&self, command: FaqCommand) -> Result<FaqRecord, CatalogError> {
        let params = UpsertFaqParams {
            id: command.id,
            question: required("question", &command.question)?,
            answer: required("answer", &command.answer)?,
            sort_order: command.sort_order,
        };
        let record = self.repo.upsert_faq(params).await?;
        self.cache.invalidate(CacheTag::Faqs);
        Ok(record)
    }

    pub async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        self.repo.delete_faq(id).await?;
        self.cache.invalidate(CacheTag::Faqs);
        Ok(())
    }
}
