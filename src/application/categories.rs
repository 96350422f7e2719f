//! Category reads and admin writes.

use std::sync::Arc;

use crate::application::error::CatalogError;
use crate::application::repos::{CategoriesRepo, RepoError, UpsertCategoryParams};
use crate::application::site::optional;
use crate::cache::{CacheKey, CacheLayer, CacheOptions, CacheTag, Memoized};
use crate::domain::entities::CategoryRecord;
use crate::domain::slug::normalize_slug;

#[derive(Debug, Clone, Default)]
pub struct CategoryCommand {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoriesRepo>,
    cache: Arc<CacheLayer>,
    all: Memoized<Vec<CategoryRecord>, RepoError>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoriesRepo>, cache: Arc<CacheLayer>) -> Self {
        let options = CacheOptions::new(
            CacheKey::new(["categories", "all"]),
            [CacheTag::Categories],
        )
        .revalidate(cache.config().default_revalidate());
        let reader = Arc::clone(&repo);
        let all = cache.memoize(options, move || {
            let reader = Arc::clone(&reader);
            async move { reader.list_categories().await }
        });
        Self { repo, cache, all }
    }

    pub async fn get_all(&self) -> Result<Vec<CategoryRecord>, CatalogError> {
        Ok(self.all.call().await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<CategoryRecord>, CatalogError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|category| category.id == id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, CatalogError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|category| category.slug == slug))
    }

    pub async fn upsert(&self, command: CategoryCommand) -> Result<CategoryRecord, CatalogError> {
        let id = required("id", &command.id)?;
        let name = required("name", &command.name)?;
        let slug = normalize_slug(&command.slug)
            .map_err(|err| CatalogError::validation("slug", err.to_string()))?;

        let record = self
            .repo
            .upsert_category(UpsertCategoryParams {
                id,
                slug,
                name,
                description: optional(command.description),
            })
            .await?;
        self.cache.invalidate(CacheTag::Categories);
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        self.repo.delete_category(id).await?;
        self.cache.invalidate(CacheTag::Categories);
        Ok(())
    }
}

pub(crate) fn required(field: &'static str, value: &str) -> Result<String, CatalogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CatalogError::validation(field, "must not be empty"))
    } else {
        Ok(trimmed.to_string())
    }
}
