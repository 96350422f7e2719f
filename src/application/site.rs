//! Site singleton reads and writes.

use std::sync::Arc;

use time::OffsetDateTime;

use crate::application::error::CatalogError;
use crate::application::repos::{RepoError, SiteRepo, UpsertSiteParams};
use crate::cache::{CacheKey, CacheLayer, CacheOptions, CacheTag, Memoized};
use crate::domain::entities::{SeoConfig, SiteRecord};

pub const DEFAULT_LOCALE: &str = "id-ID";

/// Site settings as submitted from the dashboard, before normalisation.
#[derive(Debug, Clone, Default)]
pub struct SiteCommand {
    pub name: String,
    pub domain: String,
    pub locale: Option<String>,
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

#[derive(Clone)]
pub struct SiteService {
    repo: Arc<dyn SiteRepo>,
    cache: Arc<CacheLayer>,
    record: Memoized<Option<SiteRecord>, RepoError>,
}

impl SiteService {
    pub fn new(repo: Arc<dyn SiteRepo>, cache: Arc<CacheLayer>) -> Self {
        let options = CacheOptions::new(CacheKey::new(["site", "record"]), [CacheTag::Site])
            .revalidate(cache.config().default_revalidate());
        let reader = Arc::clone(&repo);
        let record = cache.memoize(options, move || {
            let reader = Arc::clone(&reader);
            async move { reader.load_site().await }
        });
        Self {
            repo,
            cache,
            record,
        }
    }

    /// The stored site, or the built-in default while none has been written.
    pub async fn get_site(&self) -> Result<SiteRecord, CatalogError> {
        let stored = self.record.call().await?;
        Ok(stored.unwrap_or_else(|| SiteRecord::fallback(OffsetDateTime::now_utc())))
    }

    pub async fn seo_config(&self) -> Result<SeoConfig, CatalogError> {
        Ok(self.get_site().await?.seo_config())
    }

    pub async fn upsert(&self, command: SiteCommand) -> Result<SiteRecord, CatalogError> {
        let params = normalize(command)?;
        let record = self.repo.upsert_site(params).await?;
        self.cache.invalidate(CacheTag::Site);
        Ok(record)
    }
}

fn normalize(command: SiteCommand) -> Result<UpsertSiteParams, CatalogError> {
    let name = command.name.trim().to_string();
    if name.is_empty() {
        return Err(CatalogError::validation("name", "site name must not be empty"));
    }
    let whatsapp = command.whatsapp.trim().to_string();
    if whatsapp.is_empty() {
        return Err(CatalogError::validation(
            "whatsapp",
            "WhatsApp link must not be empty",
        ));
    }

    Ok(UpsertSiteParams {
        name,
        domain: command.domain.trim().to_string(),
        locale: optional(command.locale).unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        whatsapp,
        email: command.email.trim().to_string(),
        phone: command.phone.trim().to_string(),
        address: command.address.trim().to_string(),
        hours: optional(command.hours),
        logo_light: command.logo_light.trim().to_string(),
        logo_dark: command.logo_dark.trim().to_string(),
        instagram: optional(command.instagram),
        tiktok: optional(command.tiktok),
        facebook: optional(command.facebook),
        default_title: command.default_title.trim().to_string(),
        default_description: command.default_description.trim().to_string(),
        keywords: command
            .keywords
            .into_iter()
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect(),
        og_image: command.og_image.trim().to_string(),
        twitter_handle: optional(command.twitter_handle),
    })
}

/// Blank strings are stored as null.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
