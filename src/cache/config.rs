//! Cache configuration.

use std::time::Duration;

use super::keys::Revalidate;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// When false every read goes straight to the store.
    pub enabled: bool,
    /// Time-to-live applied by repositories; `None` keeps entries until invalidated.
    pub default_revalidate_seconds: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_revalidate_seconds: None,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            default_revalidate_seconds: settings.default_revalidate.map(|ttl| ttl.as_secs()),
        }
    }
}

impl CacheConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn default_revalidate(&self) -> Revalidate {
        match self.default_revalidate_seconds {
            Some(0) | None => Revalidate::Never,
            Some(seconds) => Revalidate::After(Duration::from_secs(seconds)),
        }
    }
}
