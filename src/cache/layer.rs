//! Memoizing read wrapper with tag invalidation.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use metrics::counter;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::config::CacheConfig;
use super::keys::{CacheOptions, CacheTag, Revalidate};
use super::store::MemoStore;

const METRIC_CACHE_HIT: &str = "maherbites_cache_hit_total";
const METRIC_CACHE_MISS: &str = "maherbites_cache_miss_total";
const METRIC_CACHE_INVALIDATION: &str = "maherbites_cache_invalidation_total";
const METRIC_CACHE_LOAD_ERROR: &str = "maherbites_cache_load_error_total";

/// Process-wide memo cache shared by every repository service.
pub struct CacheLayer {
    config: CacheConfig,
    store: MemoStore,
}

impl CacheLayer {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            store: MemoStore::new(),
        }
    }

    /// A layer that never stores anything; every read reaches the loader.
    pub fn disabled() -> Self {
        Self::new(CacheConfig::disabled())
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Return the memoized value for `options.key`, or run `load` and store
    /// its result.
    ///
    /// Errors are returned to the caller and never stored. A successful load
    /// that raced an invalidation of one of its tags is returned but dropped.
    pub async fn get_or_load<T, E, F, Fut>(&self, options: &CacheOptions, load: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.config.enabled {
            return load().await;
        }

        let key_label = options.key.to_string();
        if let Some(value) = self.store.get::<T>(&options.key, Instant::now()) {
            counter!(METRIC_CACHE_HIT, "key" => key_label).increment(1);
            return Ok(value);
        }
        counter!(METRIC_CACHE_MISS, "key" => key_label.clone()).increment(1);

        let snapshot = self.store.snapshot(&options.tags);
        let value = match load().await {
            Ok(value) => value,
            Err(err) => {
                counter!(METRIC_CACHE_LOAD_ERROR, "key" => key_label).increment(1);
                return Err(err);
            }
        };

        let expires_at = match options.revalidate {
            Revalidate::Never => None,
            Revalidate::After(ttl) => Some(Instant::now() + ttl),
        };
        let stored =
            self.store
                .insert_if_current(options.key.clone(), &snapshot, value.clone(), expires_at);
        if !stored {
            debug!(
                target = "maherbites::cache",
                key = %key_label,
                "Dropped load that raced an invalidation"
            );
        }
        Ok(value)
    }

    /// Drop every entry carrying `tag`. Returns the number of removed entries.
    pub fn invalidate(&self, tag: CacheTag) -> usize {
        let removed = self.store.invalidate(tag);
        counter!(METRIC_CACHE_INVALIDATION, "tag" => tag.as_str()).increment(1);
        debug!(
            target = "maherbites::cache",
            tag = tag.as_str(),
            removed,
            "Invalidated cache tag"
        );
        removed
    }

    pub fn invalidate_all(&self) -> usize {
        CacheTag::ALL.iter().map(|tag| self.invalidate(*tag)).sum()
    }

    /// Wrap a zero-argument read into a memoized function.
    pub fn memoize<T, E, F, Fut>(self: &Arc<Self>, options: CacheOptions, fetch: F) -> Memoized<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        if options.tags.is_empty() {
            warn!(
                target = "maherbites::cache",
                key = %options.key,
                "Memoized read has no tags and can only expire by time"
            );
        }
        Memoized {
            cache: Arc::clone(self),
            options,
            fetch: Arc::new(move || Box::pin(fetch()) as BoxFuture<'static, Result<T, E>>),
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

type Fetch<T, E> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// A read function bound to a cache key, tags and revalidation policy.
pub struct Memoized<T, E> {
    cache: Arc<CacheLayer>,
    options: CacheOptions,
    fetch: Fetch<T, E>,
}

impl<T, E> Clone for Memoized<T, E> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            options: self.options.clone(),
            fetch: Arc::clone(&self.fetch),
        }
    }
}

impl<T, E> Memoized<T, E>
where
    T: Clone + Send + Sync + 'static,
{
    pub async fn call(&self) -> Result<T, E> {
        let fetch = Arc::clone(&self.fetch);
        self.cache
            .get_or_load(&self.options, move || fetch())
            .await
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::cache::CacheKey;

    fn options(entity: &str, tag: CacheTag) -> CacheOptions {
        CacheOptions::new(CacheKey::new([entity, "all"]), [tag])
    }

    fn counting_loader(
        calls: &Arc<AtomicUsize>,
    ) -> impl Fn() -> BoxFuture<'static, Result<usize, String>> + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        move || {
            let calls = Arc::clone(&calls);
            Box::pin(async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) })
        }
    }

    #[tokio::test]
    async fn memoizes_until_invalidated() {
        let cache = Arc::new(CacheLayer::new(CacheConfig::default()));
        let calls = Arc::new(AtomicUsize::new(0));
        let read = cache.memoize(
            options("products", CacheTag::Products),
            counting_loader(&calls),
        );

        assert_eq!(read.call().await, Ok(1));
        assert_eq!(read.call().await, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(cache.invalidate(CacheTag::Products), 1);
        assert_eq!(read.call().await, Ok(2));
    }

    #[tokio::test]
    async fn invalidating_one_tag_keeps_the_others() {
        let cache = Arc::new(CacheLayer::new(CacheConfig::default()));
        let product_calls = Arc::new(AtomicUsize::new(0));
        let faq_calls = Arc::new(AtomicUsize::new(0));
        let products = cache.memoize(
            options("products", CacheTag::Products),
            counting_loader(&product_calls),
        );
        let faqs = cache.memoize(options("faqs", CacheTag::Faqs), counting_loader(&faq_calls));

        products.call().await.unwrap();
        faqs.call().await.unwrap();
        cache.invalidate(CacheTag::Products);
        products.call().await.unwrap();
        faqs.call().await.unwrap();

        assert_eq!(product_calls.load(Ordering::SeqCst), 2);
        assert_eq!(faq_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = CacheLayer::new(CacheConfig::default());
        let opts = options("faqs", CacheTag::Faqs);
        let attempts = AtomicUsize::new(0);

        let first: Result<u8, &str> = cache
            .get_or_load(&opts, || async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err("connection reset")
            })
            .await;
        assert_eq!(first, Err("connection reset"));
        assert!(cache.is_empty());

        let second: Result<u8, &str> = cache
            .get_or_load(&opts, || async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Ok(4)
            })
            .await;
        assert_eq!(second, Ok(4));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn load_racing_invalidation_is_not_stored() {
        let cache = CacheLayer::new(CacheConfig::default());
        let opts = options("categories", CacheTag::Categories);

        let value: Result<u8, ()> = cache
            .get_or_load(&opts, || async {
                cache.invalidate(CacheTag::Categories);
                Ok(1)
            })
            .await;
        assert_eq!(value, Ok(1));
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn time_based_revalidation_recomputes() {
        let cache = Arc::new(CacheLayer::new(CacheConfig::default()));
        let calls = Arc::new(AtomicUsize::new(0));
        let read = cache.memoize(
            options("testimonials", CacheTag::Testimonials)
                .revalidate(Revalidate::After(Duration::from_secs(60))),
            counting_loader(&calls),
        );

        assert_eq!(read.call().await, Ok(1));
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(read.call().await, Ok(1));
        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(read.call().await, Ok(2));
    }

    #[tokio::test]
    async fn disabled_layer_always_loads() {
        let cache = Arc::new(CacheLayer::disabled());
        let calls = Arc::new(AtomicUsize::new(0));
        let read = cache.memoize(options("site", CacheTag::Site), counting_loader(&calls));

        read.call().await.unwrap();
        read.call().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn invalidate_all_clears_every_tag() {
        let cache = CacheLayer::new(CacheConfig::default());
        for tag in CacheTag::ALL {
            let _: Result<u8, ()> = cache
                .get_or_load(&options(tag.as_str(), tag), || async { Ok(0) })
                .await;
        }
        assert_eq!(cache.len(), CacheTag::ALL.len());
        assert_eq!(cache.invalidate_all(), CacheTag::ALL.len());
        assert!(cache.is_empty());
    }
}
