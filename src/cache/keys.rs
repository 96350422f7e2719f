//! Cache key, tag and revalidation policy definitions.

use std::fmt;
use std::time::Duration;

/// Invalidation tags, one per storefront entity collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheTag {
    Site,
    Categories,
    Products,
    Faqs,
    Testimonials,
}

impl CacheTag {
    pub const ALL: [CacheTag; 5] = [
        CacheTag::Site,
        CacheTag::Categories,
        CacheTag::Products,
        CacheTag::Faqs,
        CacheTag::Testimonials,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CacheTag::Site => "site",
            CacheTag::Categories => "categories",
            CacheTag::Products => "products",
            CacheTag::Faqs => "faqs",
            CacheTag::Testimonials => "testimonials",
        }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable memoization key, e.g. `("products", "all")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Vec<String>);

impl CacheKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(":"))
    }
}

/// How long a memoized value may be served before it is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revalidate {
    /// Keep until one of the entry's tags is invalidated.
    Never,
    /// Recompute once the entry is older than the given duration.
    After(Duration),
}

#[derive(Debug, Clone)]
pub struct CacheOptions {
    pub key: CacheKey,
    pub tags: Vec<CacheTag>,
    pub revalidate: Revalidate,
}

impl CacheOptions {
    pub fn new(key: CacheKey, tags: impl Into<Vec<CacheTag>>) -> Self {
        Self {
            key,
            tags: tags.into(),
            revalidate: Revalidate::Never,
        }
    }

    pub fn revalidate(mut self, revalidate: Revalidate) -> Self {
        self.revalidate = revalidate;
        self
    }
}
