//! Storefront read cache.
//!
//! Memoizes zero-argument "fetch all" reads process-wide, keyed by a stable
//! string tuple, and drops them again when one of their tags is invalidated.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! # omit to keep entries until a tag is invalidated
//! default_revalidate_seconds = 300
//! ```

mod config;
mod keys;
mod layer;
mod lock;
mod registry;
mod store;

pub use config::CacheConfig;
pub use keys::{CacheKey, CacheOptions, CacheTag, Revalidate};
pub use layer::{CacheLayer, Memoized};
