//! Maher Snack & Cookies storefront: catalog reads behind a tag-invalidated
//! cache, cookie-gated dashboard writes, and WhatsApp order links.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
