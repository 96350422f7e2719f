//! Slug handling for catalog keys.
//!
//! Admin-supplied slugs are trimmed and stored as given so lookups match what
//! was typed. A blank product slug falls back to the record id.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug must not be empty")]
    Empty,
}

/// Trim `input`, rejecting it when nothing is left.
pub fn normalize_slug(input: &str) -> Result<String, SlugError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SlugError::Empty);
    }
    Ok(trimmed.to_string())
}

/// Use `input` when present, otherwise `fallback`, both trimmed.
pub fn slug_or_fallback(input: Option<&str>, fallback: &str) -> Result<String, SlugError> {
    match input.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(value.to_string()),
        None => normalize_slug(fallback),
    }
}
