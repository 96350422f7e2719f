//! Shared domain enumerations aligned with persisted database values.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Currencies the storefront can price in. Only rupiah is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "IDR")]
    Idr,
}

impl Currency {
    pub fn as_str(self) -> &'static str {
        match self {
            Currency::Idr => "IDR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for Currency {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "IDR" => Ok(Currency::Idr),
            _ => Err(UnknownVariant {
                kind: "currency",
                value: value.to_string(),
            }),
        }
    }
}

/// Where a testimonial was originally posted (mirrors Postgres enum `testimonial_source`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "testimonial_source", rename_all = "snake_case")]
pub enum TestimonialSource {
    Instagram,
    Tiktok,
    Whatsapp,
    Google,
}

impl TestimonialSource {
    pub fn as_str(self) -> &'static str {
        match self {
            TestimonialSource::Instagram => "instagram",
            TestimonialSource::Tiktok => "tiktok",
            TestimonialSource::Whatsapp => "whatsapp",
            TestimonialSource::Google => "google",
        }
    }
}

impl FromStr for TestimonialSource {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(TestimonialSource::Instagram),
            "tiktok" => Ok(TestimonialSource::Tiktok),
            "whatsapp" => Ok(TestimonialSource::Whatsapp),
            "google" => Ok(TestimonialSource::Google),
            _ => Err(UnknownVariant {
                kind: "testimonial source",
                value: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_parses_case_insensitively() {
        assert_eq!("idr".parse::<Currency>(), Ok(Currency::Idr));
        assert!("USD".parse::<Currency>().is_err());
    }

    #[test]
    fn testimonial_source_round_trips_through_str() {
        for source in [
            TestimonialSource::Instagram,
            TestimonialSource::Tiktok,
            TestimonialSource::Whatsapp,
            TestimonialSource::Google,
        ] {
            assert_eq!(source.as_str().parse::<TestimonialSource>(), Ok(source));
        }
        assert!("facebook".parse::<TestimonialSource>().is_err());
    }
}
