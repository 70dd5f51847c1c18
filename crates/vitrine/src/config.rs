//! Site configuration.
//!
//! Loaded from TOML. Every field has a default, so a missing or partial
//! configuration yields a working page. Only syntactically broken TOML is an
//! error; semantically bad values inside valid TOML (an unparseable
//! countdown target, say) degrade to their defaults with a warning.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::form::Pricing;

/// Errors loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document failed to parse.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Pricing section.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Base registration price.
    pub base: u32,
    /// Surcharge when accommodation is requested.
    pub accommodation_surcharge: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let Pricing {
            base,
            accommodation_surcharge,
        } = Pricing::default();
        Self {
            base,
            accommodation_surcharge,
        }
    }
}

impl From<PricingConfig> for Pricing {
    fn from(config: PricingConfig) -> Self {
        Self {
            base: config.base,
            accommodation_surcharge: config.accommodation_surcharge,
        }
    }
}

/// Page-wide configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Countdown target as an RFC 3339 timestamp. Unset or unparseable
    /// values disable the countdown.
    pub countdown_target: Option<String>,
    /// Carousel autoplay interval in milliseconds.
    pub carousel_autoplay_ms: u64,
    /// Default stagger delay between child reveals, in milliseconds.
    pub stagger_delay_ms: u64,
    /// Counter count-up duration in milliseconds.
    pub counter_duration_ms: u64,
    /// Registration pricing.
    pub pricing: PricingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            countdown_target: None,
            carousel_autoplay_ms: 5_000,
            stagger_delay_ms: 100,
            counter_duration_ms: 2_000,
            pricing: PricingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        Ok(config)
    }

    /// The countdown target instant, if configured and parseable.
    pub fn countdown_target(&self) -> Option<DateTime<Utc>> {
        let raw = self.countdown_target.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(target) => Some(target.with_timezone(&Utc)),
            Err(error) => {
                tracing::warn!(target: "vitrine::config", raw, %error, "unparseable countdown target, countdown disabled");
                None
            }
        }
    }

    /// The carousel autoplay interval.
    pub fn carousel_autoplay(&self) -> Duration {
        Duration::from_millis(self.carousel_autoplay_ms)
    }

    /// The default stagger delay.
    pub fn stagger_delay(&self) -> Duration {
        Duration::from_millis(self.stagger_delay_ms)
    }

    /// The counter count-up duration.
    pub fn counter_duration(&self) -> Duration {
        Duration::from_millis(self.counter_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert_eq!(config.carousel_autoplay(), Duration::from_secs(5));
        assert_eq!(config.stagger_delay(), Duration::from_millis(100));
        assert_eq!(config.counter_duration(), Duration::from_secs(2));
        assert_eq!(config.pricing.base, 1999);
        assert!(config.countdown_target().is_none());
    }

    #[test]
    fn test_partial_document() {
        let config = SiteConfig::from_toml_str(
            r#"
            carousel_autoplay_ms = 3000

            [pricing]
            base = 999
            "#,
        )
        .unwrap();
        assert_eq!(config.carousel_autoplay(), Duration::from_secs(3));
        assert_eq!(config.pricing.base, 999);
        // Unset pricing fields keep their defaults.
        assert_eq!(config.pricing.accommodation_surcharge, 800);
    }

    #[test]
    fn test_countdown_target_parsed() {
        let config = SiteConfig::from_toml_str(
            r#"countdown_target = "2026-03-14T09:00:00+05:30""#,
        )
        .unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 3, 14, 3, 30, 0).unwrap();
        assert_eq!(config.countdown_target(), Some(expected));
    }

    #[test]
    fn test_bad_countdown_target_degrades() {
        let config = SiteConfig::from_toml_str(r#"countdown_target = "march-ish""#).unwrap();
        assert!(config.countdown_target().is_none());
    }

    #[test]
    fn test_broken_toml_is_an_error() {
        assert!(SiteConfig::from_toml_str("carousel_autoplay_ms = ").is_err());
    }
}
