//! Vitrine: the interactivity layer for an event landing page.
//!
//! Vitrine drives a [`vitrine_core`] scene the way a browser script drives
//! the DOM: scroll-triggered reveal animations, count-up statistics, a
//! testimonial carousel, a live countdown, registration form validation, and
//! celebration effects. Everything is deterministic; components take
//! explicit monotonic and wall-clock times, so behavior is fully testable
//! without sleeping.
//!
//! The usual entry point is [`Page`], which owns a stage and routes
//! visibility events and timer fires to the installed components:
//!
//! ```
//! use std::time::{Duration, Instant};
//! use chrono::Utc;
//! use vitrine::{Page, SiteConfig};
//! use vitrine_core::Rect;
//!
//! let mut page = Page::new(SiteConfig::default(), 800.0, 600.0);
//! let hero = page.scene_mut().create_element("section");
//! page.scene_mut().set_attribute(hero, "data-reveal", "zoom-in");
//! page.scene_mut().set_rect(hero, Rect::new(0.0, 100.0, 800.0, 400.0));
//! page.scan_reveals();
//!
//! let now = Instant::now();
//! page.tick(now, Utc::now());
//! page.tick(now + Duration::from_millis(800), Utc::now());
//! assert!(page.scene().has_class(hero, "revealed"));
//! ```
//!
//! Individual components ([`reveal::RevealCoordinator`],
//! [`carousel::Carousel`], [`countdown::CountdownTicker`],
//! [`form::RegistrationForm`], [`effects::EffectsRunner`]) can also be used
//! directly against a scene and timer manager of your own.

pub mod analytics;
pub mod animation;
pub mod carousel;
pub mod config;
pub mod countdown;
pub mod effects;
mod error;
pub mod form;
mod page;
pub mod reveal;

pub use config::{ConfigError, SiteConfig};
pub use error::{Error, Result};
pub use page::Page;
