// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod content;
pub mod feed;
pub mod locales;
pub mod metrics;
pub mod search_console;
pub mod sitemap;
pub mod urls;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::SiteConfig;
pub use crate::locales::{Locale, DEFAULT_LOCALE, SUPPORTED_LOCALES};
