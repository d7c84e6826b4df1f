// src/content/mod.rs
pub mod client;

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use time::OffsetDateTime;

use crate::locales::Locale;

pub use client::HttpContentSource;

/// Locale-specific overrides for a content record. Absent fields fall back
/// to the base record; translations never carry their own dates or images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// One backend content item (blog post or use case), normalized into the
/// shape the sitemap and feed builders consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    /// URL-safe identifier in the base locale. Records without one are
    /// excluded from every generated surface.
    pub slug: Option<String>,
    pub created_at: Option<OffsetDateTime>,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub translations: BTreeMap<Locale, Translation>,
}

impl ContentRecord {
    /// Slug canonical for `locale`: the translated slug when one exists,
    /// otherwise the base slug.
    pub fn slug_for(&self, locale: Locale) -> Option<&str> {
        self.translations
            .get(&locale)
            .and_then(|t| t.slug.as_deref())
            .or(self.slug.as_deref())
    }
}

/// Where sitemap/feed content comes from. The two `*_for_sitemap` calls
/// degrade to an empty list on any upstream failure; the feed call
/// propagates failure so the RSS route can refuse to serve a partial feed.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn blog_posts_for_sitemap(&self) -> Vec<ContentRecord>;
    async fn use_cases_for_sitemap(&self) -> Vec<ContentRecord>;
    async fn blog_posts_for_feed(&self) -> Result<Vec<ContentRecord>>;
}

/// Normalize backend-provided rich text for feed descriptions: decode HTML
/// entities, strip tags, collapse whitespace.
pub fn normalize_summary(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Drop records that have no base slug; nothing downstream can link them.
pub fn with_slugs(records: Vec<ContentRecord>) -> Vec<ContentRecord> {
    records.into_iter().filter(|r| r.slug.is_some()).collect()
}
