// src/content/client.rs
// reqwest client for the content backend. Sitemap fetches degrade to an
// empty list on failure so a backend outage can never fail a sitemap
// request; the feed fetch propagates the error instead.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::content::{ContentRecord, ContentSource, Translation};
use crate::locales::Locale;

// Backends that ignore `sitemap=1` paginate instead; this caps the fallback
// loop so a misbehaving backend cannot spin us forever.
const MAX_PAGES: u32 = 50;

#[derive(Clone)]
pub struct HttpContentSource {
    base: String,
    client: reqwest::Client,
}

impl HttpContentSource {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the full corpus behind `path` (`blog-posts` or `use-cases`).
    ///
    /// Asks for the unpaginated `sitemap=1` dump; if the backend paginates
    /// anyway, keeps requesting increasing pages until an empty (or
    /// repeated) page comes back, with or without a `total_pages` hint.
    async fn fetch_all(&self, path: &str) -> Result<Vec<ContentRecord>> {
        let mut page: u32 = 1;
        let mut out = Vec::new();

        loop {
            let url = format!("{}/{}?sitemap=1&page={}", self.base, path, page);
            let resp = self
                .client
                .get(&url)
                .timeout(Duration::from_secs(10))
                .send()
                .await
                .with_context(|| format!("GET {url}"))?
                .error_for_status()
                .with_context(|| format!("GET {url}"))?;

            let envelope: Envelope = resp
                .json()
                .await
                .with_context(|| format!("parsing {path} page {page}"))?;

            let batch: Vec<ContentRecord> = envelope
                .records
                .into_iter()
                .map(WireRecord::into_record)
                .collect();
            if batch.is_empty() {
                break;
            }
            // A backend that ignores `page` replays the same batch for every
            // page number; stop rather than accumulate duplicates.
            if out.ends_with(&batch) {
                break;
            }
            out.extend(batch);

            let reported_done = matches!(envelope.total_pages, Some(total) if page >= total);
            if reported_done || page >= MAX_PAGES {
                break;
            }
            page += 1;
        }

        Ok(out)
    }

    async fn fetch_for_sitemap(&self, path: &str) -> Vec<ContentRecord> {
        match self.fetch_all(path).await {
            Ok(records) => crate::content::with_slugs(records),
            Err(e) => {
                tracing::warn!(error = ?e, path, "content fetch failed; sitemap degrades to static entries");
                counter!("content_fetch_errors_total").increment(1);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn blog_posts_for_sitemap(&self) -> Vec<ContentRecord> {
        self.fetch_for_sitemap("blog-posts").await
    }

    async fn use_cases_for_sitemap(&self) -> Vec<ContentRecord> {
        self.fetch_for_sitemap("use-cases").await
    }

    async fn blog_posts_for_feed(&self) -> Result<Vec<ContentRecord>> {
        Ok(crate::content::with_slugs(
            self.fetch_all("blog-posts").await?,
        ))
    }
}

// Wire shapes. Blog posts arrive under `posts`, use cases under `items`;
// one envelope covers both.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default, alias = "posts", alias = "items")]
    records: Vec<WireRecord>,
    #[serde(default)]
    total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    featured_image_url: Option<String>,
    #[serde(default)]
    featured_image_urls: Option<Vec<String>>,
    #[serde(default)]
    translations: Option<BTreeMap<String, WireTranslation>>,
}

#[derive(Debug, Deserialize)]
struct WireTranslation {
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl WireRecord {
    fn into_record(self) -> ContentRecord {
        let created_at = self
            .created_at
            .as_deref()
            .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok());

        // Use cases carry a list of images; first one wins.
        let image_url = self
            .featured_image_url
            .or_else(|| self.featured_image_urls.and_then(|v| v.into_iter().next()));

        // Locale codes we don't serve yet are skipped, not fatal.
        let mut translations = BTreeMap::new();
        for (code, t) in self.translations.unwrap_or_default() {
            if let Ok(locale) = code.parse::<Locale>() {
                translations.insert(
                    locale,
                    Translation {
                        slug: t.slug,
                        title: t.title,
                        description: t.description,
                    },
                );
            }
        }

        ContentRecord {
            slug: self.slug,
            created_at,
            title: self.title.unwrap_or_default(),
            description: self.description,
            image_url,
            translations,
        }
    }
}
