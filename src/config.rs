// src/config.rs
// Environment-backed service configuration. Everything has a sane local
// default except the Search Console credentials, which stay optional so the
// sitemap/RSS routes keep working without them.

use std::env;

pub const ENV_BASE_URL: &str = "SITE_BASE_URL";
pub const ENV_CONTENT_API: &str = "CONTENT_API_BASE";
pub const ENV_SITEMAP_URL: &str = "SITEMAP_URL";
pub const ENV_GSC_SITE_URL: &str = "GSC_SITE_URL";
pub const ENV_GSC_SERVICE_ACCOUNT: &str = "GSC_SERVICE_ACCOUNT_JSON";
pub const ENV_FEED_LIMIT: &str = "RSS_FEED_LIMIT";

const DEFAULT_BASE_URL: &str = "https://photomuse.ai";
const DEFAULT_CONTENT_API: &str = "https://api.photomuse.ai/v1";
const DEFAULT_FEED_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Public origin of the marketing site, no trailing slash.
    pub base_url: String,
    /// Base URL of the content backend (blog posts, use cases).
    pub content_api_base: String,
    /// Absolute URL the sitemap is served at; submitted to Search Console.
    pub sitemap_url: String,
    /// Search Console property (e.g. `sc-domain:photomuse.ai`).
    pub gsc_site_url: Option<String>,
    /// Raw service-account JSON blob; parsed lazily per submission.
    pub gsc_service_account_json: Option<String>,
    /// Max number of items in the RSS feed.
    pub feed_limit: usize,
}

impl SiteConfig {
    pub fn from_env() -> Self {
        let base_url = env::var(ENV_BASE_URL)
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let sitemap_url =
            env::var(ENV_SITEMAP_URL).unwrap_or_else(|_| format!("{base_url}/sitemap.xml"));

        let feed_limit = env::var(ENV_FEED_LIMIT)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_FEED_LIMIT);

        Self {
            base_url,
            content_api_base: env::var(ENV_CONTENT_API)
                .unwrap_or_else(|_| DEFAULT_CONTENT_API.to_string())
                .trim_end_matches('/')
                .to_string(),
            sitemap_url,
            gsc_site_url: env::var(ENV_GSC_SITE_URL).ok().filter(|s| !s.is_empty()),
            gsc_service_account_json: env::var(ENV_GSC_SERVICE_ACCOUNT)
                .ok()
                .filter(|s| !s.is_empty()),
            feed_limit,
        }
    }

    /// Config for tests: local defaults, no credentials.
    pub fn for_tests(base_url: &str, content_api_base: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            content_api_base: content_api_base.trim_end_matches('/').to_string(),
            sitemap_url: format!("{}/sitemap.xml", base_url.trim_end_matches('/')),
            gsc_site_url: None,
            gsc_service_account_json: None,
            feed_limit: DEFAULT_FEED_LIMIT,
        }
    }
}
