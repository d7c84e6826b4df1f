use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::config::SiteConfig;
use crate::content::{ContentSource, HttpContentSource};
use crate::search_console::{self, SearchConsoleClient};
use crate::{feed, sitemap};

const SITEMAP_CACHE: &str = "public, s-maxage=3600, stale-while-revalidate=86400";
// Retired /photo/* pages: permanent tombstone, aggressively edge-cached.
const GONE_CACHE: &str = "public, max-age=31536000, immutable";
const GONE_ROBOTS: &str = "noindex, nofollow, noimageindex, noarchive";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub source: Arc<dyn ContentSource>,
    pub search_console: SearchConsoleClient,
}

impl AppState {
    pub fn new(
        config: SiteConfig,
        source: Arc<dyn ContentSource>,
        search_console: SearchConsoleClient,
    ) -> Self {
        Self {
            config: Arc::new(config),
            source,
            search_console,
        }
    }

    pub fn from_env() -> Self {
        let config = SiteConfig::from_env();
        let source = Arc::new(HttpContentSource::new(&config.content_api_base));
        Self::new(config, source, SearchConsoleClient::default())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/rss.xml", get(rss_xml))
        .route("/robots.txt", get(robots_txt))
        .route(
            "/api/search-console",
            get(search_console_status).post(search_console_submit),
        )
        .route("/photo/{*path}", any(photo_gone))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn sitemap_xml(State(state): State<AppState>) -> impl IntoResponse {
    let entries = sitemap::build(state.source.as_ref(), &state.config).await;
    let xml = sitemap::to_xml(&entries);
    (
        [
            (header::CONTENT_TYPE, "application/xml; charset=UTF-8"),
            (header::CACHE_CONTROL, SITEMAP_CACHE),
        ],
        xml,
    )
}

async fn rss_xml(State(state): State<AppState>) -> impl IntoResponse {
    match feed::build(state.source.as_ref(), &state.config, state.config.feed_limit).await {
        Ok(xml) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/rss+xml; charset=UTF-8"),
                (header::CACHE_CONTROL, SITEMAP_CACHE),
            ],
            xml,
        )
            .into_response(),
        // Stricter than the sitemap on purpose: no partial feeds.
        Err(e) => {
            tracing::warn!(error = ?e, "feed build failed; serving 404");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    let body = format!(
        "User-agent: *\nAllow: /\nDisallow: /api/\nDisallow: /admin/\n\nSitemap: {}\n",
        state.config.sitemap_url
    );
    ([(header::CONTENT_TYPE, "text/plain; charset=UTF-8")], body)
}

async fn photo_gone() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert("x-robots-tag", HeaderValue::from_static(GONE_ROBOTS));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(GONE_CACHE));
    (StatusCode::GONE, headers, "Gone")
}

#[derive(Serialize)]
struct ApiResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResponse {
    fn ok(message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            error: None,
        }
    }

    fn err(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error.into()),
        }
    }
}

/// GET: configuration check only, no Google traffic.
async fn search_console_status(State(state): State<AppState>) -> impl IntoResponse {
    let configured =
        state.config.gsc_service_account_json.is_some() && state.config.gsc_site_url.is_some();
    let data = serde_json::json!({
        "configured": configured,
        "site_url": state.config.gsc_site_url,
        "sitemap_url": state.config.sitemap_url,
    });
    Json(ApiResponse::ok("search console configuration", Some(data)))
}

/// POST: run the full submission flow once.
async fn search_console_submit(State(state): State<AppState>) -> impl IntoResponse {
    match search_console::submit_configured(&state.search_console, &state.config).await {
        Ok(outcome) => {
            let data = serde_json::to_value(&outcome).unwrap_or(serde_json::Value::Null);
            (
                StatusCode::OK,
                Json(ApiResponse::ok("sitemap submitted", Some(data))),
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "sitemap submission failed");
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(ApiResponse::err("sitemap submission failed", e.to_string())),
            )
        }
    }
}
