// tests/content_http.rs
//
// HttpContentSource against a local stub backend:
// - sitemap fetches degrade to empty on a 500 (static-only sitemap)
// - the feed fetch propagates the same failure
// - pagination fallback walks pages until exhaustion
// - slugless records never reach the builders

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use serde_json::json;

use photomuse_seo::config::SiteConfig;
use photomuse_seo::content::{ContentSource, HttpContentSource};
use photomuse_seo::locales::SUPPORTED_LOCALES;
use photomuse_seo::sitemap;

/// Bind a stub backend on an ephemeral port, return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn backend_500_degrades_sitemap_to_static_entries() {
    let router = Router::new()
        .route("/blog-posts", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/use-cases", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let base = serve(router).await;

    let source = HttpContentSource::new(&base);
    assert!(source.blog_posts_for_sitemap().await.is_empty());
    assert!(source.use_cases_for_sitemap().await.is_empty());

    let config = SiteConfig::for_tests("https://example.com", &base);
    let entries = sitemap::build(&source, &config).await;
    assert_eq!(entries.len(), SUPPORTED_LOCALES.len() * 4 + 1);
}

#[tokio::test]
async fn feed_fetch_propagates_backend_failure() {
    let router = Router::new().route(
        "/blog-posts",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = serve(router).await;

    let source = HttpContentSource::new(&base);
    assert!(source.blog_posts_for_feed().await.is_err());
}

#[derive(serde::Deserialize)]
struct PageQuery {
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    sitemap: Option<String>,
}

#[tokio::test]
async fn paginating_backend_is_walked_until_exhaustion() {
    let sitemap_flag_seen = Arc::new(AtomicUsize::new(0));
    let flag = sitemap_flag_seen.clone();

    let router = Router::new().route(
        "/blog-posts",
        get(move |Query(q): Query<PageQuery>| {
            let flag = flag.clone();
            async move {
                if q.sitemap.as_deref() == Some("1") {
                    flag.fetch_add(1, Ordering::SeqCst);
                }
                let body = match q.page.unwrap_or(1) {
                    1 => json!({
                        "posts": [{"slug": "first", "created_at": "2025-06-01T12:00:00Z"}],
                        "total_pages": 3
                    }),
                    2 => json!({
                        "posts": [{"slug": "second", "created_at": "2025-06-02T12:00:00Z"}],
                        "total_pages": 3
                    }),
                    _ => json!({ "posts": [], "total_pages": 3 }),
                };
                Json(body)
            }
        }),
    );
    let base = serve(router).await;

    let source = HttpContentSource::new(&base);
    let posts = source.blog_posts_for_feed().await.expect("feed fetch");

    let slugs: Vec<_> = posts.iter().filter_map(|p| p.slug.as_deref()).collect();
    assert_eq!(slugs, vec!["first", "second"]);
    assert!(
        sitemap_flag_seen.load(Ordering::SeqCst) >= 2,
        "every page request must carry sitemap=1"
    );
}

#[tokio::test]
async fn silent_pagination_is_walked_until_an_empty_page() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    // No total_pages anywhere; the only end-of-corpus signal is the empty
    // third page.
    let router = Router::new().route(
        "/blog-posts",
        get(move |Query(q): Query<PageQuery>| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let body = match q.page.unwrap_or(1) {
                    1 => json!({
                        "posts": [{"slug": "first", "created_at": "2025-06-01T12:00:00Z"}]
                    }),
                    2 => json!({
                        "posts": [{"slug": "second", "created_at": "2025-06-02T12:00:00Z"}]
                    }),
                    _ => json!({ "posts": [] }),
                };
                Json(body)
            }
        }),
    );
    let base = serve(router).await;

    let source = HttpContentSource::new(&base);
    let posts = source.blog_posts_for_feed().await.expect("feed fetch");

    let slugs: Vec<_> = posts.iter().filter_map(|p| p.slug.as_deref()).collect();
    assert_eq!(slugs, vec!["first", "second"]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn page_ignoring_backend_is_not_duplicated() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    // Serves the same full dump regardless of `page`; the fetcher must
    // notice the repeat and stop with one copy of each record.
    let router = Router::new().route(
        "/blog-posts",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(json!({
                    "posts": [
                        {"slug": "a", "created_at": "2025-06-01T12:00:00Z"},
                        {"slug": "b", "created_at": "2025-06-02T12:00:00Z"}
                    ]
                }))
            }
        }),
    );
    let base = serve(router).await;

    let source = HttpContentSource::new(&base);
    let posts = source.blog_posts_for_sitemap().await;
    assert_eq!(posts.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn slugless_records_are_filtered_out() {
    let router = Router::new().route(
        "/blog-posts",
        get(|| async {
            Json(json!({
                "posts": [
                    {"slug": null, "title": "draft"},
                    {"slug": "published", "created_at": "2025-06-01T12:00:00Z"}
                ]
            }))
        }),
    );
    let base = serve(router).await;

    let source = HttpContentSource::new(&base);
    let posts = source.blog_posts_for_sitemap().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug.as_deref(), Some("published"));
}

#[tokio::test]
async fn use_cases_envelope_is_understood() {
    let router = Router::new().route(
        "/use-cases",
        get(|| async {
            Json(json!({
                "items": [{
                    "slug": "linkedin-headshots",
                    "featured_image_urls": ["https://cdn.example.com/uc.jpg"]
                }]
            }))
        }),
    );
    let base = serve(router).await;

    let source = HttpContentSource::new(&base);
    let items = source.use_cases_for_sitemap().await;
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].image_url.as_deref(),
        Some("https://cdn.example.com/uc.jpg")
    );
}
