//! SEO Surface Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

mod api;
mod config;
mod content;
mod feed;
mod locales;
mod metrics;
mod search_console;
mod sitemap;
mod urls;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::AppState;
use crate::metrics::Metrics;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - SEO_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("SEO_DEV_LOG").ok().is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("photomuse_seo=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let metrics = Metrics::init();

    let state = AppState::from_env();
    tracing::info!(
        base_url = %state.config.base_url,
        content_api = %state.config.content_api_base,
        "seo surface service starting"
    );

    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
