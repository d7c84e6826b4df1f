//! Deploy-time sitemap submission.
//!
//! Waits out DNS/CDN propagation, polls the public sitemap URL until it is
//! reachable, then submits it to Search Console. Always exits 0: crawlers
//! discover the sitemap through robots.txt anyway, so a failed submission
//! must never fail a deployment.

use std::time::Duration;

use photomuse_seo::search_console::{submit_configured, SearchConsoleClient};
use photomuse_seo::SiteConfig;

const PROPAGATION_DELAY_SECS: u64 = 30;
const POLL_ATTEMPTS: u32 = 10;
const POLL_BACKOFF_SECS: u64 = 15;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let config = SiteConfig::from_env();

    tracing::info!(
        delay_secs = PROPAGATION_DELAY_SECS,
        "waiting for DNS/CDN propagation"
    );
    tokio::time::sleep(Duration::from_secs(PROPAGATION_DELAY_SECS)).await;

    if !wait_for_sitemap(&config.sitemap_url).await {
        tracing::warn!(
            sitemap_url = %config.sitemap_url,
            "sitemap never became reachable; skipping submission"
        );
        return;
    }

    let client = SearchConsoleClient::default();
    match submit_configured(&client, &config).await {
        Ok(outcome) => {
            tracing::info!(
                sitemap_url = %outcome.sitemap_url,
                status_check = outcome.status_check,
                "sitemap submitted"
            );
            if let Some(status) = outcome.status {
                tracing::info!(
                    last_submitted = ?status.last_submitted,
                    is_pending = ?status.is_pending,
                    "search console sitemap status"
                );
            }
        }
        // Deliberately not fatal: robots.txt discovery is the fallback.
        Err(e) => tracing::warn!(error = %e, "sitemap submission failed"),
    }
}

/// Bounded HEAD polling with a fixed backoff.
async fn wait_for_sitemap(url: &str) -> bool {
    let client = reqwest::Client::new();
    for attempt in 1..=POLL_ATTEMPTS {
        match client
            .head(url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(url, attempt, "sitemap is reachable");
                return true;
            }
            Ok(resp) => {
                tracing::info!(url, attempt, status = %resp.status(), "sitemap not ready yet");
            }
            Err(e) => {
                tracing::info!(url, attempt, error = %e, "sitemap HEAD failed");
            }
        }
        if attempt < POLL_ATTEMPTS {
            tokio::time::sleep(Duration::from_secs(POLL_BACKOFF_SECS)).await;
        }
    }
    false
}
