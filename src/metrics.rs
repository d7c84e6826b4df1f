use axum::{routing::get, Router};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and register series descriptions.
    pub fn init() -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");

        describe_counter!(
            "content_fetch_errors_total",
            "Backend content fetches that failed and degraded to empty."
        );
        describe_counter!("sitemap_builds_total", "Sitemap documents generated.");
        describe_counter!("feed_builds_total", "RSS feeds generated.");
        describe_counter!(
            "sitemap_submissions_total",
            "Successful Search Console sitemap submissions."
        );
        describe_counter!(
            "sitemap_submission_failures_total",
            "Search Console submissions rejected upstream."
        );

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
