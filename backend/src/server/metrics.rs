//! Prometheus metrics middleware.

use std::io;

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

/// Build the middleware serving `/metrics`.
///
/// # Errors
/// Returns [`io::Error`] when the metric families cannot be registered.
pub(super) fn prometheus_metrics() -> io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("parking")
        .endpoint("/metrics")
        .build()
        .map_err(|e| io::Error::other(format!("configure Prometheus metrics: {e}")))
}
