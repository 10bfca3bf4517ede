//! Prometheus request metrics middleware.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;

/// Global Prometheus handle, served on `/metrics`.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("arena")
        .endpoint("/metrics")
        .build()
        .expect("metrics builder")
});
