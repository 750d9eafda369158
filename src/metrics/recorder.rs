//! Metrics recording implementation using Prometheus.

use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Trait for recording application metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records a finished lookup with its outcome.
    fn record_lookup(&self, outcome: &str, duration_secs: f64);

    /// Records one outbound call and how it ended.
    fn record_upstream_call(&self, upstream: &str, result: &str, duration_secs: f64);
}

/// Prometheus metrics collector.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    // Lookup metrics
    lookup_requests_total: CounterVec,
    lookup_duration_seconds: HistogramVec,

    // Upstream metrics
    upstream_calls_total: CounterVec,
    upstream_duration_seconds: HistogramVec,
}

impl Metrics {
    /// Creates a new metrics instance with its own Prometheus registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Arc::new(Registry::new());

        let lookup_requests_total = register_counter_vec_with_registry!(
            Opts::new("lookup_requests_total", "Total number of member lookups"),
            &["outcome"],
            registry.clone()
        )?;

        let lookup_duration_seconds = register_histogram_vec_with_registry!(
            "lookup_duration_seconds",
            "Member lookup duration in seconds",
            &["outcome"],
            vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
            registry.clone()
        )?;

        let upstream_calls_total = register_counter_vec_with_registry!(
            Opts::new("upstream_calls_total", "Total outbound calls per upstream"),
            &["upstream", "result"],
            registry.clone()
        )?;

        let upstream_duration_seconds = register_histogram_vec_with_registry!(
            "upstream_duration_seconds",
            "Outbound call duration in seconds",
            &["upstream"],
            vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
            registry.clone()
        )?;

        Ok(Metrics {
            registry,
            lookup_requests_total,
            lookup_duration_seconds,
            upstream_calls_total,
            upstream_duration_seconds,
        })
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("Failed to encode metrics: {}", e))?;
        String::from_utf8(buffer).map_err(|e| format!("Metrics encoding produced invalid UTF-8: {}", e))
    }
}

impl MetricsRecorder for Metrics {
    fn record_lookup(&self, outcome: &str, duration_secs: f64) {
        self.lookup_requests_total
            .with_label_values(&[outcome])
            .inc();
        self.lookup_duration_seconds
            .with_label_values(&[outcome])
            .observe(duration_secs);
    }

    fn record_upstream_call(&self, upstream: &str, result: &str, duration_secs: f64) {
        self.upstream_calls_total
            .with_label_values(&[upstream, result])
            .inc();
        self.upstream_duration_seconds
            .with_label_values(&[upstream])
            .observe(duration_secs);
    }
}
