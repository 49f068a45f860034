//! Metrics and observability utilities
//!
//! Provides Prometheus metrics with SLO-aligned histograms
//! and standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all Sakila API metrics
pub const METRICS_PREFIX: &str = "sakila";

/// SLO-aligned histogram buckets for request latency (in seconds)
/// Targets: P50 < 50ms, P99 < 150ms
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms - P50 target
    0.075,  // 75ms
    0.100,  // 100ms
    0.150,  // 150ms - P99 target
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
];

/// Full metric name under the crate prefix
pub fn metric_name(suffix: &str) -> String {
    format!("{}_{}", METRICS_PREFIX, suffix)
}

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        metric_name("requests_total"),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        metric_name("request_duration_seconds"),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Rental metrics
    describe_counter!(
        metric_name("rentals_opened_total"),
        Unit::Count,
        "Rentals opened through the API"
    );

    describe_counter!(
        metric_name("rentals_returned_total"),
        Unit::Count,
        "Rentals closed through the API"
    );

    describe_counter!(
        metric_name("rent_conflicts_total"),
        Unit::Count,
        "Rent requests rejected because no copy was available"
    );

    // Customer metrics
    describe_counter!(
        metric_name("customer_mutations_total"),
        Unit::Count,
        "Customer creates, updates and deletes"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            metric_name("requests_total"),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            metric_name("request_duration_seconds"),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

pub fn record_rental_opened() {
    counter!(metric_name("rentals_opened_total")).increment(1);
}

pub fn record_rental_returned() {
    counter!(metric_name("rentals_returned_total")).increment(1);
}

pub fn record_rent_conflict() {
    counter!(metric_name("rent_conflicts_total")).increment(1);
}

/// `action` is one of create, update, delete
pub fn record_customer_mutation(action: &'static str) {
    counter!(metric_name("customer_mutations_total"), "action" => action).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_buckets() {
        let mut prev = 0.0;
        for &bucket in LATENCY_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }

        assert!(LATENCY_BUCKETS.contains(&0.050));
        assert!(LATENCY_BUCKETS.contains(&0.150));
    }

    #[test]
    fn test_metric_names_are_prefixed() {
        assert_eq!(metric_name("requests_total"), "sakila_requests_total");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let metrics = RequestMetrics::start("GET", "/api/films/top");
        metrics.finish(200);
        record_rental_opened();
        record_customer_mutation("create");
    }
}
