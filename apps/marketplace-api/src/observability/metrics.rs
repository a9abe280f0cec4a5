//! Prometheus metrics for the marketplace API.
//!
//! Recording functions go through the `metrics` facade and are no-ops until
//! [`init_metrics`] installs the Prometheus exporter.
//!
//! # Example
//!
//! ```ignore
//! use marketplace_api::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_order_placement("placed", 3, 0.004);
//! ```

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::{Ipv4Addr, SocketAddr};

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for latency measurements (in seconds).
    pub latency_buckets: Vec<f64>,
    /// Histogram buckets for order line counts.
    pub line_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)),
            // Latency buckets from 100us to 1s
            latency_buckets: vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ],
            line_buckets: vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0],
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets_for_metric(
            Matcher::Full("order_placement_duration_seconds".to_string()),
            &config.latency_buckets,
        )
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .set_buckets_for_metric(
            Matcher::Full("order_placement_lines".to_string()),
            &config.line_buckets,
        )
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

// ============================================================================
// Order Metrics
// ============================================================================

/// Record the outcome of a placement attempt.
///
/// # Arguments
///
/// * `outcome` - `"placed"` or the rejection reason code (e.g. `"insufficient_stock"`)
/// * `lines` - Number of requested lines
/// * `latency_seconds` - Time from request to commit or rejection
pub fn record_order_placement(outcome: &str, lines: usize, latency_seconds: f64) {
    counter!(
        "order_placements_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!("order_placement_duration_seconds").record(latency_seconds);

    #[allow(clippy::cast_precision_loss)]
    histogram!("order_placement_lines").record(lines as f64);
}

/// Record a placement unit of work re-run after a retryable storage error.
pub fn record_placement_retry(reason: &str) {
    counter!(
        "order_placement_retries_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record an order status change.
pub fn record_status_transition(from: &str, to: &str) {
    counter!(
        "order_status_transitions_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();
        assert_eq!(config.listen_addr.port(), 9090);
        assert!(!config.latency_buckets.is_empty());
        assert!(!config.line_buckets.is_empty());
    }

    #[test]
    fn test_config_with_addr() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let config = MetricsConfig::with_addr(addr);
        assert_eq!(config.listen_addr.port(), 8080);
    }

    #[test]
    fn test_recording_without_exporter_is_noop() {
        record_order_placement("placed", 2, 0.01);
        record_placement_retry("conflict");
        record_status_transition("pending", "confirmed");
    }
}
