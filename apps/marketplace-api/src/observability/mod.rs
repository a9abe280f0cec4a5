//! Observability module for metrics.
//!
//! Provides Prometheus metrics export for order placement and lifecycle
//! changes. Logging setup lives in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_order_placement, record_placement_retry,
    record_status_transition,
};
