//! Status transition policy.

use serde::{Deserialize, Serialize};

/// How strictly status changes follow the lifecycle graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any recognized status may be set from any other.
    #[default]
    Permissive,
    /// Only forward moves along the lifecycle graph, or cancellation of a
    /// non-terminal order.
    Strict,
}
