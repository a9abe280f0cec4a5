//! Order placement and lifecycle configuration.

use serde::{Deserialize, Serialize};

use crate::domain::ordering::TransitionPolicy;

/// Orders configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersConfig {
    /// `permissive` allows any recognized status; `strict` follows the graph.
    #[serde(default)]
    pub transition_policy: TransitionPolicy,
    /// Attempts for a placement that hits a retryable storage error.
    #[serde(default = "default_max_placement_attempts")]
    pub max_placement_attempts: u32,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            transition_policy: TransitionPolicy::default(),
            max_placement_attempts: default_max_placement_attempts(),
        }
    }
}

const fn default_max_placement_attempts() -> u32 {
    3
}
