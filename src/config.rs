//! Run configuration for the heuristic and exact paths.
//!
//! # Example
//!
//! ```
//! use u_flowshop::config::{ExactConfig, SolveConfig};
//! use u_flowshop::solver::BackendKind;
//!
//! let config = SolveConfig::default().with_exact(
//!     ExactConfig::default()
//!         .with_time_limit_ms(10_000)
//!         .with_backends(vec![BackendKind::BranchAndBound]),
//! );
//! assert_eq!(config.exact.limits().time_limit.unwrap().as_secs(), 10);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dispatching::RuleKind;
use crate::scheduler::NehConstructor;
use crate::solver::{BackendKind, SolveLimits};

/// NEH settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Initial ordering rule.
    pub rule: RuleKind,
}

impl HeuristicConfig {
    /// Sets the initial ordering rule.
    pub fn with_rule(mut self, rule: RuleKind) -> Self {
        self.rule = rule;
        self
    }

    /// A constructor configured with these settings.
    pub fn constructor(&self) -> NehConstructor {
        NehConstructor::new().with_boxed_rule(self.rule.rule())
    }
}

/// Exact-path settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExactConfig {
    /// Wall-clock limit in milliseconds. `None` = unlimited.
    pub time_limit_ms: Option<u64>,
    /// Search node limit. `None` = unlimited.
    pub node_limit: Option<u64>,
    /// Backends to try, in order.
    pub backends: Vec<BackendKind>,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: Some(60_000), // 1 minute
            node_limit: None,
            backends: BackendKind::DEFAULT_ORDER.to_vec(),
        }
    }
}

impl ExactConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Remove the time limit.
    pub fn without_time_limit(mut self) -> Self {
        self.time_limit_ms = None;
        self
    }

    /// Set the search node limit.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Set the backend probing order.
    pub fn with_backends(mut self, backends: Vec<BackendKind>) -> Self {
        self.backends = backends;
        self
    }

    /// Solver limits for these settings.
    pub fn limits(&self) -> SolveLimits {
        SolveLimits {
            time_limit: self.time_limit_ms.map(Duration::from_millis),
            node_limit: self.node_limit,
        }
    }
}

/// Settings for both paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveConfig {
    /// NEH settings.
    pub heuristic: HeuristicConfig,
    /// Exact-path settings.
    pub exact: ExactConfig,
}

impl SolveConfig {
    /// Replaces the heuristic settings.
    pub fn with_heuristic(mut self, heuristic: HeuristicConfig) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Replaces the exact-path settings.
    pub fn with_exact(mut self, exact: ExactConfig) -> Self {
        self.exact = exact;
        self
    }
}
