//! Solver backend contract.
//!
//! The exact path never talks to a specific optimizer. It hands a
//! [`DisjunctiveModel`] and [`SolveLimits`] to a [`SolverAdapter`] and gets
//! back a [`SolverOutput`] with a termination status and, when one exists,
//! a variable assignment.
//!
//! # Backends
//!
//! | Backend | Availability | Method |
//! |---------|--------------|--------|
//! | [`HighsAdapter`] | cargo feature `milp` | MIP via `good_lp` + HiGHS |
//! | [`DisjunctiveBranchAndBound`] | always | Active-schedule branch & bound |
//!
//! [`select_backend`] walks an ordered candidate list and returns the first
//! usable backend.

mod branch_and_bound;
mod highs;
mod select;

pub use branch_and_bound::DisjunctiveBranchAndBound;
pub use highs::HighsAdapter;
pub use select::{select_backend, BackendKind};

use std::fmt::{self, Debug};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::disjunctive::DisjunctiveModel;
use crate::error::Result;

/// Termination status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible solution found, optimality not proven.
    Feasible,
    /// No feasible schedule exists.
    Infeasible,
    /// The objective is unbounded.
    Unbounded,
    /// The budget ran out; carries the best solution found, if any.
    Timeout,
    /// The backend could not run.
    Unavailable,
}

impl SolveStatus {
    /// Whether the output carries a usable assignment for this status.
    pub fn has_solution(self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible | Self::Timeout)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Optimal => "optimal",
            Self::Feasible => "feasible",
            Self::Infeasible => "infeasible",
            Self::Unbounded => "unbounded",
            Self::Timeout => "timeout",
            Self::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

/// Budget for one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveLimits {
    /// Wall-clock limit. `None` = unlimited.
    pub time_limit: Option<Duration>,
    /// Search node / iteration limit. `None` = unlimited.
    pub node_limit: Option<u64>,
}

impl SolveLimits {
    /// No limits.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Sets the wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the node limit.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }
}

/// What a backend returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOutput {
    /// Termination status.
    pub status: SolveStatus,
    /// Assignment indexed by [`VarId`](crate::disjunctive::VarId), if any.
    pub values: Option<Vec<f64>>,
    /// Objective (`Cmax`) of `values`.
    pub objective: Option<f64>,
    /// Best proven lower bound on the objective.
    pub best_bound: Option<f64>,
    /// Search nodes explored (0 if the backend does not report it).
    pub nodes: u64,
    /// Wall-clock solve time.
    pub elapsed: Duration,
    /// Backend-specific note.
    pub message: String,
}

impl SolverOutput {
    /// An output with no solution.
    pub fn without_solution(status: SolveStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            values: None,
            objective: None,
            best_bound: None,
            nodes: 0,
            elapsed: Duration::ZERO,
            message: message.into(),
        }
    }

    /// Relative gap between objective and bound, if both are known.
    pub fn gap(&self) -> Option<f64> {
        match (self.objective, self.best_bound) {
            (Some(obj), Some(bound)) if obj.abs() > 1e-10 => Some((obj - bound).abs() / obj.abs()),
            (Some(_), Some(_)) => Some(0.0),
            _ => None,
        }
    }
}

/// A solver backend.
///
/// Implementations must not mutate shared state: one adapter may serve
/// concurrent solves of independent models.
pub trait SolverAdapter: Send + Sync + Debug {
    /// Backend name (e.g., "highs").
    fn name(&self) -> &'static str;

    /// Whether this backend can run in the current build/environment.
    fn is_available(&self) -> bool;

    /// Solves `model` within `limits`.
    ///
    /// Model outcomes (optimal, infeasible, timeout, ...) are reported
    /// through [`SolverOutput::status`]; `Err` is reserved for backend
    /// failures.
    fn solve(&self, model: &DisjunctiveModel, limits: &SolveLimits) -> Result<SolverOutput>;
}
