//! Backend selection.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{DisjunctiveBranchAndBound, HighsAdapter, SolverAdapter};
use crate::error::{Error, Result};

/// Known solver backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// HiGHS MIP solver (feature `milp`).
    Highs,
    /// Built-in disjunctive branch and bound.
    BranchAndBound,
}

impl BackendKind {
    /// Default probing order: the MIP solver first, the built-in search as
    /// fallback.
    pub const DEFAULT_ORDER: [BackendKind; 2] = [BackendKind::Highs, BackendKind::BranchAndBound];

    /// Instantiates the adapter.
    pub fn adapter(self) -> Box<dyn SolverAdapter> {
        match self {
            Self::Highs => Box::new(HighsAdapter::new()),
            Self::BranchAndBound => Box::new(DisjunctiveBranchAndBound::new()),
        }
    }

    /// How to make this backend available.
    pub fn remediation(self) -> &'static str {
        match self {
            Self::Highs => "highs: rebuild with `--features milp` (needs a C++ toolchain and cmake)",
            Self::BranchAndBound => "branch_and_bound: always built in",
        }
    }
}

/// Returns the first available backend in `candidates`.
///
/// # Errors
/// [`Error::BackendUnavailable`] when no candidate is available (or the list
/// is empty), naming every candidate tried and how to enable it.
pub fn select_backend(candidates: &[BackendKind]) -> Result<Box<dyn SolverAdapter>> {
    let mut attempted = Vec::with_capacity(candidates.len());
    for &kind in candidates {
        let adapter = kind.adapter();
        attempted.push(adapter.name());
        if adapter.is_available() {
            info!(backend = adapter.name(), "selected solver backend");
            return Ok(adapter);
        }
        debug!(backend = adapter.name(), "solver backend unavailable");
    }

    let remediation = candidates
        .iter()
        .map(|k| k.remediation())
        .collect::<Vec<_>>()
        .join("\n");
    Err(Error::BackendUnavailable {
        attempted: if attempted.is_empty() {
            "none".to_string()
        } else {
            attempted.join(", ")
        },
        remediation,
    })
}
