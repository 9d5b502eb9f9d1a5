//! Built-in job ordering rules.
//!
//! # Score Convention
//! All rules return lower scores for higher priority jobs.

use super::{DispatchingRule, RuleScore};
use crate::models::ProblemData;

/// Longest Processing Time.
///
/// Prioritizes jobs with the largest total work across all stages. This is
/// the ordering NEH uses: big jobs are placed while the partial sequence is
/// still short and flexible.
///
/// # Reference
/// Nawaz, Enscore & Ham (1983)
#[derive(Debug, Clone, Copy)]
pub struct Lpt;

impl DispatchingRule for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn evaluate(&self, problem: &ProblemData, job: usize) -> RuleScore {
        -(problem.total_duration(job) as f64)
    }

    fn description(&self) -> &'static str {
        "Longest Processing Time"
    }
}

/// Shortest Processing Time.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, problem: &ProblemData, job: usize) -> RuleScore {
        problem.total_duration(job) as f64
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Keeps jobs in input order.
#[derive(Debug, Clone, Copy)]
pub struct InputOrder;

impl DispatchingRule for InputOrder {
    fn name(&self) -> &'static str {
        "INPUT"
    }

    fn evaluate(&self, _problem: &ProblemData, job: usize) -> RuleScore {
        job as f64
    }

    fn description(&self) -> &'static str {
        "Input Order"
    }
}
