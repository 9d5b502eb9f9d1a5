//! Dispatching rules for initial job ordering.
//!
//! NEH starts from a priority order over jobs and then improves it by
//! insertion. The order comes from a [`DispatchingRule`]; the classic
//! choice is LPT (longest total processing time first).
//!
//! # Usage
//!
//! ```
//! use u_flowshop::dispatching::{sort_jobs, rules};
//! use u_flowshop::models::ProblemData;
//!
//! let problem = ProblemData::reference();
//! let order = sort_jobs(&rules::Lpt, &problem);
//! assert_eq!(problem.job_id(order[0]), "J3");
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Nawaz, Enscore & Ham (1983), "A heuristic algorithm for the m-machine,
//!   n-job flow-shop sequencing problem"

pub mod rules;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::models::ProblemData;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (placed first).
pub type RuleScore = f64;

/// A dispatching rule that evaluates job priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for jobs that should be considered first.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "LPT").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of `job`.
    fn evaluate(&self, problem: &ProblemData, job: usize) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Returns job indices sorted by `rule`, best first.
///
/// The sort is stable: jobs with equal scores keep their input order.
pub fn sort_jobs(rule: &dyn DispatchingRule, problem: &ProblemData) -> Vec<usize> {
    let scores: Vec<RuleScore> = (0..problem.job_count())
        .map(|j| rule.evaluate(problem, j))
        .collect();
    let mut indices: Vec<usize> = (0..problem.job_count()).collect();
    indices.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}

/// Serializable rule selector for configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Longest total processing time first.
    #[default]
    Lpt,
    /// Shortest total processing time first.
    Spt,
    /// Input order.
    InputOrder,
}

impl RuleKind {
    /// The rule this kind selects.
    pub fn rule(self) -> Box<dyn DispatchingRule> {
        match self {
            Self::Lpt => Box::new(rules::Lpt),
            Self::Spt => Box::new(rules::Spt),
            Self::InputOrder => Box::new(rules::InputOrder),
        }
    }
}
