//! NEH constructive heuristic.
//!
//! # Algorithm
//!
//! 1. Order jobs by a dispatching rule (LPT by default: descending total
//!    processing time, ties in input order).
//! 2. Start the partial sequence with the first job.
//! 3. For each remaining job, try every insertion position of the current
//!    partial sequence and keep the first position with the smallest
//!    makespan.
//! 4. Stop when every job is placed.
//!
//! Single pass, no backtracking, deterministic.
//!
//! # Complexity
//! O(n) rounds * O(n) positions * O(n * m) evaluation = O(n^3 * m).
//!
//! # Reference
//! Nawaz, Enscore & Ham (1983), "A heuristic algorithm for the m-machine,
//! n-job flow-shop sequencing problem", Omega 11(1)

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::evaluator::MakespanEvaluator;
use crate::dispatching::{rules, sort_jobs, DispatchingRule};
use crate::models::{ProblemData, Sequence};

/// Output of one NEH run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NehResult {
    /// Final job order.
    pub sequence: Sequence,
    /// Permutation-flow-shop makespan of `sequence`.
    pub makespan: i64,
    /// Wall-clock construction time. Diagnostic only.
    pub elapsed: Duration,
    /// Number of candidate orders evaluated.
    pub evaluations: usize,
}

/// NEH sequence constructor.
///
/// # Example
///
/// ```
/// use u_flowshop::models::ProblemData;
/// use u_flowshop::scheduler::NehConstructor;
///
/// let problem = ProblemData::reference();
/// let result = NehConstructor::new().construct(&problem);
/// assert_eq!(result.sequence.job_ids(&problem), ["J4", "J1", "J2", "J3", "J5"]);
/// assert_eq!(result.makespan, 55);
/// ```
#[derive(Debug, Clone)]
pub struct NehConstructor {
    rule: Arc<dyn DispatchingRule>,
}

impl NehConstructor {
    /// Creates a constructor using the LPT initial order.
    pub fn new() -> Self {
        Self {
            rule: Arc::new(rules::Lpt),
        }
    }

    /// Replaces the initial ordering rule.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rule = Arc::new(rule);
        self
    }

    /// Replaces the initial ordering rule with a boxed rule.
    pub fn with_boxed_rule(mut self, rule: Box<dyn DispatchingRule>) -> Self {
        self.rule = Arc::from(rule);
        self
    }

    /// Name of the initial ordering rule.
    pub fn rule_name(&self) -> &'static str {
        self.rule.name()
    }

    /// Job indices in the order insertion considers them.
    pub fn initial_order(&self, problem: &ProblemData) -> Vec<usize> {
        sort_jobs(self.rule.as_ref(), problem)
    }

    /// Builds a sequence for `problem`.
    pub fn construct(&self, problem: &ProblemData) -> NehResult {
        let start = Instant::now();

        if problem.is_reentrant() {
            warn!(
                stages = problem.stage_count(),
                machines = problem.machine_count(),
                "NEH evaluates stages as independent machines; shared machines are not serialized"
            );
        }

        let evaluator = MakespanEvaluator::new(problem);
        let order = self.initial_order(problem);
        let mut evaluations = 0usize;

        let mut partial: Vec<usize> = Vec::with_capacity(order.len());
        let mut best_makespan = 0;
        if let Some((&first, rest)) = order.split_first() {
            partial.push(first);
            best_makespan = evaluator.makespan(&partial);
            evaluations += 1;

            let mut candidate = Vec::with_capacity(order.len());
            for &job in rest {
                let mut best: Option<(usize, i64)> = None;
                for pos in 0..=partial.len() {
                    candidate.clear();
                    candidate.extend_from_slice(&partial[..pos]);
                    candidate.push(job);
                    candidate.extend_from_slice(&partial[pos..]);

                    let cmax = evaluator.makespan(&candidate);
                    evaluations += 1;
                    if best.map_or(true, |(_, b)| cmax < b) {
                        best = Some((pos, cmax));
                    }
                }

                if let Some((pos, cmax)) = best {
                    partial.insert(pos, job);
                    best_makespan = cmax;
                    debug!(
                        job = problem.job_id(job),
                        position = pos,
                        makespan = cmax,
                        "NEH insertion"
                    );
                }
            }
        }

        NehResult {
            sequence: Sequence::from_permutation(partial),
            makespan: best_makespan,
            elapsed: start.elapsed(),
            evaluations,
        }
    }
}

impl Default for NehConstructor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, ProblemInput};

    fn toy() -> ProblemData {
        ProblemInput::new()
            .with_stages(["M1", "M2"])
            .with_job(Job::new("A", vec![3, 2]))
            .with_job(Job::new("B", vec![2, 3]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_toy_selects_b_then_a() {
        let p = toy();
        let result = NehConstructor::new().construct(&p);
        assert_eq!(result.sequence.job_ids(&p), vec!["B", "A"]);
        assert_eq!(result.makespan, 7);
        // 1 seed evaluation + 2 insertion positions
        assert_eq!(result.evaluations, 3);
    }

    #[test]
    fn test_reference_sequence() {
        let p = ProblemData::reference();
        let result = NehConstructor::new().construct(&p);
        assert_eq!(
            result.sequence.job_ids(&p),
            vec!["J4", "J1", "J2", "J3", "J5"]
        );
        assert_eq!(result.makespan, 55);
    }

    #[test]
    fn test_deterministic() {
        let p = ProblemData::random(12, 6, 3).unwrap();
        let neh = NehConstructor::new();
        let first = neh.construct(&p);
        for _ in 0..3 {
            let again = neh.construct(&p);
            assert_eq!(again.sequence, first.sequence);
            assert_eq!(again.makespan, first.makespan);
        }
    }

    #[test]
    fn test_not_worse_than_sorted_append() {
        let neh = NehConstructor::new();
        for seed in 0..5 {
            let p = ProblemData::random(10, 5, seed).unwrap();
            let evaluator = MakespanEvaluator::new(&p);
            let sorted = neh.initial_order(&p);
            let result = neh.construct(&p);
            assert!(result.makespan <= evaluator.makespan(&sorted));
        }

        let p = ProblemData::reference();
        let sorted_makespan = MakespanEvaluator::new(&p).makespan(&neh.initial_order(&p));
        assert_eq!(sorted_makespan, 58);
        assert!(neh.construct(&p).makespan <= sorted_makespan);
    }

    #[test]
    fn test_makespan_matches_sequence() {
        let p = ProblemData::random(9, 4, 21).unwrap();
        let result = NehConstructor::new().construct(&p);
        let evaluator = MakespanEvaluator::new(&p);
        assert_eq!(evaluator.makespan(result.sequence.as_slice()), result.makespan);
        assert!(Sequence::new(&p, result.sequence.as_slice().to_vec()).is_ok());
    }

    #[test]
    fn test_single_job() {
        let p = ProblemInput::new()
            .with_stages(["M1", "M2", "M3"])
            .with_job(Job::new("only", vec![1, 2, 3]))
            .build()
            .unwrap();
        let result = NehConstructor::new().construct(&p);
        assert_eq!(result.sequence.as_slice(), &[0]);
        assert_eq!(result.makespan, 6);
    }

    #[test]
    fn test_ties_keep_first_position() {
        // Identical jobs: every insertion position ties, so the new job
        // always goes to the front.
        let p = ProblemInput::new()
            .with_stages(["M1", "M2"])
            .with_job(Job::new("X", vec![2, 2]))
            .with_job(Job::new("Y", vec![2, 2]))
            .with_job(Job::new("Z", vec![2, 2]))
            .build()
            .unwrap();
        let result = NehConstructor::new().construct(&p);
        assert_eq!(result.sequence.job_ids(&p), vec!["Z", "Y", "X"]);
        assert_eq!(result.makespan, 8);
    }

    #[test]
    fn test_custom_rule() {
        let p = ProblemData::reference();
        let neh = NehConstructor::new().with_rule(rules::Spt);
        assert_eq!(neh.rule_name(), "SPT");
        assert_eq!(neh.initial_order(&p)[0], 3);
        let result = neh.construct(&p);
        assert_eq!(result.sequence.len(), 5);
    }
}
