//! Permutation flow-shop makespan evaluation.
//!
//! # Algorithm
//!
//! For job order `seq` and stages `0..m`:
//!
//! ```text
//! C[i][k] = max(C[i-1][k], C[i][k-1]) + p(seq[i], k)
//! ```
//!
//! with out-of-range predecessors taken as zero. The recurrence assumes
//! every stage is its own machine visited in one shared job order, so
//! stages that share a physical machine are not serialized against each
//! other.
//!
//! # Complexity
//! O(n * m) where n=jobs in the order, m=stages.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 6.1: Flow Shops with Unlimited
//! Intermediate Storage

use serde::{Deserialize, Serialize};

use crate::models::{CompletionMatrix, ProblemData};

/// Result of evaluating one job order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Completion time of the last job at the last stage.
    pub makespan: i64,
    /// Completion time of every position at every stage.
    pub completion: CompletionMatrix,
}

/// Scores job orders by permutation-flow-shop makespan.
///
/// Accepts full or partial orders (any slice of job indices), which is what
/// insertion heuristics evaluate.
#[derive(Debug, Clone, Copy)]
pub struct MakespanEvaluator<'a> {
    problem: &'a ProblemData,
}

impl<'a> MakespanEvaluator<'a> {
    /// Creates an evaluator for `problem`.
    pub fn new(problem: &'a ProblemData) -> Self {
        Self { problem }
    }

    /// Computes the full completion matrix and makespan of `jobs`.
    ///
    /// An empty order has makespan 0 and an empty matrix.
    pub fn evaluate(&self, jobs: &[usize]) -> Evaluation {
        let m = self.problem.stage_count();
        let mut completion = CompletionMatrix::zeros(jobs.len(), m);

        for (i, &j) in jobs.iter().enumerate() {
            for k in 0..m {
                let above = if i > 0 { completion.get(i - 1, k) } else { 0 };
                let left = if k > 0 { completion.get(i, k - 1) } else { 0 };
                completion.set(i, k, above.max(left) + self.problem.duration(j, k));
            }
        }

        Evaluation {
            makespan: completion.makespan(),
            completion,
        }
    }

    /// Makespan of `jobs` without materializing the matrix.
    ///
    /// Keeps a single row of completion times, updated in place.
    pub fn makespan(&self, jobs: &[usize]) -> i64 {
        let m = self.problem.stage_count();
        let mut row = vec![0i64; m];

        for &j in jobs {
            let mut left = 0;
            for (k, c) in row.iter_mut().enumerate() {
                left = (*c).max(left) + self.problem.duration(j, k);
                *c = left;
            }
        }

        if jobs.is_empty() {
            0
        } else {
            row[m - 1]
        }
    }
}
