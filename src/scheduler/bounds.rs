//! Makespan lower bounds.
//!
//! Two classic bounds hold for any feasible schedule:
//! - a job cannot finish before all its stages ran back to back
//! - a resource cannot finish before all work assigned to it ran back to back
//!
//! The resource differs between the two problem classes in this crate. The
//! permutation evaluator treats each stage as its own resource, so only the
//! stage load bounds it. The disjunctive model serializes every operation on
//! a physical machine, so the machine load bounds it as well.

use serde::{Deserialize, Serialize};

use crate::models::ProblemData;

/// Lower bounds on the makespan of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowerBounds {
    /// Largest total processing time of a single job.
    pub max_job_length: i64,
    /// Largest total work of a single stage.
    pub max_stage_load: i64,
    /// Largest total work of a single physical machine.
    pub max_machine_load: i64,
}

impl LowerBounds {
    /// Computes all bounds in O(n * m).
    pub fn compute(problem: &ProblemData) -> Self {
        let max_job_length = (0..problem.job_count())
            .map(|j| problem.total_duration(j))
            .max()
            .unwrap_or(0);

        let mut stage_load = vec![0i64; problem.stage_count()];
        let mut machine_load = vec![0i64; problem.machine_count()];
        for j in 0..problem.job_count() {
            for (k, &d) in problem.durations(j).iter().enumerate() {
                stage_load[k] += d;
                machine_load[problem.machine_of_stage(k)] += d;
            }
        }

        Self {
            max_job_length,
            max_stage_load: stage_load.into_iter().max().unwrap_or(0),
            max_machine_load: machine_load.into_iter().max().unwrap_or(0),
        }
    }

    /// Bound valid for the permutation evaluator.
    pub fn flow_shop(&self) -> i64 {
        self.max_job_length.max(self.max_stage_load)
    }

    /// Bound valid for the disjunctive (machine-exclusive) model.
    pub fn disjunctive(&self) -> i64 {
        self.max_job_length.max(self.max_machine_load)
    }
}
