//! Built-in exact backend: branch and bound over active schedules.
//!
//! # Algorithm
//!
//! Depth-first Giffler–Thompson enumeration. At each node:
//!
//! 1. The eligible operations are each job's next unscheduled stage, with
//!    earliest start `est = max(job ready, machine ready)`.
//! 2. `o*` minimizes `est + p`; its completion `C*` defines the conflict
//!    set: eligible operations on the same machine that could start before
//!    `C*`.
//! 3. One child per conflict operation, scheduled at its `est`, explored in
//!    `(est, job, stage)` order.
//!
//! Every active schedule is reachable, and an optimal schedule is active,
//! so exhausting the tree proves optimality.
//!
//! # Bounding
//!
//! A node is pruned when its lower bound reaches the incumbent. The bound
//! is the larger of
//! - per job: ready time + remaining work
//! - per machine: max(machine ready, earliest head of a remaining
//!   operation) + remaining load
//!
//! # Reference
//! - Giffler & Thompson (1960), "Algorithms for solving production
//!   scheduling problems"
//! - Brucker, Jurisch & Sievers (1994), "A branch and bound algorithm for
//!   the job-shop scheduling problem"

use std::time::Instant;

use tracing::{debug, info};

use super::{SolveLimits, SolveStatus, SolverAdapter, SolverOutput};
use crate::disjunctive::DisjunctiveModel;
use crate::error::Result;

/// Exact backend that needs no external solver.
///
/// Suited to small and medium instances; the search tree grows
/// exponentially with the number of operations per machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisjunctiveBranchAndBound;

impl DisjunctiveBranchAndBound {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

impl SolverAdapter for DisjunctiveBranchAndBound {
    fn name(&self) -> &'static str {
        "branch-and-bound"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn solve(&self, model: &DisjunctiveModel, limits: &SolveLimits) -> Result<SolverOutput> {
        let start = Instant::now();
        debug!(
            operations = model.operations().len(),
            pairs = model.pairs().len(),
            "branch and bound started"
        );

        let mut search = Search::new(model, limits, start);
        let root_bound = search.lower_bound();
        search.explore();

        let nodes = search.nodes;
        let aborted = search.aborted;
        let incumbent = search.incumbent;
        let elapsed = start.elapsed();

        let output = match incumbent {
            Some((cmax, starts)) => {
                let status = if aborted {
                    SolveStatus::Timeout
                } else {
                    SolveStatus::Optimal
                };
                let best_bound = if aborted { root_bound.min(cmax) } else { cmax };
                SolverOutput {
                    status,
                    values: Some(assignment(model, &starts, cmax)),
                    objective: Some(cmax as f64),
                    best_bound: Some(best_bound as f64),
                    nodes,
                    elapsed,
                    message: if aborted {
                        "search limit reached".to_string()
                    } else {
                        "search tree exhausted".to_string()
                    },
                }
            }
            None => SolverOutput {
                best_bound: Some(root_bound as f64),
                nodes,
                elapsed,
                ..SolverOutput::without_solution(
                    SolveStatus::Timeout,
                    "search limit reached before the first schedule",
                )
            },
        };

        info!(
            status = %output.status,
            objective = ?output.objective,
            nodes,
            elapsed_ms = elapsed.as_millis() as u64,
            "branch and bound finished"
        );
        Ok(output)
    }
}

/// Full variable assignment for a schedule given by operation start times.
fn assignment(model: &DisjunctiveModel, starts: &[i64], cmax: i64) -> Vec<f64> {
    let mut values = vec![0.0; model.variable_count()];
    for (op, &s) in model.operations().iter().zip(starts) {
        values[op.start.0] = s as f64;
    }
    values[model.cmax().0] = cmax as f64;

    let ops = model.operations();
    for pair in model.pairs() {
        let first_end = starts[pair.first] + ops[pair.first].duration;
        values[pair.selector.0] = if first_end <= starts[pair.second] {
            1.0
        } else {
            0.0
        };
    }
    values
}

/// Mutable search state; scheduling an operation is undone on backtrack.
struct Search<'a> {
    model: &'a DisjunctiveModel,
    stages: usize,
    /// `suffix[j * (m + 1) + k]` = work of job `j` from stage `k` on.
    suffix: Vec<i64>,
    next_stage: Vec<usize>,
    job_ready: Vec<i64>,
    machine_ready: Vec<i64>,
    machine_remaining: Vec<i64>,
    starts: Vec<i64>,
    scheduled: usize,
    incumbent: Option<(i64, Vec<i64>)>,
    nodes: u64,
    node_limit: Option<u64>,
    deadline: Option<Instant>,
    aborted: bool,
}

impl<'a> Search<'a> {
    fn new(model: &'a DisjunctiveModel, limits: &SolveLimits, start: Instant) -> Self {
        let n = model.job_count();
        let m = model.stage_count();

        let mut suffix = vec![0; n * (m + 1)];
        for j in 0..n {
            for k in (0..m).rev() {
                let d = model.operations()[model.operation_index(j, k)].duration;
                suffix[j * (m + 1) + k] = suffix[j * (m + 1) + k + 1] + d;
            }
        }

        let mut machine_remaining = vec![0; model.machine_count()];
        for op in model.operations() {
            machine_remaining[op.machine] += op.duration;
        }

        Self {
            model,
            stages: m,
            suffix,
            next_stage: vec![0; n],
            job_ready: vec![0; n],
            machine_ready: vec![0; model.machine_count()],
            machine_remaining,
            starts: vec![0; model.operations().len()],
            scheduled: 0,
            incumbent: None,
            nodes: 0,
            node_limit: limits.node_limit,
            deadline: limits.time_limit.map(|limit| start + limit),
            aborted: false,
        }
    }

    #[inline]
    fn remaining_work(&self, job: usize, stage: usize) -> i64 {
        self.suffix[job * (self.stages + 1) + stage]
    }

    fn out_of_budget(&self) -> bool {
        if self.node_limit.is_some_and(|limit| self.nodes > limit) {
            return true;
        }
        // Clock reads are comparatively costly; sample them.
        self.nodes % 256 == 0 && self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn lower_bound(&self) -> i64 {
        let n = self.next_stage.len();
        let m = self.stages;
        let mut bound = 0;

        for j in 0..n {
            bound = bound.max(self.job_ready[j] + self.remaining_work(j, self.next_stage[j]));
        }

        for machine in 0..self.machine_ready.len() {
            let load = self.machine_remaining[machine];
            let mut head = i64::MAX;
            for j in 0..n {
                let next = self.next_stage[j];
                for k in next..m {
                    let op = &self.model.operations()[self.model.operation_index(j, k)];
                    if op.machine == machine {
                        let h = self.job_ready[j] + self.remaining_work(j, next)
                            - self.remaining_work(j, k);
                        head = head.min(h);
                        break;
                    }
                }
            }
            let ready = self.machine_ready[machine];
            bound = bound.max(if head == i64::MAX {
                ready
            } else {
                ready.max(head) + load
            });
        }

        bound
    }

    fn explore(&mut self) {
        self.nodes += 1;
        if self.out_of_budget() {
            self.aborted = true;
            return;
        }

        let total = self.starts.len();
        if self.scheduled == total {
            let cmax = self.job_ready.iter().copied().max().unwrap_or(0);
            if self.incumbent.as_ref().map_or(true, |(best, _)| cmax < *best) {
                debug!(makespan = cmax, nodes = self.nodes, "new incumbent");
                self.incumbent = Some((cmax, self.starts.clone()));
            }
            return;
        }

        if let Some((best, _)) = &self.incumbent {
            if self.lower_bound() >= *best {
                return;
            }
        }

        for (op, est) in self.conflict_set() {
            self.schedule(op, est);
            self.explore();
            self.unschedule(op);
            if self.aborted {
                return;
            }
        }
    }

    /// Children of the current node as `(operation, start)`, in visiting
    /// order.
    fn conflict_set(&self) -> Vec<(usize, i64)> {
        let ops = self.model.operations();
        let eligible: Vec<(usize, i64)> = (0..self.next_stage.len())
            .filter(|&j| self.next_stage[j] < self.stages)
            .map(|j| {
                let op = self.model.operation_index(j, self.next_stage[j]);
                let est = self.job_ready[j].max(self.machine_ready[ops[op].machine]);
                (op, est)
            })
            .collect();

        let Some(&(pivot, pivot_est)) = eligible
            .iter()
            .min_by_key(|&&(op, est)| (est + ops[op].duration, op))
        else {
            return Vec::new();
        };
        let machine = ops[pivot].machine;
        let completion = pivot_est + ops[pivot].duration;

        let mut conflict: Vec<(usize, i64)> = eligible
            .into_iter()
            .filter(|&(op, est)| ops[op].machine == machine && (est < completion || op == pivot))
            .collect();
        // Operation index is job-major, so it orders ties by (job, stage).
        conflict.sort_by_key(|&(op, est)| (est, op));
        conflict
    }

    fn schedule(&mut self, op: usize, start: i64) {
        let model = self.model;
        let o = &model.operations()[op];
        let end = start + o.duration;
        self.starts[op] = start;
        self.next_stage[o.job] += 1;
        self.job_ready[o.job] = end;
        self.machine_ready[o.machine] = end;
        self.machine_remaining[o.machine] -= o.duration;
        self.scheduled += 1;
    }

    fn unschedule(&mut self, op: usize) {
        let model = self.model;
        let o = &model.operations()[op];
        self.next_stage[o.job] -= 1;
        self.scheduled -= 1;
        self.machine_remaining[o.machine] += o.duration;
        self.job_ready[o.job] = if o.stage == 0 {
            0
        } else {
            let prev = op - 1;
            self.starts[prev] + model.operations()[prev].duration
        };
        self.machine_ready[o.machine] = self.machine_release(o.machine);
    }

    /// Latest completion among operations already scheduled on `machine`.
    fn machine_release(&self, machine: usize) -> i64 {
        let ops = self.model.operations();
        (0..self.next_stage.len())
            .flat_map(|j| (0..self.next_stage[j]).map(move |k| (j, k)))
            .map(|(j, k)| self.model.operation_index(j, k))
            .filter(|&op| ops[op].machine == machine)
            .map(|op| self.starts[op] + ops[op].duration)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disjunctive::DisjunctiveModelBuilder;
    use crate::models::{Job, ProblemData, ProblemInput};
    use crate::scheduler::NehConstructor;
    use crate::validation::validate_schedule;
    use std::time::Duration;

    fn solve(problem: &ProblemData, limits: SolveLimits) -> (DisjunctiveModel, SolverOutput) {
        let model = DisjunctiveModelBuilder::new(problem).build();
        let out = DisjunctiveBranchAndBound::new()
            .solve(&model, &limits)
            .unwrap();
        (model, out)
    }

    #[test]
    fn test_toy_optimum() {
        let problem = ProblemInput::new()
            .with_stages(["M1", "M2"])
            .with_job(Job::new("A", vec![3, 2]))
            .with_job(Job::new("B", vec![2, 3]))
            .build()
            .unwrap();
        let (model, out) = solve(&problem, SolveLimits::unlimited());
        assert_eq!(out.status, SolveStatus::Optimal);
        assert_eq!(out.objective, Some(7.0));
        assert_eq!(out.best_bound, Some(7.0));
        let values = out.values.unwrap();
        assert!(model.violations(&values, 1e-9).is_empty());
    }

    #[test]
    fn test_reference_optimum() {
        let problem = ProblemData::reference();
        let (model, out) = solve(&problem, SolveLimits::unlimited());
        assert_eq!(out.status, SolveStatus::Optimal);
        assert_eq!(out.objective, Some(55.0));
        assert!(out.nodes > 0);

        let values = out.values.unwrap();
        assert!(model.violations(&values, 1e-6).is_empty());

        let schedule = model.decode_schedule(&values);
        assert_eq!(schedule.makespan(), 55);
        assert!(validate_schedule(&problem, &schedule).is_empty());

        let neh = NehConstructor::new().construct(&problem);
        assert!(out.objective.unwrap() <= neh.makespan as f64);
    }

    #[test]
    fn test_selectors_are_consistent() {
        let problem = ProblemData::reference();
        let (model, out) = solve(&problem, SolveLimits::unlimited());
        let values = out.values.unwrap();
        for (i, pair) in model.pairs().iter().enumerate() {
            let y = values[pair.selector.0];
            assert!(y == 0.0 || y == 1.0);
            let (s1, s2) = (
                model.start_time(&values, pair.first),
                model.start_time(&values, pair.second),
            );
            let ops = model.operations();
            if model.first_precedes(&values, i) {
                assert!(s1 + ops[pair.first].duration as f64 <= s2);
            } else {
                assert!(s2 + ops[pair.second].duration as f64 <= s1);
            }
        }
    }

    #[test]
    fn test_node_limit_keeps_incumbent() {
        let problem = ProblemData::reference();
        // Enough for the first dive (root + 25 operations), not for a proof.
        let (model, out) = solve(&problem, SolveLimits::unlimited().with_node_limit(30));
        assert_eq!(out.status, SolveStatus::Timeout);
        let objective = out.objective.unwrap();
        assert!(objective >= 55.0);
        assert!(out.best_bound.unwrap() <= 55.0);
        assert!(model.violations(&out.values.unwrap(), 1e-6).is_empty());
    }

    #[test]
    fn test_node_limit_before_first_schedule() {
        let problem = ProblemData::reference();
        let (_, out) = solve(&problem, SolveLimits::unlimited().with_node_limit(3));
        assert_eq!(out.status, SolveStatus::Timeout);
        assert!(out.values.is_none());
        assert!(out.best_bound.is_some());
    }

    #[test]
    fn test_time_limit_keeps_incumbent() {
        let problem = ProblemData::random(15, 8, 1).unwrap();
        let limits = SolveLimits::unlimited().with_time_limit(Duration::from_millis(50));
        let (model, out) = solve(&problem, limits);
        assert_eq!(out.status, SolveStatus::Timeout);
        let objective = out.objective.unwrap();
        assert!(out.best_bound.unwrap() <= objective);
        assert!(model.violations(&out.values.unwrap(), 1e-6).is_empty());
    }

    #[test]
    fn test_flow_shop_not_worse_than_neh() {
        for seed in 0..3 {
            let problem = ProblemData::random(5, 3, seed).unwrap();
            let (model, out) = solve(&problem, SolveLimits::unlimited());
            assert_eq!(out.status, SolveStatus::Optimal);
            let neh = NehConstructor::new().construct(&problem);
            assert!(out.objective.unwrap() <= neh.makespan as f64);
            assert!(model.violations(&out.values.unwrap(), 1e-6).is_empty());
        }
    }

    #[test]
    fn test_single_job_revisiting_machine() {
        let problem = ProblemInput::new()
            .with_stages(["M1", "M2", "M1"])
            .with_job(Job::new("A", vec![2, 3, 4]))
            .build()
            .unwrap();
        let (_, out) = solve(&problem, SolveLimits::unlimited());
        assert_eq!(out.status, SolveStatus::Optimal);
        assert_eq!(out.objective, Some(9.0));
    }

    #[test]
    fn test_zero_durations() {
        let problem = ProblemInput::new()
            .with_stages(["M1", "M2"])
            .with_job(Job::new("A", vec![0, 4]))
            .with_job(Job::new("B", vec![3, 0]))
            .build()
            .unwrap();
        let (model, out) = solve(&problem, SolveLimits::unlimited());
        assert_eq!(out.status, SolveStatus::Optimal);
        assert_eq!(out.objective, Some(4.0));
        assert!(model.violations(&out.values.unwrap(), 1e-9).is_empty());
    }
}
