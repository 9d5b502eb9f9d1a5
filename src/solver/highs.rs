//! MIP backend: HiGHS through `good_lp`.
//!
//! Compiled in with the `milp` cargo feature. Without it the adapter still
//! exists, reports itself unavailable, and answers every solve with
//! [`SolveStatus::Unavailable`].

use std::time::Instant;

use tracing::{info, warn};

use super::{SolveLimits, SolveStatus, SolverAdapter, SolverOutput};
use crate::disjunctive::DisjunctiveModel;
use crate::error::Result;

#[cfg(feature = "milp")]
use crate::disjunctive::{Sense, VarKind};
#[cfg(feature = "milp")]
use crate::error::Error;
#[cfg(feature = "milp")]
use good_lp::{
    constraint, solvers::highs::highs, variable, Expression, ProblemVariables, ResolutionError,
    Solution, SolutionStatus, SolverModel,
};

/// Feasibility tolerance used to vet solutions read back from HiGHS.
#[cfg(feature = "milp")]
const TOLERANCE: f64 = 1e-6;

/// HiGHS MIP adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsAdapter;

impl HighsAdapter {
    /// Creates the adapter.
    pub fn new() -> Self {
        Self
    }
}

impl SolverAdapter for HighsAdapter {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "milp")
    }

    #[cfg(feature = "milp")]
    fn solve(&self, model: &DisjunctiveModel, limits: &SolveLimits) -> Result<SolverOutput> {
        let start = Instant::now();

        let mut vars = ProblemVariables::new();
        let handles: Vec<good_lp::Variable> = model
            .variables()
            .iter()
            .map(|v| {
                let def = match v.kind {
                    VarKind::Binary => variable().binary(),
                    VarKind::Continuous => {
                        let def = variable().min(v.lower);
                        match v.upper {
                            Some(upper) => def.max(upper),
                            None => def,
                        }
                    }
                };
                vars.add(def.name(v.name.clone()))
            })
            .collect();

        let mut problem = vars.minimise(handles[model.cmax().0]).using(highs);
        if let Some(limit) = limits.time_limit {
            problem = problem.set_time_limit(limit.as_secs_f64());
        }
        if let Some(nodes) = limits.node_limit {
            problem = problem.set_option("mip_max_nodes", i32::try_from(nodes).unwrap_or(i32::MAX));
        }

        for row in model.linear_constraints() {
            let lhs = row
                .terms
                .iter()
                .fold(Expression::with_capacity(row.terms.len()), |acc, &(v, c)| {
                    acc + c * handles[v.0]
                });
            let rhs = row.rhs;
            problem = match row.sense {
                Sense::LessEqual => problem.with(constraint!(lhs <= rhs)),
                Sense::GreaterEqual => problem.with(constraint!(lhs >= rhs)),
            };
        }

        info!(
            variables = model.variable_count(),
            binaries = model.binary_count(),
            constraints = model.constraint_count(),
            "solving disjunctive model with HiGHS"
        );

        let result = problem.solve();
        let elapsed = start.elapsed();

        let output = match result {
            Ok(solution) => {
                let values: Vec<f64> = handles.iter().map(|&h| solution.value(h)).collect();
                if model.violations(&values, TOLERANCE).is_empty() {
                    let status = solve_status(solution.status());
                    let objective = model.objective_value(&values);
                    SolverOutput {
                        status,
                        values: Some(values),
                        objective: Some(objective),
                        // good_lp exposes no dual bound for a stopped MIP
                        best_bound: (status == SolveStatus::Optimal).then_some(objective),
                        nodes: 0,
                        elapsed,
                        message: String::new(),
                    }
                } else {
                    warn!("HiGHS returned an assignment that violates the model");
                    SolverOutput {
                        elapsed,
                        ..SolverOutput::without_solution(
                            SolveStatus::Timeout,
                            "no feasible incumbent within the limits",
                        )
                    }
                }
            }
            Err(e) => SolverOutput {
                elapsed,
                ..unsolved_output(e)?
            },
        };

        info!(
            status = %output.status,
            objective = ?output.objective,
            elapsed_ms = elapsed.as_millis() as u64,
            "HiGHS finished"
        );
        Ok(output)
    }

    #[cfg(not(feature = "milp"))]
    fn solve(&self, _model: &DisjunctiveModel, _limits: &SolveLimits) -> Result<SolverOutput> {
        let start = Instant::now();
        warn!("HiGHS backend not available (compile with 'milp' feature)");
        info!(status = %SolveStatus::Unavailable, "HiGHS skipped");
        Ok(SolverOutput {
            elapsed: start.elapsed(),
            ..SolverOutput::without_solution(
                SolveStatus::Unavailable,
                "built without the 'milp' feature",
            )
        })
    }
}

/// Maps the termination status HiGHS reports alongside a primal solution.
#[cfg(feature = "milp")]
fn solve_status(status: SolutionStatus) -> SolveStatus {
    match status {
        SolutionStatus::Optimal => SolveStatus::Optimal,
        SolutionStatus::TimeLimit => SolveStatus::Timeout,
        SolutionStatus::GapLimit => SolveStatus::Feasible,
    }
}

/// Maps a solve that produced no primal solution.
///
/// HiGHS stopping on a limit before any incumbent surfaces as
/// `Other("NoSolutionFound")`; that is a timeout, not a backend failure.
#[cfg(feature = "milp")]
fn unsolved_output(err: ResolutionError) -> Result<SolverOutput> {
    match err {
        ResolutionError::Infeasible => Ok(SolverOutput::without_solution(
            SolveStatus::Infeasible,
            "model is infeasible",
        )),
        ResolutionError::Unbounded => Ok(SolverOutput::without_solution(
            SolveStatus::Unbounded,
            "model is unbounded",
        )),
        ResolutionError::Other("NoSolutionFound") => Ok(SolverOutput::without_solution(
            SolveStatus::Timeout,
            "no feasible incumbent within the limits",
        )),
        e => Err(Error::Backend {
            backend: "highs",
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disjunctive::DisjunctiveModelBuilder;
    use crate::models::ProblemData;

    #[test]
    fn test_availability_follows_feature() {
        assert_eq!(HighsAdapter::new().is_available(), cfg!(feature = "milp"));
        assert_eq!(HighsAdapter::new().name(), "highs");
    }

    #[test]
    #[cfg(not(feature = "milp"))]
    fn test_stub_reports_unavailable() {
        let model = DisjunctiveModelBuilder::new(&ProblemData::reference()).build();
        let out = HighsAdapter::new()
            .solve(&model, &SolveLimits::unlimited())
            .unwrap();
        assert_eq!(out.status, SolveStatus::Unavailable);
        assert!(out.values.is_none());
    }

    #[test]
    #[cfg(feature = "milp")]
    fn test_reference_optimum() {
        let problem = ProblemData::reference();
        let model = DisjunctiveModelBuilder::new(&problem).build();
        let out = HighsAdapter::new()
            .solve(&model, &SolveLimits::unlimited())
            .unwrap();
        assert_eq!(out.status, SolveStatus::Optimal);
        assert!((out.objective.unwrap() - 55.0).abs() < 1e-6);
        let schedule = model.decode_schedule(&out.values.unwrap());
        assert!(crate::validation::validate_schedule(&problem, &schedule).is_empty());
    }

    #[test]
    #[cfg(feature = "milp")]
    fn test_status_mapping() {
        assert_eq!(solve_status(SolutionStatus::Optimal), SolveStatus::Optimal);
        assert_eq!(solve_status(SolutionStatus::TimeLimit), SolveStatus::Timeout);
        assert_eq!(solve_status(SolutionStatus::GapLimit), SolveStatus::Feasible);
    }

    #[test]
    #[cfg(feature = "milp")]
    fn test_no_incumbent_is_timeout() {
        let out = unsolved_output(ResolutionError::Other("NoSolutionFound")).unwrap();
        assert_eq!(out.status, SolveStatus::Timeout);
        assert!(out.values.is_none());
        assert!(out.best_bound.is_none());

        let out = unsolved_output(ResolutionError::Infeasible).unwrap();
        assert_eq!(out.status, SolveStatus::Infeasible);
    }

    #[test]
    #[cfg(feature = "milp")]
    fn test_other_failures_are_backend_errors() {
        let err = unsolved_output(ResolutionError::Str("solver crashed".into())).unwrap_err();
        assert!(matches!(err, Error::Backend { backend: "highs", .. }));
        assert!(unsolved_output(ResolutionError::Other("SolveError")).is_err());
    }

    #[test]
    #[cfg(feature = "milp")]
    fn test_time_limit_keeps_incumbent() {
        let problem = ProblemData::random(15, 8, 1).unwrap();
        let model = DisjunctiveModelBuilder::new(&problem).build();
        let limits = SolveLimits::unlimited().with_time_limit(std::time::Duration::from_millis(50));
        let out = HighsAdapter::new().solve(&model, &limits).unwrap();
        assert!(matches!(
            out.status,
            SolveStatus::Timeout | SolveStatus::Optimal | SolveStatus::Feasible
        ));
        if let Some(values) = &out.values {
            assert!(model.violations(values, TOLERANCE).is_empty());
        }
    }
}
