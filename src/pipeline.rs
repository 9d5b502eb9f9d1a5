//! End-to-end runs: problem data in, report out.
//!
//! # Example
//!
//! ```
//! use u_flowshop::config::HeuristicConfig;
//! use u_flowshop::models::ProblemData;
//! use u_flowshop::pipeline::run_heuristic;
//!
//! let report = run_heuristic(&ProblemData::reference(), &HeuristicConfig::default());
//! assert_eq!(report.makespan, 55);
//! ```

use std::time::Instant;

use tracing::{info, warn};

use crate::config::{ExactConfig, HeuristicConfig, SolveConfig};
use crate::disjunctive::DisjunctiveModelBuilder;
use crate::error::Result;
use crate::models::ProblemData;
use crate::report::{ExactReport, HeuristicReport};
use crate::solver::{select_backend, SolveLimits, SolverAdapter};
use crate::validation::validate_schedule;

/// Runs NEH and reports the sequence.
pub fn run_heuristic(problem: &ProblemData, config: &HeuristicConfig) -> HeuristicReport {
    let neh = config.constructor();
    let result = neh.construct(problem);
    info!(
        rule = neh.rule_name(),
        makespan = result.makespan,
        evaluations = result.evaluations,
        "NEH finished"
    );
    HeuristicReport {
        rule: neh.rule_name().to_string(),
        sequence: result
            .sequence
            .job_ids(problem)
            .into_iter()
            .map(String::from)
            .collect(),
        makespan: result.makespan,
        elapsed: result.elapsed,
        evaluations: result.evaluations,
    }
}

/// Selects a backend from `config` and solves the disjunctive model.
///
/// # Errors
/// [`Error::BackendUnavailable`](crate::error::Error::BackendUnavailable)
/// before any model is built when no configured backend is usable; backend
/// failures otherwise.
pub fn run_exact(problem: &ProblemData, config: &ExactConfig) -> Result<ExactReport> {
    let backend = select_backend(&config.backends)?;
    run_exact_with(problem, backend.as_ref(), &config.limits())
}

/// Solves the disjunctive model with a given backend.
pub fn run_exact_with(
    problem: &ProblemData,
    backend: &dyn SolverAdapter,
    limits: &SolveLimits,
) -> Result<ExactReport> {
    let start = Instant::now();
    let model = DisjunctiveModelBuilder::new(problem).build();
    info!(
        backend = backend.name(),
        variables = model.variable_count(),
        binaries = model.binary_count(),
        constraints = model.constraint_count(),
        "solving disjunctive model"
    );

    let output = backend.solve(&model, limits)?;

    let schedule = output.values.as_deref().map(|values| {
        let mut schedule = model.decode_schedule(values);
        for violation in validate_schedule(problem, &schedule) {
            schedule.add_violation(violation);
        }
        if !schedule.is_valid() {
            warn!(
                violations = schedule.violations.len(),
                "decoded schedule is not feasible"
            );
        }
        schedule
    });

    let report = ExactReport {
        backend: backend.name().to_string(),
        status: output.status,
        makespan: schedule.as_ref().map(|s| s.makespan()),
        best_bound: output.best_bound,
        gap: output.gap(),
        nodes: output.nodes,
        elapsed: start.elapsed(),
        schedule,
    };
    info!(
        status = %report.status,
        makespan = ?report.makespan,
        gap = ?report.gap,
        "exact run finished"
    );
    Ok(report)
}

/// Runs both paths with one configuration.
pub fn run(problem: &ProblemData, config: &SolveConfig) -> Result<(HeuristicReport, ExactReport)> {
    let heuristic = run_heuristic(problem, &config.heuristic);
    let exact = run_exact(problem, &config.exact)?;
    if let Some(cmax) = exact.makespan {
        if exact.is_optimal() && cmax > heuristic.makespan && !problem.is_reentrant() {
            warn!(
                exact = cmax,
                heuristic = heuristic.makespan,
                "proven optimum exceeds the heuristic makespan"
            );
        }
    }
    Ok((heuristic, exact))
}
