//! Exact disjunctive formulation of the re-entrant flow shop.
//!
//! Machine exclusivity is modeled with binary ordering decisions and big-M
//! constraints. Machines are identified by physical machine, not by stage,
//! so stages that revisit a machine are mutually excluded in time.
//!
//! The model is built here and solved elsewhere: see [`crate::solver`] for
//! the backend contract.
//!
//! # Formulation
//!
//! ```text
//! min  Cmax
//! s.t. S[j,k+1] >= S[j,k] + p[j,k]                     (precedence)
//!      S1 + p1 <= S2 + M(1 - y)                        (cap1, per pair)
//!      S2 + p2 <= S1 + M*y                             (cap2, per pair)
//!      Cmax >= S[j,last] + p[j,last]                   (makespan)
//!      S >= 0, Cmax >= 0, y ∈ {0, 1}
//! ```
//!
//! # Reference
//! - Manne (1960), "On the job-shop scheduling problem"
//! - Ku & Beck (2016), "Mixed Integer Programming models for job shop
//!   scheduling: A computational analysis"

mod builder;
mod model;

pub use builder::DisjunctiveModelBuilder;
pub use model::{
    Constraint, DisjunctiveModel, DisjunctivePair, LinearConstraint, Operation, Sense, VarId,
    VarKind, Variable,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, ProblemData, ProblemInput, ViolationType};

    fn toy() -> ProblemData {
        ProblemInput::new()
            .with_stages(["M1", "M2"])
            .with_job(Job::new("A", vec![3, 2]))
            .with_job(Job::new("B", vec![2, 3]))
            .build()
            .unwrap()
    }

    /// Values for the toy schedule B→A on both machines (makespan 7).
    fn toy_values(model: &DisjunctiveModel) -> Vec<f64> {
        let mut values = vec![0.0; model.variable_count()];
        let s = |job, stage| model.operations()[model.operation_index(job, stage)].start.0;
        values[s(0, 0)] = 2.0;
        values[s(0, 1)] = 5.0;
        values[s(1, 0)] = 0.0;
        values[s(1, 1)] = 2.0;
        values[model.cmax().0] = 7.0;
        // Both pairs list A's operation first; B runs first, so y = 0.
        for pair in model.pairs() {
            values[pair.selector.0] = 0.0;
        }
        values
    }

    #[test]
    fn test_reference_model_size() {
        let model = DisjunctiveModelBuilder::new(&ProblemData::reference()).build();
        // M1, M2, M4: C(5,2) = 10 each; M3 serves two stages: C(10,2) = 45
        assert_eq!(model.pairs().len(), 75);
        assert_eq!(model.binary_count(), 75);
        assert_eq!(model.variable_count(), 25 + 1 + 75);
        // 5 jobs * 4 precedence + 2 * 75 no-overlap + 5 makespan
        assert_eq!(model.constraint_count(), 175);
        assert_eq!(model.big_m(), 128.0);
        assert_eq!(model.machine_count(), 4);
    }

    #[test]
    fn test_reentrant_stages_are_paired() {
        let problem = ProblemData::reference();
        let model = DisjunctiveModelBuilder::new(&problem).build();
        let m3 = 2;
        // Stage 3 and stage 5 of the same job share M3.
        let op3 = model.operation_index(0, 2);
        let op5 = model.operation_index(0, 4);
        assert!(model
            .pairs()
            .iter()
            .any(|p| p.machine == m3 && p.first == op3 && p.second == op5));
    }

    #[test]
    fn test_single_job_revisiting_machine() {
        let problem = ProblemInput::new()
            .with_stages(["M1", "M1"])
            .with_job(Job::new("A", vec![2, 3]))
            .build()
            .unwrap();
        let model = DisjunctiveModelBuilder::new(&problem).build();
        assert_eq!(model.pairs().len(), 1);
        assert_eq!(model.constraint_count(), 1 + 2 + 1);
    }

    #[test]
    fn test_linear_rows() {
        let model = DisjunctiveModelBuilder::new(&toy()).build();
        let rows = model.linear_constraints();
        assert_eq!(rows.len(), model.constraint_count());

        let preced = &rows[0];
        assert_eq!(preced.name, "preced[A,1]");
        assert_eq!(preced.sense, Sense::GreaterEqual);
        assert_eq!(preced.rhs, 3.0);

        let cap1 = rows.iter().find(|r| r.name.starts_with("cap1")).unwrap();
        assert_eq!(cap1.sense, Sense::LessEqual);
        // M - p1 with M = 10, p1 = 3
        assert_eq!(cap1.rhs, 7.0);

        let cap2 = rows.iter().find(|r| r.name.starts_with("cap2")).unwrap();
        assert_eq!(cap2.rhs, -2.0);

        assert!(rows.iter().any(|r| r.name == "cmax_def[B]"));
    }

    #[test]
    fn test_feasible_assignment_has_no_violations() {
        let model = DisjunctiveModelBuilder::new(&toy()).build();
        let values = toy_values(&model);
        assert!(model.violations(&values, 1e-9).is_empty());
        assert_eq!(model.objective_value(&values), 7.0);
    }

    #[test]
    fn test_detects_violations() {
        let model = DisjunctiveModelBuilder::new(&toy()).build();

        let mut values = toy_values(&model);
        values[model.cmax().0] = 6.0;
        let violations = model.violations(&values, 1e-9);
        assert!(violations.iter().any(|v| v.entity_id == "cmax_def[A]"));

        let mut values = toy_values(&model);
        values[model.pairs()[0].selector.0] = 0.5;
        let violations = model.violations(&values, 1e-9);
        assert!(violations
            .iter()
            .all(|v| v.violation_type == ViolationType::ConstraintViolated));
        assert!(!violations.is_empty());

        assert_eq!(model.violations(&[0.0], 1e-9).len(), 1);
    }

    #[test]
    fn test_wrong_selector_breaks_cap_row() {
        let model = DisjunctiveModelBuilder::new(&toy()).build();
        let mut values = toy_values(&model);
        // Claim A precedes B on M1 while the start times say otherwise.
        values[model.pairs()[0].selector.0] = 1.0;
        let violations = model.violations(&values, 1e-9);
        assert!(violations.iter().any(|v| v.entity_id.starts_with("cap1")));
    }

    #[test]
    fn test_decode_schedule() {
        let problem = toy();
        let model = DisjunctiveModelBuilder::new(&problem).build();
        let schedule = model.decode_schedule(&toy_values(&model));
        assert_eq!(schedule.assignment_count(), 4);
        assert_eq!(schedule.makespan(), 7);
        assert_eq!(schedule.machine_order("M1"), vec![("B", 0), ("A", 0)]);
        assert!(crate::validation::validate_schedule(&problem, &schedule).is_empty());
    }
}
