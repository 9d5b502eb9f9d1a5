//! Builds the disjunctive model from problem data.

use tracing::debug;

use super::model::{
    Constraint, DisjunctiveModel, DisjunctivePair, Operation, VarId, VarKind, Variable,
};
use crate::models::ProblemData;

/// Builds a [`DisjunctiveModel`] from problem data.
///
/// Creates:
/// - A continuous start variable `S[j,k] >= 0` per operation
/// - A continuous `Cmax >= 0`
/// - A binary `y` per unordered pair of operations on the same physical
///   machine (pairs are formed by machine, not by stage, so re-entrant
///   stages and two stages of one job are paired too)
/// - Precedence rows between consecutive stages of each job
/// - Two big-M no-overlap rows per pair, `M = Σ p`
/// - A makespan row per job
///
/// # Example
/// ```
/// use u_flowshop::disjunctive::DisjunctiveModelBuilder;
/// use u_flowshop::models::ProblemData;
///
/// let problem = ProblemData::reference();
/// let model = DisjunctiveModelBuilder::new(&problem).build();
/// assert_eq!(model.operations().len(), 25);
/// assert_eq!(model.pairs().len(), 75);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DisjunctiveModelBuilder<'a> {
    problem: &'a ProblemData,
}

impl<'a> DisjunctiveModelBuilder<'a> {
    /// Creates a builder.
    pub fn new(problem: &'a ProblemData) -> Self {
        Self { problem }
    }

    /// Builds the model.
    pub fn build(&self) -> DisjunctiveModel {
        let p = self.problem;
        let (n, m) = (p.job_count(), p.stage_count());

        let mut variables = Vec::with_capacity(n * m + 1);
        let mut add_var = |name: String, kind: VarKind| {
            let upper = match kind {
                VarKind::Binary => Some(1.0),
                VarKind::Continuous => None,
            };
            variables.push(Variable {
                name,
                kind,
                lower: 0.0,
                upper,
            });
            VarId(variables.len() - 1)
        };

        let mut operations = Vec::with_capacity(n * m);
        for j in 0..n {
            for k in 0..m {
                let start = add_var(format!("S[{},{}]", p.job_id(j), k + 1), VarKind::Continuous);
                operations.push(Operation {
                    job: j,
                    stage: k,
                    machine: p.machine_of_stage(k),
                    duration: p.duration(j, k),
                    start,
                });
            }
        }
        let cmax = add_var("Cmax".to_string(), VarKind::Continuous);

        let mut pairs = Vec::new();
        for machine in 0..p.machine_count() {
            let ops: Vec<usize> = (0..operations.len())
                .filter(|&i| operations[i].machine == machine)
                .collect();
            for (a, &first) in ops.iter().enumerate() {
                for &second in &ops[a + 1..] {
                    let (o1, o2) = (&operations[first], &operations[second]);
                    let selector = add_var(
                        format!(
                            "y[{},{}|{},{}]",
                            p.job_id(o1.job),
                            o1.stage + 1,
                            p.job_id(o2.job),
                            o2.stage + 1
                        ),
                        VarKind::Binary,
                    );
                    pairs.push(DisjunctivePair {
                        first,
                        second,
                        machine,
                        selector,
                    });
                }
            }
        }

        let mut constraints = Vec::with_capacity(n * m + 2 * pairs.len());
        for j in 0..n {
            for k in 0..m.saturating_sub(1) {
                constraints.push(Constraint::Precedence {
                    before: j * m + k,
                    after: j * m + k + 1,
                });
            }
        }
        for pair in 0..pairs.len() {
            constraints.push(Constraint::NoOverlap {
                pair,
                first_precedes: true,
            });
        }
        for pair in 0..pairs.len() {
            constraints.push(Constraint::NoOverlap {
                pair,
                first_precedes: false,
            });
        }
        for j in 0..n {
            constraints.push(Constraint::Makespan {
                operation: j * m + m - 1,
            });
        }

        debug!(
            operations = operations.len(),
            pairs = pairs.len(),
            constraints = constraints.len(),
            "built disjunctive model"
        );

        DisjunctiveModel {
            job_ids: p.job_ids().to_vec(),
            machine_ids: p.machine_ids().to_vec(),
            stage_count: m,
            variables,
            operations,
            pairs,
            constraints,
            cmax,
            big_m: p.total_work() as f64,
        }
    }
}
