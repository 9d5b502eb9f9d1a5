//! Disjunctive model representation.
//!
//! The model is a plain value: a variable table, the operations and
//! same-machine pairs it was built from, and typed constraints. Typed
//! constraints keep the scheduling structure visible to backends that can
//! exploit it; [`DisjunctiveModel::linear_constraints`] lowers them to
//! generic rows for LP/MIP backends.

use serde::{Deserialize, Serialize};

use crate::models::{Assignment, Schedule, Violation};

/// Index into the model's variable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub usize);

/// Variable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    /// Real-valued.
    Continuous,
    /// 0 or 1.
    Binary,
}

/// A decision variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Display name, e.g. `S[J1,3]`.
    pub name: String,
    /// Domain.
    pub kind: VarKind,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound (`None` = unbounded).
    pub upper: Option<f64>,
}

/// One (job, stage) operation of the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Job index.
    pub job: usize,
    /// Stage index (0-based).
    pub stage: usize,
    /// Physical machine index.
    pub machine: usize,
    /// Processing duration.
    pub duration: i64,
    /// Start-time variable.
    pub start: VarId,
}

/// Two operations on the same machine and the binary that orders them.
///
/// `selector = 1` means `first` runs before `second`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisjunctivePair {
    /// Operation index of the first member.
    pub first: usize,
    /// Operation index of the second member.
    pub second: usize,
    /// Shared machine index.
    pub machine: usize,
    /// Ordering binary.
    pub selector: VarId,
}

/// A typed model constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// `S(after) >= S(before) + p(before)`.
    Precedence {
        /// Earlier operation.
        before: usize,
        /// Later operation of the same job.
        after: usize,
    },
    /// One half of a big-M disjunction.
    ///
    /// With `first_precedes`: `S1 + p1 <= S2 + M(1 - y)`;
    /// otherwise: `S2 + p2 <= S1 + M*y`.
    NoOverlap {
        /// Pair index.
        pair: usize,
        /// Which half of the disjunction this row is.
        first_precedes: bool,
    },
    /// `Cmax >= S(op) + p(op)` for a job's final operation.
    Makespan {
        /// Final operation of a job.
        operation: usize,
    },
}

/// Row sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    /// `lhs <= rhs`
    LessEqual,
    /// `lhs >= rhs`
    GreaterEqual,
}

/// A linear row `Σ coef * var (sense) rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Row name, e.g. `cap1[J1,3|J2,5]`.
    pub name: String,
    /// Non-zero coefficients.
    pub terms: Vec<(VarId, f64)>,
    /// Row sense.
    pub sense: Sense,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Left-hand side value under `values`.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|&(v, c)| c * values[v.0]).sum()
    }

    /// Slack under `values`; negative when the row is violated.
    pub fn slack(&self, values: &[f64]) -> f64 {
        let lhs = self.lhs(values);
        match self.sense {
            Sense::LessEqual => self.rhs - lhs,
            Sense::GreaterEqual => lhs - self.rhs,
        }
    }
}

/// Exact re-entrant flow-shop model: minimize `Cmax`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisjunctiveModel {
    pub(crate) job_ids: Vec<String>,
    pub(crate) machine_ids: Vec<String>,
    pub(crate) stage_count: usize,
    pub(crate) variables: Vec<Variable>,
    pub(crate) operations: Vec<Operation>,
    pub(crate) pairs: Vec<DisjunctivePair>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) cmax: VarId,
    pub(crate) big_m: f64,
}

impl DisjunctiveModel {
    /// Variable table, indexed by [`VarId`].
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Operations, job-major then stage order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Same-machine operation pairs.
    pub fn pairs(&self) -> &[DisjunctivePair] {
        &self.pairs
    }

    /// Typed constraints.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The makespan variable (the objective).
    pub fn cmax(&self) -> VarId {
        self.cmax
    }

    /// The big-M constant: sum of all processing times.
    pub fn big_m(&self) -> f64 {
        self.big_m
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.job_ids.len()
    }

    /// Number of stages per job.
    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    /// Number of physical machines.
    pub fn machine_count(&self) -> usize {
        self.machine_ids.len()
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of binary variables.
    pub fn binary_count(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.kind == VarKind::Binary)
            .count()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Operation index of (`job`, `stage`).
    #[inline]
    pub fn operation_index(&self, job: usize, stage: usize) -> usize {
        job * self.stage_count + stage
    }

    /// Operations of one job, in stage order.
    pub fn job_operations(&self, job: usize) -> &[Operation] {
        let start = job * self.stage_count;
        &self.operations[start..start + self.stage_count]
    }

    fn op_label(&self, op: usize) -> String {
        let o = &self.operations[op];
        format!("{},{}", self.job_ids[o.job], o.stage + 1)
    }

    /// Lowers one typed constraint to a linear row.
    pub fn linear(&self, constraint: &Constraint) -> LinearConstraint {
        match *constraint {
            Constraint::Precedence { before, after } => {
                let (a, b) = (&self.operations[before], &self.operations[after]);
                LinearConstraint {
                    name: format!("preced[{}]", self.op_label(before)),
                    terms: vec![(b.start, 1.0), (a.start, -1.0)],
                    sense: Sense::GreaterEqual,
                    rhs: a.duration as f64,
                }
            }
            Constraint::NoOverlap {
                pair,
                first_precedes,
            } => {
                let p = &self.pairs[pair];
                let (o1, o2) = (&self.operations[p.first], &self.operations[p.second]);
                let label = format!("{}|{}", self.op_label(p.first), self.op_label(p.second));
                if first_precedes {
                    // S1 + p1 <= S2 + M(1 - y)
                    LinearConstraint {
                        name: format!("cap1[{label}]"),
                        terms: vec![(o1.start, 1.0), (o2.start, -1.0), (p.selector, self.big_m)],
                        sense: Sense::LessEqual,
                        rhs: self.big_m - o1.duration as f64,
                    }
                } else {
                    // S2 + p2 <= S1 + M*y
                    LinearConstraint {
                        name: format!("cap2[{label}]"),
                        terms: vec![(o2.start, 1.0), (o1.start, -1.0), (p.selector, -self.big_m)],
                        sense: Sense::LessEqual,
                        rhs: -(o2.duration as f64),
                    }
                }
            }
            Constraint::Makespan { operation } => {
                let o = &self.operations[operation];
                LinearConstraint {
                    name: format!("cmax_def[{}]", self.job_ids[o.job]),
                    terms: vec![(self.cmax, 1.0), (o.start, -1.0)],
                    sense: Sense::GreaterEqual,
                    rhs: o.duration as f64,
                }
            }
        }
    }

    /// All constraints as linear rows, in model order.
    pub fn linear_constraints(&self) -> Vec<LinearConstraint> {
        self.constraints.iter().map(|c| self.linear(c)).collect()
    }

    /// Checks a full variable assignment against bounds, integrality, and
    /// every row.
    ///
    /// `values` is indexed by [`VarId`]. An empty result means the
    /// assignment is feasible within `tolerance`.
    pub fn violations(&self, values: &[f64], tolerance: f64) -> Vec<Violation> {
        let mut violations = Vec::new();

        if values.len() != self.variables.len() {
            violations.push(Violation::constraint_violated(
                "values",
                format!(
                    "Expected {} values, got {}",
                    self.variables.len(),
                    values.len()
                ),
            ));
            return violations;
        }

        for (var, &x) in self.variables.iter().zip(values) {
            let below = x < var.lower - tolerance;
            let above = var.upper.is_some_and(|u| x > u + tolerance);
            let fractional =
                var.kind == VarKind::Binary && (x - x.round()).abs() > tolerance;
            if below || above || fractional {
                violations.push(Violation::constraint_violated(
                    &var.name,
                    format!("Value {x} outside the variable's domain"),
                ));
            }
        }

        for row in self.linear_constraints() {
            let slack = row.slack(values);
            if slack < -tolerance {
                violations.push(Violation::constraint_violated(
                    &row.name,
                    format!("Row violated by {}", -slack),
                ));
            }
        }

        violations
    }

    /// Start time of operation `op` under `values`.
    pub fn start_time(&self, values: &[f64], op: usize) -> f64 {
        values[self.operations[op].start.0]
    }

    /// Whether `values` orders the pair's first member before its second.
    pub fn first_precedes(&self, values: &[f64], pair: usize) -> bool {
        values[self.pairs[pair].selector.0] > 0.5
    }

    /// Objective value (`Cmax`) under `values`.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        values[self.cmax.0]
    }

    /// Decodes start times into a schedule.
    ///
    /// Start times are rounded to the nearest integer time unit; solver
    /// output for this model is integral up to floating-point noise.
    pub fn decode_schedule(&self, values: &[f64]) -> Schedule {
        let mut schedule = Schedule::new();
        for (i, o) in self.operations.iter().enumerate() {
            let start = self.start_time(values, i).round() as i64;
            schedule.add_assignment(Assignment::new(
                &self.job_ids[o.job],
                o.job,
                o.stage,
                &self.machine_ids[o.machine],
                start,
                start + o.duration,
            ));
        }
        schedule
    }
}
