//! Schedule (solution) model.
//!
//! A schedule is a complete assignment of operations to machines and time
//! slots. Both the heuristic path (via the completion matrix) and the exact
//! path (via solver start times) decode into this shape so the two can be
//! checked and compared the same way.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete schedule.
///
/// Contains operation-machine-time assignments and any constraint violations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Operation assignments.
    pub assignments: Vec<Assignment>,
    /// Constraint violations detected in this schedule.
    pub violations: Vec<Violation>,
}

/// One operation (job × stage) placed on its machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Job identifier.
    pub job_id: String,
    /// Job index in the problem.
    pub job: usize,
    /// Stage index (0-based).
    pub stage: usize,
    /// Machine the stage runs on.
    pub machine_id: String,
    /// Start time.
    pub start: i64,
    /// End time.
    pub end: i64,
}

/// A constraint violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (job, machine, or model constraint name).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of constraint violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Two operations overlap on one machine.
    CapacityExceeded,
    /// A stage started before the job's previous stage finished.
    PrecedenceViolation,
    /// A linear row of the exact model is not satisfied.
    ConstraintViolated,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(
        job_id: impl Into<String>,
        job: usize,
        stage: usize,
        machine_id: impl Into<String>,
        start: i64,
        end: i64,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            job,
            stage,
            machine_id: machine_id.into(),
            start,
            end,
        }
    }

    /// Processing duration (end - start).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

impl Violation {
    /// Creates a capacity exceeded violation.
    pub fn capacity_exceeded(machine_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::CapacityExceeded,
            entity_id: machine_id.into(),
            message: message.into(),
            severity: 90,
        }
    }

    /// Creates a precedence violation.
    pub fn precedence_violation(job_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::PrecedenceViolation,
            entity_id: job_id.into(),
            message: message.into(),
            severity: 95,
        }
    }

    /// Creates a violated-model-row violation.
    pub fn constraint_violated(row: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::ConstraintViolated,
            entity_id: row.into(),
            message: message.into(),
            severity: 100,
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Adds a violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Whether the schedule has no recorded violations.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Makespan: latest end time across all assignments.
    pub fn makespan(&self) -> i64 {
        self.assignments.iter().map(|a| a.end).max().unwrap_or(0)
    }

    /// Finds the assignment of one operation.
    pub fn assignment(&self, job_id: &str, stage: usize) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.job_id == job_id && a.stage == stage)
    }

    /// Returns all assignments of a job.
    pub fn assignments_for_job(&self, job_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.job_id == job_id)
            .collect()
    }

    /// Returns all assignments on a machine.
    pub fn assignments_for_machine(&self, machine_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.machine_id == machine_id)
            .collect()
    }

    /// Machine utilization: busy_time / horizon.
    ///
    /// Returns `None` if `horizon` is not positive.
    pub fn machine_utilization(&self, machine_id: &str, horizon: i64) -> Option<f64> {
        if horizon <= 0 {
            return None;
        }
        let busy: i64 = self
            .assignments_for_machine(machine_id)
            .iter()
            .map(|a| a.duration())
            .sum();
        Some(busy as f64 / horizon as f64)
    }

    /// Utilization of every machine that has assignments, over the makespan.
    pub fn all_utilizations(&self) -> BTreeMap<String, f64> {
        let horizon = self.makespan();
        if horizon <= 0 {
            return BTreeMap::new();
        }

        let mut busy: BTreeMap<String, i64> = BTreeMap::new();
        for a in &self.assignments {
            *busy.entry(a.machine_id.clone()).or_insert(0) += a.duration();
        }

        busy.into_iter()
            .map(|(id, b)| (id, b as f64 / horizon as f64))
            .collect()
    }

    /// Completion time of a job (latest end of its assignments).
    pub fn job_completion_time(&self, job_id: &str) -> Option<i64> {
        self.assignments_for_job(job_id)
            .iter()
            .map(|a| a.end)
            .max()
    }

    /// Machine processing order: job IDs sorted by start time.
    pub fn machine_order(&self, machine_id: &str) -> Vec<(&str, usize)> {
        let mut ops = self.assignments_for_machine(machine_id);
        ops.sort_by_key(|a| (a.start, a.end, a.job, a.stage));
        ops.into_iter().map(|a| (a.job_id.as_str(), a.stage)).collect()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}
