//! Input and schedule validation for flow-shop problems.
//!
//! Input checks run once, when [`ProblemData`] is built, and report every
//! issue found rather than stopping at the first. Detects:
//! - Empty job or stage lists
//! - Duplicate job IDs
//! - Duration vectors whose length differs from the stage count
//! - Negative durations
//! - Blank machine identifiers
//!
//! Schedule checks verify a finished [`Schedule`] against the problem:
//! intra-job stage order and machine exclusivity.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Assignment, ProblemData, ProblemInput, Schedule, Violation};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The problem has no jobs or no stages.
    EmptyProblem,
    /// Two jobs share the same ID.
    DuplicateId,
    /// A job's duration vector length differs from the stage count.
    StageCountMismatch,
    /// A processing duration is negative.
    NegativeDuration,
    /// A stage maps to a blank machine identifier.
    InvalidMachine,
    /// A sequence is not a permutation of all jobs.
    InvalidSequence,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates raw problem input.
///
/// Checks:
/// 1. At least one job and one stage
/// 2. No duplicate job IDs
/// 3. Every stage maps to a non-blank machine ID
/// 4. Every job has exactly one duration per stage
/// 5. No negative durations
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(input: &ProblemInput) -> ValidationResult {
    let mut errors = Vec::new();
    let stage_count = input.stage_machines.len();

    if input.jobs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyProblem,
            "Problem has no jobs",
        ));
    }
    if stage_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyProblem,
            "Problem has no stages",
        ));
    }

    for (k, machine) in input.stage_machines.iter().enumerate() {
        if machine.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidMachine,
                format!("Stage {} maps to a blank machine ID", k + 1),
            ));
        }
    }

    let mut job_ids = HashSet::new();
    for job in &input.jobs {
        if !job_ids.insert(job.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }

        if job.durations.len() != stage_count {
            errors.push(ValidationError::new(
                ValidationErrorKind::StageCountMismatch,
                format!(
                    "Job '{}' has {} durations but the problem has {} stages",
                    job.id,
                    job.durations.len(),
                    stage_count
                ),
            ));
        }

        for (k, &d) in job.durations.iter().enumerate() {
            if d < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeDuration,
                    format!("Job '{}' has negative duration {d} at stage {}", job.id, k + 1),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that `jobs` is a permutation of all job indices of `problem`.
pub fn validate_sequence(problem: &ProblemData, jobs: &[usize]) -> ValidationResult {
    let n = problem.job_count();
    let mut errors = Vec::new();

    if jobs.len() != n {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidSequence,
            format!("Sequence has {} jobs but the problem has {n}", jobs.len()),
        ));
    }

    let mut seen = vec![false; n];
    for &j in jobs {
        if j >= n {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSequence,
                format!("Sequence references unknown job index {j}"),
            ));
        } else if std::mem::replace(&mut seen[j], true) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSequence,
                format!("Job '{}' appears more than once", problem.job_id(j)),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that `jobs` is a permutation of `0..jobs.len()`.
///
/// The problem-free counterpart of [`validate_sequence`], used where only the
/// order itself is at hand (e.g. deserialization).
pub fn validate_permutation(jobs: &[usize]) -> ValidationResult {
    let n = jobs.len();
    let mut seen = vec![false; n];
    let mut errors = Vec::new();
    for &j in jobs {
        if j >= n {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSequence,
                format!("Job index {j} out of range for a sequence of {n} jobs"),
            ));
        } else if std::mem::replace(&mut seen[j], true) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSequence,
                format!("Job index {j} appears more than once"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks a schedule against the problem's structural constraints.
///
/// Reports:
/// - `PrecedenceViolation` when a job's stage starts before its previous
///   stage ends
/// - `CapacityExceeded` when two operations overlap on one machine
///
/// A schedule produced by the permutation evaluator on a re-entrant problem
/// can legitimately fail the machine check; that is how the mismatch
/// between the two problem classes becomes visible.
pub fn validate_schedule(problem: &ProblemData, schedule: &Schedule) -> Vec<Violation> {
    let mut violations = Vec::new();

    for j in 0..problem.job_count() {
        let mut ops = schedule.assignments_for_job(problem.job_id(j));
        ops.sort_by_key(|a| a.stage);
        for pair in ops.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.start < prev.end {
                violations.push(Violation::precedence_violation(
                    &next.job_id,
                    format!(
                        "Stage {} starts at {} before stage {} ends at {}",
                        next.stage + 1,
                        next.start,
                        prev.stage + 1,
                        prev.end
                    ),
                ));
            }
        }
    }

    for m in 0..problem.machine_count() {
        let machine_id = problem.machine_id(m);
        let mut ops = schedule.assignments_for_machine(machine_id);
        ops.sort_by_key(|a| (a.start, a.end));
        // Zero-length operations occupy no time and never hold the machine.
        let mut holder: Option<&Assignment> = None;
        for b in ops.into_iter().filter(|a| a.duration() > 0) {
            if let Some(a) = holder {
                if b.start < a.end {
                    violations.push(Violation::capacity_exceeded(
                        machine_id,
                        format!(
                            "{}@{} [{}, {}] overlaps {}@{} [{}, {}]",
                            a.job_id,
                            a.stage + 1,
                            a.start,
                            a.end,
                            b.job_id,
                            b.stage + 1,
                            b.start,
                            b.end
                        ),
                    ));
                }
            }
            if holder.map_or(true, |a| b.end > a.end) {
                holder = Some(b);
            }
        }
    }

    violations
}
