//! Job sequences and completion-time matrices.
//!
//! A [`Sequence`] is the permutation-flow-shop decision: one job order shared
//! by every stage. A [`CompletionMatrix`] holds the completion time of each
//! sequence position at each stage; it is derived data, recomputed per
//! evaluation.

use serde::{Deserialize, Serialize};

use super::{Assignment, ProblemData, Schedule};
use crate::error::Result;
use crate::validation::{
    validate_permutation, validate_sequence, ValidationError, ValidationErrorKind,
};

/// A permutation of all jobs of a problem, by job index.
///
/// Serializes as a plain index list. Deserialization checks that the list
/// is a permutation of `0..len`; whether `len` matches a problem's job count
/// is checked by [`Sequence::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Sequence {
    jobs: Vec<usize>,
}

impl Sequence {
    /// Creates a sequence, checking that it is a permutation of all jobs.
    pub fn new(problem: &ProblemData, jobs: Vec<usize>) -> Result<Self> {
        validate_sequence(problem, &jobs)?;
        Ok(Self { jobs })
    }

    /// Creates a sequence from job identifiers.
    pub fn from_ids<S: AsRef<str>>(problem: &ProblemData, ids: &[S]) -> Result<Self> {
        let mut jobs = Vec::with_capacity(ids.len());
        let mut errors = Vec::new();
        for id in ids {
            match problem.job_index(id.as_ref()) {
                Some(j) => jobs.push(j),
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidSequence,
                    format!("Sequence references unknown job '{}'", id.as_ref()),
                )),
            }
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }
        Self::new(problem, jobs)
    }

    /// Jobs in input order.
    pub fn identity(problem: &ProblemData) -> Self {
        Self {
            jobs: (0..problem.job_count()).collect(),
        }
    }

    /// Wraps an order already known to be a full permutation.
    pub(crate) fn from_permutation(jobs: Vec<usize>) -> Self {
        Self { jobs }
    }

    /// Job indices in processing order.
    pub fn as_slice(&self) -> &[usize] {
        &self.jobs
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Job identifiers in processing order.
    pub fn job_ids<'p>(&self, problem: &'p ProblemData) -> Vec<&'p str> {
        self.jobs.iter().map(|&j| problem.job_id(j)).collect()
    }
}

impl TryFrom<Vec<usize>> for Sequence {
    type Error = crate::Error;

    fn try_from(jobs: Vec<usize>) -> Result<Self> {
        validate_permutation(&jobs)?;
        Ok(Self { jobs })
    }
}

impl From<Sequence> for Vec<usize> {
    fn from(sequence: Sequence) -> Self {
        sequence.jobs
    }
}

/// Completion times indexed by sequence position and stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMatrix {
    positions: usize,
    stages: usize,
    /// Row-major `[position * stages + stage]`.
    values: Vec<i64>,
}

impl CompletionMatrix {
    pub(crate) fn zeros(positions: usize, stages: usize) -> Self {
        Self {
            positions,
            stages,
            values: vec![0; positions * stages],
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, position: usize, stage: usize, value: i64) {
        self.values[position * self.stages + stage] = value;
    }

    /// Completion time at `position` and `stage`.
    #[inline]
    pub fn get(&self, position: usize, stage: usize) -> i64 {
        self.values[position * self.stages + stage]
    }

    /// Completion times of one sequence position across all stages.
    pub fn row(&self, position: usize) -> &[i64] {
        let start = position * self.stages;
        &self.values[start..start + self.stages]
    }

    /// Completion times of one stage across all sequence positions.
    pub fn column(&self, stage: usize) -> Vec<i64> {
        (0..self.positions).map(|i| self.get(i, stage)).collect()
    }

    /// Number of sequence positions.
    pub fn positions(&self) -> usize {
        self.positions
    }

    /// Number of stages.
    pub fn stages(&self) -> usize {
        self.stages
    }

    /// Completion time of the last position at the last stage (0 if empty).
    pub fn makespan(&self) -> i64 {
        self.values.last().copied().unwrap_or(0)
    }

    /// Converts the matrix into per-operation assignments.
    ///
    /// `jobs` must be the job order the matrix was computed for.
    pub fn to_schedule(&self, problem: &ProblemData, jobs: &[usize]) -> Schedule {
        let mut schedule = Schedule::new();
        for (i, &j) in jobs.iter().enumerate().take(self.positions) {
            for k in 0..self.stages {
                let end = self.get(i, k);
                let start = end - problem.duration(j, k);
                schedule.add_assignment(Assignment::new(
                    problem.job_id(j),
                    j,
                    k,
                    problem.machine_id(problem.machine_of_stage(k)),
                    start,
                    end,
                ));
            }
        }
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, ProblemInput};

    fn toy() -> ProblemData {
        ProblemInput::new()
            .with_stages(["M1", "M2"])
            .with_job(Job::new("A", vec![3, 2]))
            .with_job(Job::new("B", vec![2, 3]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_sequence_from_ids() {
        let p = toy();
        let seq = Sequence::from_ids(&p, &["B", "A"]).unwrap();
        assert_eq!(seq.as_slice(), &[1, 0]);
        assert_eq!(seq.job_ids(&p), vec!["B", "A"]);
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_sequence_rejects_unknown_id() {
        let p = toy();
        let err = Sequence::from_ids(&p, &["B", "Z"]).unwrap_err();
        assert_eq!(
            err.validation_errors()[0].kind,
            ValidationErrorKind::InvalidSequence
        );
    }

    #[test]
    fn test_sequence_rejects_partial() {
        let p = toy();
        assert!(Sequence::new(&p, vec![1]).is_err());
        assert!(Sequence::new(&p, vec![1, 1]).is_err());
    }

    #[test]
    fn test_deserialize_checks_permutation() {
        let seq: Sequence = serde_json::from_str("[1, 0, 2]").unwrap();
        assert_eq!(seq.as_slice(), &[1, 0, 2]);
        assert_eq!(serde_json::to_string(&seq).unwrap(), "[1,0,2]");

        assert!(serde_json::from_str::<Sequence>("[0, 0]").is_err());
        assert!(serde_json::from_str::<Sequence>("[0, 3]").is_err());
    }

    #[test]
    fn test_identity() {
        let p = toy();
        assert_eq!(Sequence::identity(&p).as_slice(), &[0, 1]);
    }

    #[test]
    fn test_matrix_accessors() {
        let mut m = CompletionMatrix::zeros(2, 2);
        m.set(0, 0, 2);
        m.set(0, 1, 5);
        m.set(1, 0, 5);
        m.set(1, 1, 7);
        assert_eq!(m.row(1), &[5, 7]);
        assert_eq!(m.column(0), vec![2, 5]);
        assert_eq!(m.makespan(), 7);
        assert_eq!(CompletionMatrix::zeros(0, 3).makespan(), 0);
    }

    #[test]
    fn test_matrix_to_schedule() {
        let p = toy();
        let mut m = CompletionMatrix::zeros(2, 2);
        m.set(0, 0, 2);
        m.set(0, 1, 5);
        m.set(1, 0, 5);
        m.set(1, 1, 7);

        let schedule = m.to_schedule(&p, &[1, 0]);
        assert_eq!(schedule.assignment_count(), 4);
        assert_eq!(schedule.makespan(), 7);
        let a = schedule.assignment("A", 1).unwrap();
        assert_eq!((a.start, a.end), (5, 7));
        assert_eq!(a.machine_id, "M2");
    }
}
