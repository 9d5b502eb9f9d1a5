//! Problem data model.
//!
//! A flow-shop instance is a set of jobs, each visiting the same ordered list
//! of stages. Every stage runs on a physical machine; several stages may
//! share a machine, in which case jobs re-enter that machine later in their
//! route.
//!
//! # Time Representation
//! Durations are non-negative integer time units. The consumer decides what
//! a unit means (seconds, minutes, shifts).
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 6

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation::validate_input;

/// A job with one processing duration per stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Processing duration at each stage, in stage order.
    pub durations: Vec<i64>,
}

impl Job {
    /// Creates a job.
    pub fn new(id: impl Into<String>, durations: Vec<i64>) -> Self {
        Self {
            id: id.into(),
            durations,
        }
    }

    /// Total processing time across all stages.
    pub fn total_duration(&self) -> i64 {
        self.durations.iter().sum()
    }
}

/// Unvalidated problem description.
///
/// Collects jobs and the stage→machine mapping; [`ProblemData::new`] turns
/// it into a validated, immutable instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemInput {
    /// Jobs in input order. The order breaks ties in the heuristic.
    pub jobs: Vec<Job>,
    /// Physical machine ID for each stage, in stage order.
    pub stage_machines: Vec<String>,
}

impl ProblemInput {
    /// Creates an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage running on `machine_id`.
    pub fn with_stage(mut self, machine_id: impl Into<String>) -> Self {
        self.stage_machines.push(machine_id.into());
        self
    }

    /// Appends one stage per machine ID.
    pub fn with_stages<I, S>(mut self, machine_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stage_machines
            .extend(machine_ids.into_iter().map(Into::into));
        self
    }

    /// Appends a job.
    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    /// Validates and freezes the input.
    pub fn build(self) -> Result<ProblemData> {
        ProblemData::new(self)
    }
}

/// A validated, read-only flow-shop instance.
///
/// Durations are stored in a dense `jobs × stages` array indexed by job and
/// stage position; machines are numbered densely in order of first
/// appearance along the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProblemInput", into = "ProblemInput")]
pub struct ProblemData {
    job_ids: Vec<String>,
    stage_count: usize,
    /// Row-major `[job * stage_count + stage]`.
    durations: Vec<i64>,
    stage_machine: Vec<usize>,
    machine_ids: Vec<String>,
}

impl ProblemData {
    /// Validates `input` and builds the instance.
    ///
    /// # Errors
    /// [`Error::Validation`](crate::Error::Validation) listing every problem
    /// found in the input.
    pub fn new(input: ProblemInput) -> Result<Self> {
        validate_input(&input)?;

        let stage_count = input.stage_machines.len();
        let mut machine_ids: Vec<String> = Vec::new();
        let mut stage_machine = Vec::with_capacity(stage_count);
        for id in &input.stage_machines {
            let index = match machine_ids.iter().position(|m| m == id) {
                Some(index) => index,
                None => {
                    machine_ids.push(id.clone());
                    machine_ids.len() - 1
                }
            };
            stage_machine.push(index);
        }

        let mut job_ids = Vec::with_capacity(input.jobs.len());
        let mut durations = Vec::with_capacity(input.jobs.len() * stage_count);
        for job in input.jobs {
            job_ids.push(job.id);
            durations.extend(job.durations);
        }

        Ok(Self {
            job_ids,
            stage_count,
            durations,
            stage_machine,
            machine_ids,
        })
    }

    /// The five-job, five-stage reference instance.
    ///
    /// Stage 5 returns to the machine of stage 3, so the instance is
    /// re-entrant.
    pub fn reference() -> Self {
        let input = ProblemInput::new()
            .with_stages(["M1", "M2", "M3", "M4", "M3"])
            .with_job(Job::new("J1", vec![6, 5, 3, 9, 3]))
            .with_job(Job::new("J2", vec![7, 6, 2, 8, 2]))
            .with_job(Job::new("J3", vec![5, 7, 4, 7, 4]))
            .with_job(Job::new("J4", vec![6, 5, 3, 6, 3]))
            .with_job(Job::new("J5", vec![8, 6, 2, 9, 2]));
        match Self::new(input) {
            Ok(problem) => problem,
            Err(e) => unreachable!("reference instance is valid: {e}"),
        }
    }

    /// Generates a random permutation flow-shop instance.
    ///
    /// Durations are uniform in `1..=99` and each stage gets its own
    /// machine, following Taillard's benchmark convention. The same seed
    /// always yields the same instance.
    ///
    /// # Errors
    /// Fails validation when `jobs` or `stages` is zero.
    ///
    /// # Reference
    /// Taillard (1993), "Benchmarks for basic scheduling problems"
    pub fn random(jobs: usize, stages: usize, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut input = ProblemInput::new().with_stages((1..=stages).map(|k| format!("M{k}")));
        for j in 1..=jobs {
            let durations = (0..stages).map(|_| rng.random_range(1..=99)).collect();
            input = input.with_job(Job::new(format!("J{j}"), durations));
        }
        Self::new(input)
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.job_ids.len()
    }

    /// Number of stages.
    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    /// Number of distinct physical machines.
    pub fn machine_count(&self) -> usize {
        self.machine_ids.len()
    }

    /// Job identifier for a job index.
    pub fn job_id(&self, job: usize) -> &str {
        &self.job_ids[job]
    }

    /// All job identifiers in input order.
    pub fn job_ids(&self) -> &[String] {
        &self.job_ids
    }

    /// Index of the job with the given identifier.
    pub fn job_index(&self, id: &str) -> Option<usize> {
        self.job_ids.iter().position(|j| j == id)
    }

    /// Processing duration of `job` at `stage`.
    #[inline]
    pub fn duration(&self, job: usize, stage: usize) -> i64 {
        self.durations[job * self.stage_count + stage]
    }

    /// Per-stage durations of `job`.
    pub fn durations(&self, job: usize) -> &[i64] {
        let start = job * self.stage_count;
        &self.durations[start..start + self.stage_count]
    }

    /// Total processing time of `job` across all stages.
    pub fn total_duration(&self, job: usize) -> i64 {
        self.durations(job).iter().sum()
    }

    /// Sum of every operation's duration.
    pub fn total_work(&self) -> i64 {
        self.durations.iter().sum()
    }

    /// Dense machine index of `stage`.
    #[inline]
    pub fn machine_of_stage(&self, stage: usize) -> usize {
        self.stage_machine[stage]
    }

    /// Machine identifier for a machine index.
    pub fn machine_id(&self, machine: usize) -> &str {
        &self.machine_ids[machine]
    }

    /// All machine identifiers, indexed by machine.
    pub fn machine_ids(&self) -> &[String] {
        &self.machine_ids
    }

    /// Stages that run on `machine`, in route order.
    pub fn stages_on_machine(&self, machine: usize) -> Vec<usize> {
        (0..self.stage_count)
            .filter(|&k| self.stage_machine[k] == machine)
            .collect()
    }

    /// Total work assigned to `machine` over all jobs.
    pub fn machine_load(&self, machine: usize) -> i64 {
        self.stages_on_machine(machine)
            .into_iter()
            .map(|k| (0..self.job_count()).map(|j| self.duration(j, k)).sum::<i64>())
            .sum()
    }

    /// Whether any machine serves more than one stage.
    pub fn is_reentrant(&self) -> bool {
        self.machine_count() < self.stage_count
    }

    /// Reconstructs the raw input this instance was built from.
    pub fn to_input(&self) -> ProblemInput {
        ProblemInput {
            jobs: (0..self.job_count())
                .map(|j| Job::new(self.job_id(j), self.durations(j).to_vec()))
                .collect(),
            stage_machines: self
                .stage_machine
                .iter()
                .map(|&m| self.machine_ids[m].clone())
                .collect(),
        }
    }
}

impl TryFrom<ProblemInput> for ProblemData {
    type Error = crate::Error;

    fn try_from(input: ProblemInput) -> Result<Self> {
        Self::new(input)
    }
}

impl From<ProblemData> for ProblemInput {
    fn from(problem: ProblemData) -> Self {
        problem.to_input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_reference_instance() {
        let p = ProblemData::reference();
        assert_eq!(p.job_count(), 5);
        assert_eq!(p.stage_count(), 5);
        assert_eq!(p.machine_count(), 4);
        assert!(p.is_reentrant());
        assert_eq!(p.durations(2), &[5, 7, 4, 7, 4]);
        assert_eq!(p.total_duration(0), 26);
        assert_eq!(p.machine_of_stage(4), p.machine_of_stage(2));
        assert_eq!(p.machine_id(p.machine_of_stage(4)), "M3");
        assert_eq!(p.stages_on_machine(2), vec![2, 4]);
    }

    #[test]
    fn test_machine_load() {
        let p = ProblemData::reference();
        // M3 serves stages 3 and 5: 2 * (3 + 2 + 4 + 3 + 2)
        assert_eq!(p.machine_load(2), 28);
        // M4 serves stage 4 only
        assert_eq!(p.machine_load(3), 39);
        assert_eq!(p.total_work(), 128);
    }

    #[test]
    fn test_job_lookup() {
        let p = ProblemData::reference();
        assert_eq!(p.job_index("J4"), Some(3));
        assert_eq!(p.job_index("J9"), None);
        assert_eq!(p.job_id(3), "J4");
    }

    #[test]
    fn test_not_reentrant() {
        let p = ProblemInput::new()
            .with_stages(["M1", "M2"])
            .with_job(Job::new("A", vec![3, 2]))
            .build()
            .unwrap();
        assert!(!p.is_reentrant());
        assert_eq!(p.machine_count(), 2);
    }

    #[test]
    fn test_rejects_mismatched_stage_count() {
        let err = ProblemInput::new()
            .with_stages(["M1", "M2"])
            .with_job(Job::new("A", vec![3]))
            .build()
            .unwrap_err();
        assert_eq!(
            err.validation_errors()[0].kind,
            ValidationErrorKind::StageCountMismatch
        );
    }

    #[test]
    fn test_rejects_negative_duration() {
        let err = ProblemInput::new()
            .with_stage("M1")
            .with_job(Job::new("A", vec![-3]))
            .build()
            .unwrap_err();
        assert_eq!(
            err.validation_errors()[0].kind,
            ValidationErrorKind::NegativeDuration
        );
    }

    #[test]
    fn test_random_is_seeded() {
        let a = ProblemData::random(6, 4, 42).unwrap();
        let b = ProblemData::random(6, 4, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.job_count(), 6);
        assert_eq!(a.stage_count(), 4);
        assert!(!a.is_reentrant());
        for j in 0..6 {
            assert!(a.durations(j).iter().all(|&d| (1..=99).contains(&d)));
        }
    }

    #[test]
    fn test_random_rejects_empty() {
        assert!(ProblemData::random(0, 3, 1).is_err());
    }

    #[test]
    fn test_serde_roundtrip_revalidates() {
        let p = ProblemData::reference();
        let json = serde_json::to_string(&p).unwrap();
        let back: ProblemData = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);

        let bad = r#"{"jobs":[{"id":"A","durations":[1,-2]}],"stage_machines":["M1","M2"]}"#;
        assert!(serde_json::from_str::<ProblemData>(bad).is_err());
    }
}
