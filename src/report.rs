//! Textual run reports.
//!
//! Both reports implement `Display` for console output and `Serialize` for
//! machine consumption.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::Schedule;
use crate::scheduler::ScheduleKpi;
use crate::solver::SolveStatus;

/// Result of a heuristic run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicReport {
    /// Initial ordering rule used by NEH.
    pub rule: String,
    /// Job ids in sequence order.
    pub sequence: Vec<String>,
    /// Makespan of `sequence`.
    pub makespan: i64,
    /// Construction time.
    pub elapsed: Duration,
    /// Candidate orders evaluated.
    pub evaluations: usize,
}

impl fmt::Display for HeuristicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NEH sequence : [{}]", self.sequence.join(", "))?;
        write!(
            f,
            "NEH makespan : {}  (CPU {:.2} ms)",
            self.makespan,
            self.elapsed.as_secs_f64() * 1e3
        )
    }
}

/// Result of an exact run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactReport {
    /// Backend that ran.
    pub backend: String,
    /// Termination status.
    pub status: SolveStatus,
    /// Makespan of the returned schedule, if any.
    pub makespan: Option<i64>,
    /// Best proven lower bound, if known.
    pub best_bound: Option<f64>,
    /// Relative gap between objective and bound, if both are known.
    pub gap: Option<f64>,
    /// Search nodes explored.
    pub nodes: u64,
    /// Solve time (model build + backend).
    pub elapsed: Duration,
    /// Decoded schedule, if any.
    pub schedule: Option<Schedule>,
}

impl ExactReport {
    /// Whether the makespan is proven optimal.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Quality indicators of the decoded schedule, if any.
    pub fn kpi(&self) -> Option<ScheduleKpi> {
        self.schedule.as_ref().map(ScheduleKpi::calculate)
    }
}

impl fmt::Display for ExactReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Backend       : {}", self.backend)?;
        writeln!(f, "Status        : {}", self.status)?;
        let label = if self.is_optimal() {
            "Optimal Cmax  "
        } else {
            "Best Cmax     "
        };
        match self.makespan {
            Some(cmax) => writeln!(f, "{label}: {cmax}")?,
            None => writeln!(f, "{label}: n/a")?,
        }
        if let Some(bound) = self.best_bound {
            writeln!(f, "Best bound    : {bound}")?;
        }
        if let Some(gap) = self.gap.filter(|_| !self.is_optimal()) {
            writeln!(f, "Gap           : {:.2} %", gap * 100.0)?;
        }
        write!(f, "Solve time    : {:.3} s", self.elapsed.as_secs_f64())?;

        if let Some(schedule) = &self.schedule {
            let mut machines: Vec<&str> = schedule
                .assignments
                .iter()
                .map(|a| a.machine_id.as_str())
                .collect();
            machines.sort_unstable();
            machines.dedup();
            for machine in machines {
                let mut ops = schedule.assignments_for_machine(machine);
                ops.sort_by_key(|a| (a.start, a.end));
                let line: Vec<String> = ops
                    .iter()
                    .map(|a| format!("{}/{}@{}", a.job_id, a.stage + 1, a.start))
                    .collect();
                write!(f, "\n  {machine}: {}", line.join(" "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Assignment;

    #[test]
    fn test_heuristic_display() {
        let report = HeuristicReport {
            rule: "LPT".into(),
            sequence: vec!["J4".into(), "J1".into(), "J2".into(), "J3".into(), "J5".into()],
            makespan: 55,
            elapsed: Duration::from_micros(1250),
            evaluations: 15,
        };
        let text = report.to_string();
        assert_eq!(
            text,
            "NEH sequence : [J4, J1, J2, J3, J5]\nNEH makespan : 55  (CPU 1.25 ms)"
        );
    }

    #[test]
    fn test_exact_display() {
        let mut schedule = Schedule::new();
        schedule.add_assignment(Assignment::new("B", 1, 0, "M1", 0, 2));
        schedule.add_assignment(Assignment::new("A", 0, 0, "M1", 2, 5));
        let report = ExactReport {
            backend: "branch-and-bound".into(),
            status: SolveStatus::Optimal,
            makespan: Some(7),
            best_bound: Some(7.0),
            gap: Some(0.0),
            nodes: 4,
            elapsed: Duration::from_millis(12),
            schedule: Some(schedule),
        };
        let text = report.to_string();
        assert!(text.contains("Status        : optimal"));
        assert!(text.contains("Optimal Cmax  : 7"));
        assert!(text.contains("Solve time    : 0.012 s"));
        assert!(text.contains("M1: B/1@0 A/1@2"));
        assert!(!text.contains("Gap"));
    }

    #[test]
    fn test_exact_display_gap_on_timeout() {
        let report = ExactReport {
            backend: "branch-and-bound".into(),
            status: SolveStatus::Timeout,
            makespan: Some(50),
            best_bound: Some(40.0),
            gap: Some(0.2),
            nodes: 1000,
            elapsed: Duration::from_millis(50),
            schedule: None,
        };
        let text = report.to_string();
        assert!(text.contains("Best Cmax     : 50"));
        assert!(text.contains("Gap           : 20.00 %"));
    }

    #[test]
    fn test_exact_display_without_solution() {
        let report = ExactReport {
            backend: "branch-and-bound".into(),
            status: SolveStatus::Timeout,
            makespan: None,
            best_bound: None,
            gap: None,
            nodes: 10,
            elapsed: Duration::ZERO,
            schedule: None,
        };
        let text = report.to_string();
        assert!(text.contains("Status        : timeout"));
        assert!(text.contains("Best Cmax     : n/a"));
        assert!(!report.is_optimal());
    }

    #[test]
    fn test_serialize() {
        let report = ExactReport {
            backend: "highs".into(),
            status: SolveStatus::Infeasible,
            makespan: None,
            best_bound: None,
            gap: None,
            nodes: 0,
            elapsed: Duration::ZERO,
            schedule: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "infeasible");
        assert_eq!(json["backend"], "highs");
    }
}
