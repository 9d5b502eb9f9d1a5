//! Schedule quality metrics (KPIs).
//!
//! Computes standard indicators from a decoded schedule, so heuristic and
//! exact results can be compared on the same footing.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Avg Utilization | Mean machine busyness over the makespan |
//! | Avg Flow Time | Mean job completion time (all jobs released at 0) |
//! | Total Idle | Sum over machines of (makespan - busy time) |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Schedule;

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Makespan: latest completion time.
    pub makespan: i64,
    /// Average machine utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Per-machine utilization.
    pub utilization_by_machine: BTreeMap<String, f64>,
    /// Average job completion time.
    pub avg_flow_time: f64,
    /// Total idle time across machines within the makespan.
    pub total_idle: i64,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let makespan = schedule.makespan();

        let mut completion: BTreeMap<&str, i64> = BTreeMap::new();
        let mut busy: BTreeMap<&str, i64> = BTreeMap::new();
        for a in &schedule.assignments {
            let c = completion.entry(a.job_id.as_str()).or_insert(0);
            *c = (*c).max(a.end);
            *busy.entry(a.machine_id.as_str()).or_insert(0) += a.duration();
        }

        let avg_flow_time = if completion.is_empty() {
            0.0
        } else {
            completion.values().sum::<i64>() as f64 / completion.len() as f64
        };

        let total_idle = busy.values().map(|b| makespan - b).sum();

        let utilization_by_machine = schedule.all_utilizations();
        let avg_utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            utilization_by_machine.values().sum::<f64>() / utilization_by_machine.len() as f64
        };

        Self {
            makespan,
            avg_utilization,
            utilization_by_machine,
            avg_flow_time,
            total_idle,
        }
    }
}
