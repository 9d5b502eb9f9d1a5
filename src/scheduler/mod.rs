//! Heuristic sequencing, makespan evaluation, and KPIs.
//!
//! # Components
//!
//! - [`MakespanEvaluator`]: permutation-flow-shop completion times for a job
//!   order.
//! - [`NehConstructor`]: greedy sorted insertion using the evaluator as its
//!   scoring oracle.
//! - [`LowerBounds`]: job-length and resource-load bounds on the makespan.
//! - [`ScheduleKpi`]: schedule quality metrics.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 6
//! - Nawaz, Enscore & Ham (1983), "A heuristic algorithm for the m-machine,
//!   n-job flow-shop sequencing problem"

pub mod bounds;
mod evaluator;
mod kpi;
mod neh;

pub use bounds::LowerBounds;
pub use evaluator::{Evaluation, MakespanEvaluator};
pub use kpi::ScheduleKpi;
pub use neh::{NehConstructor, NehResult};
