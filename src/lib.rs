//! Re-entrant flow-shop scheduling for the U-Engine ecosystem.
//!
//! Jobs visit an ordered list of stages; several stages may run on the same
//! physical machine. Two paths minimize the makespan over one data model:
//!
//! - **Heuristic**: NEH sorted insertion scored by a permutation-flow-shop
//!   makespan evaluator.
//! - **Exact**: a disjunctive big-M model handed to a pluggable solver
//!   backend (built-in branch and bound, or HiGHS with the `milp` feature).
//!
//! # Modules
//!
//! - **`models`**: `ProblemData`, `Sequence`, `CompletionMatrix`, `Schedule`
//! - **`validation`**: Input integrity checks and schedule feasibility checks
//! - **`dispatching`**: Initial job ordering rules (LPT, SPT, input order)
//! - **`scheduler`**: `MakespanEvaluator`, `NehConstructor`, lower bounds, KPIs
//! - **`disjunctive`**: `DisjunctiveModelBuilder` and the model it produces
//! - **`solver`**: `SolverAdapter` contract, backends, backend selection
//! - **`config`** / **`report`** / **`pipeline`**: end-to-end runs
//!
//! # Example
//!
//! ```
//! use u_flowshop::config::SolveConfig;
//! use u_flowshop::models::ProblemData;
//! use u_flowshop::pipeline;
//!
//! let problem = ProblemData::reference();
//! let report = pipeline::run_heuristic(&problem, &SolveConfig::default().heuristic);
//! println!("{report}");
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Nawaz, Enscore & Ham (1983), "A heuristic algorithm for the m-machine,
//!   n-job flow-shop sequencing problem"
//! - Manne (1960), "On the job-shop scheduling problem"

pub mod config;
pub mod disjunctive;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod scheduler;
pub mod solver;
pub mod validation;

pub use error::{Error, Result};
