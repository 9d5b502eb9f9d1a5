//! Flow-shop domain models.
//!
//! Provides the data types shared by the heuristic and exact paths:
//! validated problem data, job sequences with their completion matrices,
//! and the decoded schedule.
//!
//! # Domain Mappings
//!
//! | u-flowshop | Manufacturing | Laboratory | Logistics |
//! |------------|---------------|------------|-----------|
//! | Job | Order/Lot | Sample batch | Shipment |
//! | Stage | Routing step | Protocol step | Handling step |
//! | Machine | Work center | Instrument | Dock/Crane |
//! | Schedule | Production plan | Run plan | Yard plan |

mod problem;
mod schedule;
mod sequence;

pub use problem::{Job, ProblemData, ProblemInput};
pub use schedule::{Assignment, Schedule, Violation, ViolationType};
pub use sequence::{CompletionMatrix, Sequence};
