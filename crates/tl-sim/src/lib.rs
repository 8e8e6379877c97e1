//! Physical process simulation loop for the tank stage.
//!
//! Provides:
//! - YAML configuration with validation
//! - Tag plan derived once from the configuration
//! - Clock abstraction and drift-corrected tick schedule
//! - Per-tick store read / level update / store write over every process
//! - Fixed-period runner with startup delay and timeout
//!
//! The simulator is the only writer of the level tags. Everything else in
//! the shared store (flow meters, valves, pumps) belongs to other actors and
//! is only read.

pub mod clock;
pub mod config;
pub mod error;
pub mod process;
pub mod runner;
pub mod tags;

pub use clock::{Clock, ManualClock, SystemClock, TickSchedule};
pub use config::{GeometryConfig, OutflowRouting, SimConfig, TagSchema};
pub use error::{SimError, SimResult};
pub use process::{PhysicalProcess, ProcessUpdate, TickReport};
pub use runner::{RunOptions, RunSummary, run_loop};
pub use tags::{InflowTags, TagAddress, TagPlan};
