//! tl-hydraulics: water-tank level model.
//!
//! Provides the hydraulic relations used by the testbed tank stage:
//! - flow-to-height and valve-speed-to-height conversions
//! - Torricelli free-discharge speed with a zero-speed clamp
//! - validated tank/valve geometry and outlet flow estimate
//! - the per-tick forward Euler level update
//!
//! Everything here is pure: no I/O, no state, deterministic in its inputs.
//!
//! # Example
//!
//! ```
//! use tl_core::units::{m, s};
//! use tl_hydraulics::{Gate, Inflow, TankGeometry, compute_new_level};
//!
//! let geometry = TankGeometry::new(m(1.0), m(0.1)).unwrap();
//! let inflows = [Inflow::new(10.0, Gate::Open)];
//! let level = compute_new_level(1.0, &inflows, &[], &geometry, s(5.0));
//! assert!((level - 1.013_888_9).abs() < 1e-6);
//! ```

pub mod conversions;
pub mod error;
pub mod geometry;
pub mod level;
pub mod sources;
pub mod torricelli;

pub use conversions::{flow_to_height_rate, speed_to_height_rate};
pub use error::{HydraulicsError, HydraulicsResult};
pub use geometry::TankGeometry;
pub use level::{LevelChange, compute_level_change, compute_new_level};
pub use sources::{Gate, Inflow, Outflow};
pub use torricelli::{torricelli_speed, try_torricelli_speed};
