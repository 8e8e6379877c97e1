//! tl-core: shared foundation for tankloop.
//!
//! Contains:
//! - units (uom SI types + constructors, hourly volume rates)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{TlError, TlResult};
pub use numeric::*;
pub use units::*;
