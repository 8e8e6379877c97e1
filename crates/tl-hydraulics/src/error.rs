//! Error types for hydraulic calculations.

use thiserror::Error;
use tl_core::TlError;

/// Errors raised by the checked hydraulic APIs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydraulicsError {
    /// Water column below the opening: the Torricelli radicand is negative.
    #[error("Negative head: level {level} m is below valve height {valve_height} m")]
    NegativeHead { level: f64, valve_height: f64 },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid geometry: {0}")]
    Geometry(#[from] TlError),
}

pub type HydraulicsResult<T> = Result<T, HydraulicsError>;
