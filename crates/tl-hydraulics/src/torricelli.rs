//! Torricelli free-discharge speed.

use crate::error::{HydraulicsError, HydraulicsResult};
use tl_core::Real;

/// Discharge speed (m/s) through an opening at `valve_height` below a water
/// column of height `level`: `sqrt(2 g (level - valve_height))`.
///
/// A column at or below the opening does not discharge, so a negative head
/// yields `0.0` instead of NaN.
#[inline]
pub fn torricelli_speed(level: Real, valve_height: Real, gravity: Real) -> Real {
    let head = level - valve_height;
    if head <= 0.0 {
        return 0.0;
    }
    (2.0 * gravity * head).sqrt()
}

/// Checked form of [`torricelli_speed`] that reports a negative head.
pub fn try_torricelli_speed(level: Real, valve_height: Real, gravity: Real) -> HydraulicsResult<Real> {
    if !level.is_finite() || !valve_height.is_finite() {
        return Err(HydraulicsError::NonPhysical {
            what: "non-finite level or valve height",
        });
    }
    if level < valve_height {
        return Err(HydraulicsError::NegativeHead {
            level,
            valve_height,
        });
    }
    Ok(torricelli_speed(level, valve_height, gravity))
}
