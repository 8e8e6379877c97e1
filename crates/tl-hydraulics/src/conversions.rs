//! Rate conversions from flows and speeds to level-change rates.

use tl_core::Real;

/// Level rise rate produced by a volumetric inflow.
///
/// `flow` in m^3/h, `tank_diameter` in m, result in m/h.
///
/// The testbed model divides by the diameter rather than by the
/// cross-sectional area. Controllers were tuned against this behavior, so it
/// is kept as is.
#[inline]
pub fn flow_to_height_rate(flow: Real, tank_diameter: Real) -> Real {
    flow / tank_diameter
}

/// Level change rate produced by water leaving through a valve.
///
/// `speed` in m/s through the valve, diameters in m, result in m/s. Scales
/// the speed by the ratio of valve to tank cross-sections.
#[inline]
pub fn speed_to_height_rate(speed: Real, valve_diameter: Real, tank_diameter: Real) -> Real {
    let ratio = valve_diameter / tank_diameter;
    speed * ratio * ratio
}
