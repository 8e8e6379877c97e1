//! Per-tick tank level update.
//!
//! Forward Euler over one tick: the new level is the previous level plus the
//! net change accumulated from every open source during `period`.

use crate::conversions::{flow_to_height_rate, speed_to_height_rate};
use crate::geometry::TankGeometry;
use crate::sources::{Inflow, Outflow};
use tl_core::units::{SECONDS_PER_HOUR, Time};
use tl_core::Real;

/// Breakdown of one level update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelChange {
    /// Level before the tick (m).
    pub previous: Real,
    /// Total rise contributed by open inflows (m).
    pub inflow_gain: Real,
    /// Total drop caused by running pumps (m).
    pub outflow_loss: Real,
    /// Open inflows counted.
    pub open_inflows: usize,
    /// Running pumps counted.
    pub running_pumps: usize,
}

impl LevelChange {
    /// Level after the tick. Not clamped to the tank bounds.
    pub fn new_level(&self) -> Real {
        self.previous + self.inflow_gain - self.outflow_loss
    }
}

/// Compute the level change over one tick.
///
/// Each open inflow adds `(period_s / 3600) * flow / tank_diameter`. Each
/// running pump removes `period_s * speed_to_height_rate(v)`, where `v` is
/// the Torricelli speed at the level before the tick, shared by all pumps.
pub fn compute_level_change(
    current_level: Real,
    inflows: &[Inflow],
    outflows: &[Outflow],
    geometry: &TankGeometry,
    period: Time,
) -> LevelChange {
    let period_s = period.value;
    let tank_d = geometry.tank_diameter_m();

    let mut inflow_gain = 0.0;
    let mut open_inflows = 0;
    for inflow in inflows.iter().filter(|i| i.valve.is_open()) {
        inflow_gain += (period_s / SECONDS_PER_HOUR) * flow_to_height_rate(inflow.rate_m3ph, tank_d);
        open_inflows += 1;
    }

    let running_pumps = outflows.iter().filter(|o| o.pump.is_open()).count();
    let outflow_loss = if running_pumps > 0 {
        let speed = geometry.outlet_speed(current_level);
        let per_pump = period_s * speed_to_height_rate(speed, geometry.valve_diameter_m(), tank_d);
        per_pump * running_pumps as Real
    } else {
        0.0
    };

    LevelChange {
        previous: current_level,
        inflow_gain,
        outflow_loss,
        open_inflows,
        running_pumps,
    }
}

/// New tank level after one tick. See [`compute_level_change`].
pub fn compute_new_level(
    current_level: Real,
    inflows: &[Inflow],
    outflows: &[Outflow],
    geometry: &TankGeometry,
    period: Time,
) -> Real {
    compute_level_change(current_level, inflows, outflows, geometry, period).new_level()
}
