//! Tank and valve geometry.

use crate::error::HydraulicsResult;
use crate::torricelli::torricelli_speed;
use std::f64::consts::PI;
use tl_core::numeric::ensure_positive;
use tl_core::units::{Accel, Area, Length, VolumeRate, constants, mps};
use tl_core::Real;

/// Geometry constants of one tank stage.
///
/// Fixed for the lifetime of a simulation; validated on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankGeometry {
    tank_diameter: Length,
    valve_diameter: Length,
    gravity: Accel,
}

impl TankGeometry {
    /// Create a geometry with standard gravity.
    pub fn new(tank_diameter: Length, valve_diameter: Length) -> HydraulicsResult<Self> {
        Self::with_gravity(tank_diameter, valve_diameter, constants::g())
    }

    /// Create a geometry with an explicit gravitational acceleration.
    pub fn with_gravity(
        tank_diameter: Length,
        valve_diameter: Length,
        gravity: Accel,
    ) -> HydraulicsResult<Self> {
        ensure_positive(tank_diameter.value, "tank diameter")?;
        ensure_positive(valve_diameter.value, "valve diameter")?;
        ensure_positive(gravity.value, "gravity")?;
        Ok(Self {
            tank_diameter,
            valve_diameter,
            gravity,
        })
    }

    pub fn tank_diameter(&self) -> Length {
        self.tank_diameter
    }

    pub fn valve_diameter(&self) -> Length {
        self.valve_diameter
    }

    pub fn gravity(&self) -> Accel {
        self.gravity
    }

    /// Tank diameter in meters.
    pub fn tank_diameter_m(&self) -> Real {
        self.tank_diameter.value
    }

    /// Valve diameter in meters.
    pub fn valve_diameter_m(&self) -> Real {
        self.valve_diameter.value
    }

    /// Gravitational acceleration in m/s^2.
    pub fn gravity_mps2(&self) -> Real {
        self.gravity.value
    }

    /// Circular flow area of the outlet valve.
    pub fn valve_area(&self) -> Area {
        let radius = self.valve_diameter / 2.0;
        radius * radius * PI
    }

    /// Discharge speed through the outlet valve at the tank bottom.
    pub fn outlet_speed(&self, level: Real) -> Real {
        torricelli_speed(level, 0.0, self.gravity_mps2())
    }

    /// Estimated volumetric flow leaving through the outlet valve.
    ///
    /// Valve area times the Torricelli speed at `level` (m). Zero when the
    /// level is at or below the valve.
    pub fn outlet_flow(&self, level: Real) -> VolumeRate {
        self.valve_area() * mps(self.outlet_speed(level))
    }
}
