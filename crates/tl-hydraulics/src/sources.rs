//! Flow sources feeding and draining a tank.

use tl_core::Real;

/// Boolean actuator state gating a flow source for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gate {
    Open,
    #[default]
    Closed,
}

impl Gate {
    /// Interpret a stored actuator reading: any non-zero value is open.
    pub fn from_reading(value: Real) -> Self {
        if value != 0.0 && !value.is_nan() {
            Gate::Open
        } else {
            Gate::Closed
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Gate::Open)
    }
}

impl From<bool> for Gate {
    fn from(open: bool) -> Self {
        if open { Gate::Open } else { Gate::Closed }
    }
}

/// Metered inflow (m^3/h) behind an inlet valve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inflow {
    pub rate_m3ph: Real,
    pub valve: Gate,
}

impl Inflow {
    pub fn new(rate_m3ph: Real, valve: Gate) -> Self {
        Self { rate_m3ph, valve }
    }
}

/// Pump drawing through the tank's outlet valve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outflow {
    pub pump: Gate,
}

impl Outflow {
    pub fn new(pump: Gate) -> Self {
        Self { pump }
    }
}
