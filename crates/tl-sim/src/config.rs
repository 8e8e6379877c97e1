//! Simulation configuration.
//!
//! Read once at startup; nothing here is re-read per tick.
//!
//! ```yaml
//! process_count: 3
//! period_s: 1.0
//! timeout_s: 3600.0
//! startup_delay_s: 3.0
//! geometry:
//!   tank_diameter_m: 1.38
//!   valve_diameter_m: 0.1
//! outflow_routing:
//!   mode: cascade
//! ```

use crate::error::{SimError, SimResult};
use crate::runner::RunOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tl_core::constants::G_MPS2;
use tl_core::units::{Time, m, mps2, s};
use tl_hydraulics::TankGeometry;
use tl_store::ProcessId;

/// Placeholder replaced by the stage index in tag patterns.
pub const INDEX_PLACEHOLDER: &str = "{n}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of tanks, indexed 1..=process_count.
    pub process_count: u32,
    /// Tick period (s).
    pub period_s: f64,
    /// Total run time (s). Runs indefinitely when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_s: Option<f64>,
    /// Wait before the first tick so PLC emulators can populate the store (s).
    pub startup_delay_s: f64,
    pub geometry: GeometryConfig,
    pub tags: TagSchema,
    pub outflow_routing: OutflowRouting,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            process_count: 1,
            period_s: 1.0,
            timeout_s: None,
            startup_delay_s: 3.0,
            geometry: GeometryConfig::default(),
            tags: TagSchema::default(),
            outflow_routing: OutflowRouting::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub tank_diameter_m: f64,
    pub valve_diameter_m: f64,
    pub gravity_mps2: f64,
    /// Physical tank height. Only used to warn about overflow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tank_height_m: Option<f64>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            tank_diameter_m: 1.0,
            valve_diameter_m: 0.1,
            gravity_mps2: G_MPS2,
            tank_height_m: None,
        }
    }
}

/// Tag name patterns, `{n}` standing for a stage index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagSchema {
    pub inflow_sensor: String,
    pub inflow_valve: String,
    pub outflow_pump: String,
    pub level: String,
}

impl Default for TagSchema {
    fn default() -> Self {
        Self {
            inflow_sensor: "AI_FIT_{n}01_FLOW".to_string(),
            inflow_valve: "DO_MV_{n}01_OPEN".to_string(),
            outflow_pump: "DO_P_{n}01_START".to_string(),
            level: "AI_LIT_{n}01_LEVEL".to_string(),
        }
    }
}

impl TagSchema {
    pub fn inflow_sensor(&self, n: ProcessId) -> String {
        expand(&self.inflow_sensor, n)
    }

    pub fn inflow_valve(&self, n: ProcessId) -> String {
        expand(&self.inflow_valve, n)
    }

    pub fn outflow_pump(&self, n: ProcessId) -> String {
        expand(&self.outflow_pump, n)
    }

    pub fn level(&self, n: ProcessId) -> String {
        expand(&self.level, n)
    }

    fn patterns(&self) -> [&str; 4] {
        [
            self.inflow_sensor.as_str(),
            self.inflow_valve.as_str(),
            self.outflow_pump.as_str(),
            self.level.as_str(),
        ]
    }
}

fn expand(pattern: &str, n: ProcessId) -> String {
    pattern.replace(INDEX_PLACEHOLDER, &n.to_string())
}

/// Where each tank's outlet flow estimate is published.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OutflowRouting {
    /// Tank `i` feeds the inflow sensor of stage `i + 1`, in that stage's scope.
    /// The last tank publishes to stage `process_count + 1`, the downstream
    /// stage outside the simulated range, so a single tank feeds stage 2.
    #[default]
    Cascade,
    /// Every tank publishes to one fixed tag.
    Fixed { process_id: ProcessId, tag: String },
    /// No outlet flow is published.
    Disabled,
}

impl SimConfig {
    pub fn from_yaml_str(content: &str) -> SimResult<Self> {
        let config: SimConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_yaml(path: &Path) -> SimResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml_string(&self) -> SimResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.process_count == 0 {
            return Err(SimError::InvalidConfig {
                what: "process_count must be at least 1",
            });
        }
        if !(self.period_s.is_finite() && self.period_s > 0.0) {
            return Err(SimError::InvalidConfig {
                what: "period_s must be positive and finite",
            });
        }
        if let Some(timeout) = self.timeout_s
            && !(timeout.is_finite() && timeout >= 0.0)
        {
            return Err(SimError::InvalidConfig {
                what: "timeout_s must be non-negative and finite",
            });
        }
        if !(self.startup_delay_s.is_finite() && self.startup_delay_s >= 0.0) {
            return Err(SimError::InvalidConfig {
                what: "startup_delay_s must be non-negative and finite",
            });
        }
        if let Some(height) = self.geometry.tank_height_m
            && !(height.is_finite() && height > 0.0)
        {
            return Err(SimError::InvalidConfig {
                what: "tank_height_m must be positive and finite",
            });
        }
        self.tank_geometry()?;
        self.run_options()?;

        for pattern in self.tags.patterns() {
            if !pattern.contains(INDEX_PLACEHOLDER) {
                return Err(SimError::InvalidConfig {
                    what: "tag patterns must contain {n}",
                });
            }
        }
        if let OutflowRouting::Fixed { process_id, tag } = &self.outflow_routing
            && (*process_id == 0 || tag.trim().is_empty())
        {
            return Err(SimError::InvalidConfig {
                what: "fixed outflow routing needs a process_id >= 1 and a tag",
            });
        }
        Ok(())
    }

    /// Validated geometry constants.
    pub fn tank_geometry(&self) -> SimResult<TankGeometry> {
        Ok(TankGeometry::with_gravity(
            m(self.geometry.tank_diameter_m),
            m(self.geometry.valve_diameter_m),
            mps2(self.geometry.gravity_mps2),
        )?)
    }

    pub fn period(&self) -> Time {
        s(self.period_s)
    }

    /// Runner timing. Fails for values a `Duration` cannot hold.
    pub fn run_options(&self) -> SimResult<RunOptions> {
        Ok(RunOptions {
            period: duration(self.period_s, "period_s out of range")?,
            timeout: self
                .timeout_s
                .map(|t| duration(t, "timeout_s out of range"))
                .transpose()?,
            startup_delay: duration(self.startup_delay_s, "startup_delay_s out of range")?,
            max_ticks: None,
        })
    }
}

fn duration(secs: f64, what: &'static str) -> SimResult<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|_| SimError::InvalidConfig { what })
}
