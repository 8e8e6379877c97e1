//! One simulation tick over every tracked tank.

use crate::config::SimConfig;
use crate::error::SimResult;
use crate::tags::TagPlan;
use tl_core::units::{Time, to_m3ph};
use tl_core::{Real, round_to};
use tl_hydraulics::{
    Gate, Inflow, LevelChange, Outflow, TankGeometry, compute_level_change,
};
use tl_store::{ProcessId, StateStore};
use tracing::{debug, warn};

/// Outcome of one process in one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessUpdate {
    /// Level tag not populated yet; nothing was written.
    NoLevel,
    /// Level and outlet flow were published.
    Updated {
        change: LevelChange,
        level: Real,
        outlet_flow_m3ph: Real,
    },
}

/// Per-process outcomes of one tick, in process order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub processes: Vec<(ProcessId, ProcessUpdate)>,
}

impl TickReport {
    pub fn updated(&self) -> usize {
        self.processes
            .iter()
            .filter(|(_, u)| matches!(u, ProcessUpdate::Updated { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.processes.len() - self.updated()
    }

    /// New level published for `process` during this tick.
    pub fn level_of(&self, process: ProcessId) -> Option<Real> {
        self.processes.iter().find_map(|(id, u)| match u {
            ProcessUpdate::Updated { level, .. } if *id == process => Some(*level),
            _ => None,
        })
    }
}

/// Physical process of the tank stage, bound to a shared store.
///
/// Sole writer of the level tags. Flow meter, valve and pump tags are
/// owned by other testbed actors and only read here; each read is an
/// independent snapshot.
#[derive(Debug)]
pub struct PhysicalProcess<S> {
    store: S,
    plan: TagPlan,
    geometry: TankGeometry,
    period: Time,
    tank_height_m: Option<Real>,
}

impl<S: StateStore> PhysicalProcess<S> {
    /// Validate the configuration and resolve tag names once.
    pub fn new(config: &SimConfig, store: S) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            plan: TagPlan::from_config(config),
            geometry: config.tank_geometry()?,
            period: config.period(),
            tank_height_m: config.geometry.tank_height_m,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn plan(&self) -> &TagPlan {
        &self.plan
    }

    pub fn geometry(&self) -> &TankGeometry {
        &self.geometry
    }

    /// Advance every tank by one period.
    ///
    /// A store failure aborts the tick; tanks already processed keep their
    /// new level.
    pub fn tick(&self) -> SimResult<TickReport> {
        let mut report = TickReport::default();
        for process in self.plan.processes() {
            let update = self.step(process)?;
            report.processes.push((process, update));
        }
        Ok(report)
    }

    /// Advance one tank by one period.
    pub fn step(&self, process: ProcessId) -> SimResult<ProcessUpdate> {
        let inflows = self.read_inflows(process)?;
        let outflows = self.read_outflows(process)?;

        let Some(level_tag) = self.plan.level(process) else {
            return Ok(ProcessUpdate::NoLevel);
        };
        let Some(reading) = self.store.read(process, level_tag)? else {
            debug!(process, tag = level_tag, "level not in state store yet, skipping");
            return Ok(ProcessUpdate::NoLevel);
        };
        let current = reading.value;
        debug!(process, level = round_to(current, 4), "read level from state store");

        if current < 0.0 {
            warn!(
                process,
                level = round_to(current, 4),
                "level below valve, outlet speed clamped to zero"
            );
        }

        let outlet_flow_m3ph = to_m3ph(self.geometry.outlet_flow(current));
        if let Some(target) = self.plan.outlet_target(process) {
            self.store
                .write(outlet_flow_m3ph, target.process, &target.tag)?;
            debug!(
                process,
                target_process = target.process,
                tag = %target.tag,
                flow_m3ph = round_to(outlet_flow_m3ph, 4),
                "published outlet flow"
            );
        }

        let change = compute_level_change(current, &inflows, &outflows, &self.geometry, self.period);
        let level = change.new_level();
        self.check_bounds(process, level);

        self.store.write(level, process, level_tag)?;
        debug!(
            process,
            level = round_to(level, 4),
            open_inflows = change.open_inflows,
            running_pumps = change.running_pumps,
            "wrote level to state store"
        );

        Ok(ProcessUpdate::Updated {
            change,
            level,
            outlet_flow_m3ph,
        })
    }

    /// Inflow sources visible in `process`'s scope. A source whose meter or
    /// valve tag is absent is left out for this tick.
    fn read_inflows(&self, process: ProcessId) -> SimResult<Vec<Inflow>> {
        let mut inflows = Vec::with_capacity(self.plan.inflows().len());
        for tags in self.plan.inflows() {
            let Some(flow) = self.store.read(process, &tags.sensor)? else {
                debug!(process, tag = %tags.sensor, "inflow meter absent, skipping source");
                continue;
            };
            let Some(valve) = self.store.read(process, &tags.valve)? else {
                debug!(process, tag = %tags.valve, "inlet valve absent, skipping source");
                continue;
            };
            inflows.push(Inflow::new(flow.value, Gate::from_reading(valve.value)));
        }
        Ok(inflows)
    }

    fn read_outflows(&self, process: ProcessId) -> SimResult<Vec<Outflow>> {
        let mut outflows = Vec::with_capacity(self.plan.pumps().len());
        for tag in self.plan.pumps() {
            match self.store.read(process, tag)? {
                Some(pump) => outflows.push(Outflow::new(Gate::from_reading(pump.value))),
                None => debug!(process, tag = %tag, "pump state absent, skipping source"),
            }
        }
        Ok(outflows)
    }

    fn check_bounds(&self, process: ProcessId, level: Real) {
        if level < 0.0 {
            warn!(process, level = round_to(level, 4), "simulated level below zero");
        }
        if let Some(height) = self.tank_height_m
            && level > height
        {
            warn!(
                process,
                level = round_to(level, 4),
                tank_height_m = height,
                "simulated level above tank height"
            );
        }
    }
}
