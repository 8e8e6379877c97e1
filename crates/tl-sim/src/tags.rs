//! Tag names resolved once from the configuration.

use crate::config::{OutflowRouting, SimConfig};
use std::ops::RangeInclusive;
use tl_store::ProcessId;

/// Flow meter and inlet valve forming one inflow source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflowTags {
    pub sensor: String,
    pub valve: String,
}

/// A tag in a specific process scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAddress {
    pub process: ProcessId,
    pub tag: String,
}

/// Every tag name the simulator touches.
///
/// Each process scope carries the full set of stage inflow/valve/pump tags,
/// so the inflow and pump lists are shared by all processes. Level tags and
/// outlet targets are per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPlan {
    process_count: u32,
    inflows: Vec<InflowTags>,
    pumps: Vec<String>,
    levels: Vec<String>,
    outlet_targets: Vec<Option<TagAddress>>,
}

impl TagPlan {
    pub fn from_config(config: &SimConfig) -> Self {
        let tags = &config.tags;
        let stages = 1..=config.process_count;

        let inflows = stages
            .clone()
            .map(|n| InflowTags {
                sensor: tags.inflow_sensor(n),
                valve: tags.inflow_valve(n),
            })
            .collect();
        let pumps = stages.clone().map(|n| tags.outflow_pump(n)).collect();
        let levels = stages.clone().map(|n| tags.level(n)).collect();
        let outlet_targets = stages
            .map(|n| match &config.outflow_routing {
                OutflowRouting::Cascade => Some(TagAddress {
                    process: n + 1,
                    tag: tags.inflow_sensor(n + 1),
                }),
                OutflowRouting::Fixed { process_id, tag } => Some(TagAddress {
                    process: *process_id,
                    tag: tag.clone(),
                }),
                OutflowRouting::Disabled => None,
            })
            .collect();

        Self {
            process_count: config.process_count,
            inflows,
            pumps,
            levels,
            outlet_targets,
        }
    }

    pub fn process_count(&self) -> u32 {
        self.process_count
    }

    /// Process ids in tick order.
    pub fn processes(&self) -> RangeInclusive<ProcessId> {
        1..=self.process_count
    }

    pub fn inflows(&self) -> &[InflowTags] {
        &self.inflows
    }

    pub fn pumps(&self) -> &[String] {
        &self.pumps
    }

    /// Level tag of `process`, `None` outside 1..=process_count.
    pub fn level(&self, process: ProcessId) -> Option<&str> {
        let idx = (process as usize).checked_sub(1)?;
        self.levels.get(idx).map(String::as_str)
    }

    /// Where the outlet flow estimate of `process` is published.
    pub fn outlet_target(&self, process: ProcessId) -> Option<&TagAddress> {
        let idx = (process as usize).checked_sub(1)?;
        self.outlet_targets.get(idx)?.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(count: u32, routing: OutflowRouting) -> SimConfig {
        SimConfig {
            process_count: count,
            outflow_routing: routing,
            ..SimConfig::default()
        }
    }

    #[test]
    fn plan_lists_every_stage() {
        let plan = TagPlan::from_config(&config(3, OutflowRouting::Cascade));
        assert_eq!(plan.inflows().len(), 3);
        assert_eq!(plan.pumps().len(), 3);
        assert_eq!(plan.inflows()[0].sensor, "AI_FIT_101_FLOW");
        assert_eq!(plan.inflows()[2].valve, "DO_MV_301_OPEN");
        assert_eq!(plan.pumps()[1], "DO_P_201_START");
        assert_eq!(plan.processes().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn level_tags_per_process() {
        let plan = TagPlan::from_config(&config(2, OutflowRouting::Cascade));
        assert_eq!(plan.level(1), Some("AI_LIT_101_LEVEL"));
        assert_eq!(plan.level(2), Some("AI_LIT_201_LEVEL"));
        assert_eq!(plan.level(0), None);
        assert_eq!(plan.level(3), None);
    }

    #[test]
    fn cascade_targets_next_stage() {
        let plan = TagPlan::from_config(&config(2, OutflowRouting::Cascade));
        let first = plan.outlet_target(1).unwrap();
        assert_eq!(first.process, 2);
        assert_eq!(first.tag, "AI_FIT_201_FLOW");
        let second = plan.outlet_target(2).unwrap();
        assert_eq!(second.process, 3);
        assert_eq!(second.tag, "AI_FIT_301_FLOW");
    }

    #[test]
    fn fixed_and_disabled_targets() {
        let fixed = TagPlan::from_config(&config(
            2,
            OutflowRouting::Fixed {
                process_id: 2,
                tag: "AI_FIT_201_FLOW".to_string(),
            },
        ));
        assert_eq!(fixed.outlet_target(1), fixed.outlet_target(2));
        assert_eq!(fixed.outlet_target(1).unwrap().process, 2);

        let disabled = TagPlan::from_config(&config(2, OutflowRouting::Disabled));
        assert!(disabled.outlet_target(1).is_none());
    }

    #[test]
    fn cascade_last_stage_feeds_downstream_scope() {
        let plan = TagPlan::from_config(&config(3, OutflowRouting::Cascade));
        let last = plan.outlet_target(3).unwrap();
        assert_eq!(last.process, 4);
        assert_eq!(last.tag, "AI_FIT_401_FLOW");
        assert!(plan.level(4).is_none());
        assert!(plan.outlet_target(4).is_none());
    }
}
