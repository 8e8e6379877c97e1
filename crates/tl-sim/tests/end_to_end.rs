//! Store-driven scenarios for the physical process.
//!
//! Each test seeds a MemoryStore the way the PLC emulators would, runs the
//! simulator and checks what it published.

use std::time::Duration;
use tl_sim::{
    Clock, ManualClock, OutflowRouting, PhysicalProcess, ProcessUpdate, SimConfig, SimError, run_loop,
};
use tl_store::{MemoryStore, ProcessId, StateStore, StoreError, StoreResult, TagRow, TagValue};

fn config(process_count: u32, period_s: f64) -> SimConfig {
    SimConfig {
        process_count,
        period_s,
        startup_delay_s: 0.0,
        ..SimConfig::default()
    }
}

fn level(store: &MemoryStore, process: ProcessId) -> f64 {
    let tag = format!("AI_LIT_{process}01_LEVEL");
    store.read(process, &tag).unwrap().unwrap().value
}

#[test]
fn single_open_inflow_raises_level() {
    let store = MemoryStore::new();
    store.write(1.0, 1, "AI_LIT_101_LEVEL").unwrap();
    store.write(10.0, 1, "AI_FIT_101_FLOW").unwrap();
    store.write(1.0, 1, "DO_MV_101_OPEN").unwrap();
    store.write(0.0, 1, "DO_P_101_START").unwrap();

    let process = PhysicalProcess::new(&config(1, 5.0), &store).unwrap();
    process.tick().unwrap();

    let expected = 1.0 + (5.0 / 3600.0) * (10.0 / 1.0);
    assert!((level(&store, 1) - expected).abs() < 1e-12);
    assert!((level(&store, 1) - 1.013_89).abs() < 1e-5);
}

#[test]
fn running_pump_drains_level() {
    let store = MemoryStore::new();
    store.write(0.5, 1, "AI_LIT_101_LEVEL").unwrap();
    store.write(1.0, 1, "DO_P_101_START").unwrap();

    let process = PhysicalProcess::new(&config(1, 1.0), &store).unwrap();
    process.tick().unwrap();

    let expected = 0.5 - (2.0 * 9.81 * 0.5_f64).sqrt() * 0.01;
    assert!((level(&store, 1) - expected).abs() < 1e-12);
    assert!((level(&store, 1) - 0.468_68).abs() < 1e-5);
}

#[test]
fn missing_inflow_tag_is_excluded() {
    // Valve open but no meter reading yet
    let with_gap = MemoryStore::new();
    with_gap.write(1.0, 1, "AI_LIT_101_LEVEL").unwrap();
    with_gap.write(1.0, 1, "DO_MV_101_OPEN").unwrap();

    let baseline = MemoryStore::new();
    baseline.write(1.0, 1, "AI_LIT_101_LEVEL").unwrap();

    let cfg = config(1, 5.0);
    PhysicalProcess::new(&cfg, &with_gap).unwrap().tick().unwrap();
    PhysicalProcess::new(&cfg, &baseline).unwrap().tick().unwrap();

    assert_eq!(level(&with_gap, 1), level(&baseline, 1));
    assert_eq!(level(&with_gap, 1), 1.0);
}

#[test]
fn missing_valve_tag_is_excluded() {
    let store = MemoryStore::new();
    store.write(1.0, 1, "AI_LIT_101_LEVEL").unwrap();
    store.write(10.0, 1, "AI_FIT_101_FLOW").unwrap();

    PhysicalProcess::new(&config(1, 5.0), &store)
        .unwrap()
        .tick()
        .unwrap();
    assert_eq!(level(&store, 1), 1.0);
}

#[test]
fn every_configured_source_is_counted() {
    let period = 5.0;
    let all = MemoryStore::new();
    let one = MemoryStore::new();
    for store in [&all, &one] {
        store.write(1.0, 1, "AI_LIT_101_LEVEL").unwrap();
        store.write(10.0, 1, "AI_FIT_101_FLOW").unwrap();
        store.write(1.0, 1, "DO_MV_101_OPEN").unwrap();
    }
    for (n, flow) in [(2, 5.0), (3, 2.0)] {
        all.write(flow, 1, &format!("AI_FIT_{n}01_FLOW")).unwrap();
        all.write(1.0, 1, &format!("DO_MV_{n}01_OPEN")).unwrap();
    }

    let cfg = SimConfig {
        outflow_routing: OutflowRouting::Disabled,
        ..config(3, period)
    };
    let report_all = PhysicalProcess::new(&cfg, &all).unwrap().tick().unwrap();
    let report_one = PhysicalProcess::new(&cfg, &one).unwrap().tick().unwrap();

    let gain = |flow: f64| (period / 3600.0) * flow;
    assert!((level(&all, 1) - (1.0 + gain(17.0))).abs() < 1e-12);
    assert!((level(&one, 1) - (1.0 + gain(10.0))).abs() < 1e-12);

    match &report_all.processes[0].1 {
        ProcessUpdate::Updated { change, .. } => assert_eq!(change.open_inflows, 3),
        other => panic!("unexpected update {other:?}"),
    }
    match &report_one.processes[0].1 {
        ProcessUpdate::Updated { change, .. } => assert_eq!(change.open_inflows, 1),
        other => panic!("unexpected update {other:?}"),
    }
    // Tanks 2 and 3 have no level yet
    assert_eq!(report_all.skipped(), 2);
}

#[test]
fn all_pumps_share_one_outlet_speed() {
    let store = MemoryStore::new();
    store.write(0.5, 1, "AI_LIT_101_LEVEL").unwrap();
    store.write(1.0, 1, "DO_P_101_START").unwrap();
    store.write(1.0, 1, "DO_P_201_START").unwrap();

    let cfg = SimConfig {
        outflow_routing: OutflowRouting::Disabled,
        ..config(2, 1.0)
    };
    PhysicalProcess::new(&cfg, &store).unwrap().tick().unwrap();

    let per_pump = (2.0 * 9.81 * 0.5_f64).sqrt() * 0.01;
    assert!((level(&store, 1) - (0.5 - 2.0 * per_pump)).abs() < 1e-12);
}

#[test]
fn cascade_publishes_outlet_flow_to_next_stage() {
    let store = MemoryStore::new();
    store.write(0.5, 1, "AI_LIT_101_LEVEL").unwrap();

    PhysicalProcess::new(&config(1, 1.0), &store)
        .unwrap()
        .tick()
        .unwrap();

    let flow = store.read(2, "AI_FIT_201_FLOW").unwrap().unwrap().value;
    let expected = (2.0 * 9.81 * 0.5_f64).sqrt() * std::f64::consts::PI * 0.05 * 0.05 * 3600.0;
    assert!((flow - expected).abs() < 1e-9);
    // Own scope untouched
    assert_eq!(store.read(1, "AI_FIT_201_FLOW").unwrap(), None);
}

#[test]
fn cascade_feeds_downstream_tank_in_same_tick() {
    let store = MemoryStore::new();
    store.write(1.0, 1, "AI_LIT_101_LEVEL").unwrap();
    store.write(1.0, 1, "DO_P_101_START").unwrap();
    store.write(0.2, 2, "AI_LIT_201_LEVEL").unwrap();
    store.write(1.0, 2, "DO_MV_201_OPEN").unwrap();

    PhysicalProcess::new(&config(2, 1.0), &store)
        .unwrap()
        .tick()
        .unwrap();

    let published = store.read(2, "AI_FIT_201_FLOW").unwrap().unwrap().value;
    assert!(published > 0.0);
    let expected = 0.2 + (1.0 / 3600.0) * published;
    assert!((level(&store, 2) - expected).abs() < 1e-12);
    // Tank 2 publishes to stage 3
    assert!(store.read(3, "AI_FIT_301_FLOW").unwrap().is_some());
}

#[test]
fn fixed_routing_writes_single_target() {
    let store = MemoryStore::new();
    store.write(0.5, 1, "AI_LIT_101_LEVEL").unwrap();
    let cfg = SimConfig {
        outflow_routing: OutflowRouting::Fixed {
            process_id: 9,
            tag: "OUTLET_FLOW".to_string(),
        },
        ..config(1, 1.0)
    };
    PhysicalProcess::new(&cfg, &store).unwrap().tick().unwrap();
    assert!(store.read(9, "OUTLET_FLOW").unwrap().is_some());
    assert_eq!(store.read(2, "AI_FIT_201_FLOW").unwrap(), None);
}

#[test]
fn run_integrates_from_previous_level_until_timeout() {
    let store = MemoryStore::new();
    store.write(1.0, 1, "AI_LIT_101_LEVEL").unwrap();
    store.write(10.0, 1, "AI_FIT_101_FLOW").unwrap();
    store.write(1.0, 1, "DO_MV_101_OPEN").unwrap();

    let cfg = SimConfig {
        timeout_s: Some(25.0),
        startup_delay_s: 3.0,
        ..config(1, 5.0)
    };
    let process = PhysicalProcess::new(&cfg, &store).unwrap();
    let clock = ManualClock::new();
    let summary = run_loop(&process, &clock, &cfg.run_options().unwrap()).unwrap();

    // Ticks at 0, 5, 10, 15, 20 s after the startup delay
    assert_eq!(summary.ticks, 5);
    assert_eq!(summary.updates, 5);
    assert_eq!(summary.elapsed, Duration::from_secs(25));
    assert_eq!(clock.now(), Duration::from_secs(28));

    let expected = 1.0 + 5.0 * (5.0 / 3600.0) * 10.0;
    assert!((level(&store, 1) - expected).abs() < 1e-12);
}

#[test]
fn level_appearing_mid_run_is_picked_up() {
    let store = MemoryStore::new();
    let cfg = config(1, 1.0);
    let process = PhysicalProcess::new(&cfg, &store).unwrap();

    assert_eq!(process.tick().unwrap().skipped(), 1);
    store.write(0.8, 1, "AI_LIT_101_LEVEL").unwrap();
    assert_eq!(process.tick().unwrap().updated(), 1);
    assert_eq!(level(&store, 1), 0.8);
}

/// Store whose backend has gone away.
struct UnavailableStore;

impl StateStore for UnavailableStore {
    fn read(&self, _process: ProcessId, _tag: &str) -> StoreResult<Option<TagValue>> {
        Err(StoreError::Unavailable {
            message: "connection refused".to_string(),
        })
    }

    fn write(&self, _value: f64, _process: ProcessId, _tag: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable {
            message: "connection refused".to_string(),
        })
    }

    fn rows(&self) -> StoreResult<Vec<TagRow>> {
        Ok(Vec::new())
    }
}

#[test]
fn unavailable_store_aborts_run() {
    let cfg = SimConfig {
        timeout_s: Some(10.0),
        ..config(1, 1.0)
    };
    let process = PhysicalProcess::new(&cfg, UnavailableStore).unwrap();
    let clock = ManualClock::new();

    let err = run_loop(&process, &clock, &cfg.run_options().unwrap()).unwrap_err();
    assert!(matches!(err, SimError::Store(StoreError::Unavailable { .. })));
    // Failed on the first tick, no sleeping afterwards
    assert_eq!(clock.now(), Duration::ZERO);
}

/// Reads succeed, writes are rejected.
struct ReadOnlyStore(MemoryStore);

impl StateStore for ReadOnlyStore {
    fn read(&self, process: ProcessId, tag: &str) -> StoreResult<Option<TagValue>> {
        self.0.read(process, tag)
    }

    fn write(&self, _value: f64, _process: ProcessId, _tag: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable {
            message: "read-only replica".to_string(),
        })
    }

    fn rows(&self) -> StoreResult<Vec<TagRow>> {
        self.0.rows()
    }
}

#[test]
fn failed_write_surfaces_error() {
    let inner = MemoryStore::new();
    inner.write(0.5, 1, "AI_LIT_101_LEVEL").unwrap();
    let process = PhysicalProcess::new(&config(1, 1.0), ReadOnlyStore(inner)).unwrap();

    assert!(matches!(process.tick(), Err(SimError::Store(_))));
}
