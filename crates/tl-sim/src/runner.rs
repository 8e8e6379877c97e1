//! Fixed-period simulation runner.

use crate::clock::{Clock, TickSchedule};
use crate::error::SimResult;
use crate::process::PhysicalProcess;
use std::time::Duration;
use tl_store::StateStore;
use tracing::{debug, error, info, warn};

/// Runner timing options.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Tick period.
    pub period: Duration,
    /// Stop once this much time has elapsed since the first tick. `None`
    /// runs until `max_ticks` or forever.
    pub timeout: Option<Duration>,
    /// Wait before the first tick.
    pub startup_delay: Duration,
    /// Optional cap on the number of ticks.
    pub max_ticks: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            timeout: None,
            startup_delay: Duration::from_secs(3),
            max_ticks: None,
        }
    }
}

/// Totals of a completed run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    /// Level writes across all processes.
    pub updates: u64,
    /// Process-ticks skipped because the level tag was absent.
    pub skipped: u64,
    /// Tick deadlines skipped because a tick overran.
    pub missed_deadlines: u64,
    /// Time from the first tick to the end of the run.
    pub elapsed: Duration,
}

/// Drive `process` at a fixed cadence until the timeout expires.
///
/// The timeout is checked at the top of each iteration; a tick already in
/// progress always completes. Store failures abort the run.
pub fn run_loop<S, C>(
    process: &PhysicalProcess<S>,
    clock: &C,
    opts: &RunOptions,
) -> SimResult<RunSummary>
where
    S: StateStore,
    C: Clock + ?Sized,
{
    info!(
        processes = process.plan().process_count(),
        period_s = opts.period.as_secs_f64(),
        timeout_s = opts.timeout.map(|t| t.as_secs_f64()),
        "starting physical process"
    );

    if !opts.startup_delay.is_zero() {
        debug!(delay_s = opts.startup_delay.as_secs_f64(), "startup delay");
        clock.sleep(opts.startup_delay);
    }

    let start = clock.now();
    let mut schedule = TickSchedule::new(start, opts.period);
    let mut summary = RunSummary::default();

    loop {
        let elapsed = clock.now().saturating_sub(start);
        if let Some(timeout) = opts.timeout
            && elapsed >= timeout
        {
            break;
        }
        if let Some(max) = opts.max_ticks
            && summary.ticks >= max
        {
            break;
        }

        let report = match process.tick() {
            Ok(report) => report,
            Err(e) => {
                error!(tick = summary.ticks, error = %e, "tick failed, stopping");
                return Err(e);
            }
        };
        summary.ticks += 1;
        summary.updates += report.updated() as u64;
        summary.skipped += report.skipped() as u64;

        if let Some(max) = opts.max_ticks
            && summary.ticks >= max
        {
            break;
        }

        let missed = schedule.wait_next(clock);
        if missed > 0 {
            warn!(missed, "tick overran its period, skipping deadlines");
            summary.missed_deadlines += missed;
        }
    }

    summary.elapsed = clock.now().saturating_sub(start);
    info!(
        ticks = summary.ticks,
        updates = summary.updates,
        skipped = summary.skipped,
        elapsed_s = summary.elapsed.as_secs_f64(),
        "physical process finished"
    );
    Ok(summary)
}
