mod error;

use clap::{Parser, Subcommand};
use error::{CliError, CliResult};
use std::path::{Path, PathBuf};
use tl_sim::{
    PhysicalProcess, ProcessUpdate, SimConfig, SystemClock, TagPlan, run_loop,
};
use tl_store::{JsonFileStore, StateStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tl-cli")]
#[command(about = "TankLoop - water tank physical process for control testbeds", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the physical process loop
    Run {
        /// Simulation config (YAML); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Shared state store file (JSON)
        #[arg(short, long)]
        store: PathBuf,
        /// Override the run timeout in seconds
        #[arg(long)]
        timeout: Option<f64>,
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
        /// Skip the startup delay
        #[arg(long)]
        no_delay: bool,
    },
    /// Advance every tank by a single tick
    Step {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        store: PathBuf,
    },
    /// Populate a store with initial level, inflow and actuator tags
    Seed {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        store: PathBuf,
        /// Initial level of every tank (m)
        #[arg(long, default_value_t = 0.5)]
        level: f64,
        /// Reading of every inflow meter (m^3/h)
        #[arg(long, default_value_t = 0.0)]
        inflow: f64,
        /// Open every inlet valve
        #[arg(long)]
        open_valves: bool,
        /// Start every pump
        #[arg(long)]
        start_pumps: bool,
    },
    /// Print the tags held in a store
    Show {
        #[arg(short, long)]
        store: PathBuf,
        /// Only show one process scope
        #[arg(short, long)]
        process: Option<u32>,
    },
    /// Validate a simulation config
    Validate {
        config: PathBuf,
    },
    /// Print the default config as YAML
    DefaultConfig,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            store,
            timeout,
            ticks,
            no_delay,
        } => cmd_run(config.as_deref(), &store, timeout, ticks, no_delay),
        Commands::Step { config, store } => cmd_step(config.as_deref(), &store),
        Commands::Seed {
            config,
            store,
            level,
            inflow,
            open_valves,
            start_pumps,
        } => cmd_seed(
            config.as_deref(),
            &store,
            level,
            inflow,
            open_valves,
            start_pumps,
        ),
        Commands::Show { store, process } => cmd_show(&store, process),
        Commands::Validate { config } => cmd_validate(&config),
        Commands::DefaultConfig => cmd_default_config(),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(path: Option<&Path>) -> CliResult<SimConfig> {
    match path {
        Some(path) => Ok(SimConfig::load_yaml(path)?),
        None => Ok(SimConfig::default()),
    }
}

fn cmd_run(
    config_path: Option<&Path>,
    store_path: &Path,
    timeout: Option<f64>,
    ticks: Option<u64>,
    no_delay: bool,
) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(t) = timeout {
        config.timeout_s = Some(t);
    }
    if no_delay {
        config.startup_delay_s = 0.0;
    }
    config.validate()?;

    let mut opts = config.run_options()?;
    opts.max_ticks = ticks;

    let store = JsonFileStore::new(store_path);
    let process = PhysicalProcess::new(&config, store)?;
    let summary = run_loop(&process, &SystemClock::new(), &opts)?;

    println!(
        "✓ Ran {} ticks in {:.1}s ({} level updates, {} skipped)",
        summary.ticks,
        summary.elapsed.as_secs_f64(),
        summary.updates,
        summary.skipped
    );
    if summary.missed_deadlines > 0 {
        println!("  Missed deadlines: {}", summary.missed_deadlines);
    }
    Ok(())
}

fn cmd_step(config_path: Option<&Path>, store_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let process = PhysicalProcess::new(&config, JsonFileStore::new(store_path))?;
    let report = process.tick()?;

    for (id, update) in &report.processes {
        match update {
            ProcessUpdate::NoLevel => println!("  P{}: no level yet, skipped", id),
            ProcessUpdate::Updated {
                change,
                level,
                outlet_flow_m3ph,
            } => println!(
                "  P{}: {:.4} -> {:.4} m  (inflows {}, pumps {}, outlet {:.3} m³/h)",
                id,
                change.previous,
                level,
                change.open_inflows,
                change.running_pumps,
                outlet_flow_m3ph
            ),
        }
    }
    Ok(())
}

fn cmd_seed(
    config_path: Option<&Path>,
    store_path: &Path,
    level: f64,
    inflow: f64,
    open_valves: bool,
    start_pumps: bool,
) -> CliResult<()> {
    if !level.is_finite() || !inflow.is_finite() || inflow < 0.0 {
        return Err(CliError::InvalidInput(
            "level must be finite and inflow non-negative".to_string(),
        ));
    }
    let config = load_config(config_path)?;
    let plan = TagPlan::from_config(&config);
    let store = JsonFileStore::new(store_path);

    let valve = if open_valves { 1.0 } else { 0.0 };
    let pump = if start_pumps { 1.0 } else { 0.0 };
    let mut written = 0;
    for process in plan.processes() {
        if let Some(tag) = plan.level(process) {
            store.write(level, process, tag)?;
            written += 1;
        }
        for tags in plan.inflows() {
            store.write(inflow, process, &tags.sensor)?;
            store.write(valve, process, &tags.valve)?;
            written += 2;
        }
        for tag in plan.pumps() {
            store.write(pump, process, tag)?;
            written += 1;
        }
    }

    println!("✓ Seeded {} tags in {}", written, store_path.display());
    Ok(())
}

fn cmd_show(store_path: &Path, process: Option<u32>) -> CliResult<()> {
    let store = JsonFileStore::new(store_path);
    let rows: Vec<_> = store
        .rows()?
        .into_iter()
        .filter(|r| process.is_none_or(|p| r.process_id == p))
        .collect();

    if rows.is_empty() {
        println!("No tags found");
        return Ok(());
    }
    println!("{:>4}  {:<24} {:>14}  timestamp", "pid", "tag", "value");
    for row in rows {
        println!(
            "{:>4}  {:<24} {:>14.4}  {}",
            row.process_id,
            row.tag,
            row.value,
            row.timestamp.to_rfc3339()
        );
    }
    Ok(())
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = SimConfig::load_yaml(config_path)?;
    println!("✓ Config is valid");
    println!(
        "  {} process(es), period {} s, timeout {}",
        config.process_count,
        config.period_s,
        config
            .timeout_s
            .map(|t| format!("{t} s"))
            .unwrap_or_else(|| "none".to_string())
    );
    Ok(())
}

fn cmd_default_config() -> CliResult<()> {
    print!("{}", SimConfig::default().to_yaml_string()?);
    Ok(())
}
