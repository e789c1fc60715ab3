//! bus_subsidy: multi-day mode-shift sweep driven by a bus-subsidy policy.
//!
//! Loads a scenario (the built-in `scenario.toml` unless `--config` is
//! given), runs every `(simulation, day)` through the external traffic
//! simulator and writes:
//!
//! - `summary_per_run.csv` and `flow_schedule.csv` (or the SQLite/Parquet
//!   equivalents with `--format`)
//! - `aggregated_tripinfo_emissions.csv`
//!
//! Set `RUST_LOG=debug` for per-day detail and `SUMO_BINARY` to point at a
//! simulator outside `PATH`.

mod scenario;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};

use ms_flow::load_templates_csv;
use ms_output::{CsvWriter, OutputWriter, SweepOutputObserver, aggregate_tables};
use ms_policy::Policy;
use ms_sim::{ProcessSimulator, SimulationRun, Sweep, SweepBuilder};

use scenario::Scenario;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Sqlite,
    Parquet,
}

#[derive(Debug, Parser)]
#[command(name = "bus_subsidy", version, about = "Policy-driven multi-day traffic simulation sweep")]
struct Cli {
    /// Scenario TOML file; the built-in scenario is used when omitted.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Route templates CSV (mode,flow_id,edges,begin,end,share); replaces
    /// the scenario's [routes].
    #[arg(long)]
    routes: Option<PathBuf>,

    #[arg(long)]
    simulations: Option<u32>,

    #[arg(long)]
    days: Option<u32>,

    #[arg(long, allow_hyphen_values = true)]
    population: Option<i64>,

    #[arg(long)]
    output: Option<PathBuf>,

    /// Backend for the per-day summary and flow schedule.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Plan every day and write routes files, but never start the simulator.
    #[arg(long)]
    dry_run: bool,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let scenario = match &cli.config {
        Some(path) => Scenario::load(path)?,
        None => Scenario::builtin()?,
    };

    let mut config = scenario.sweep.clone().with_env_overrides();
    if let Some(n) = cli.simulations {
        config.n_simulations = n;
    }
    if let Some(n) = cli.days {
        config.days_per_sim = n;
    }
    if let Some(n) = cli.population {
        config.population = n;
    }
    if let Some(dir) = &cli.output {
        config.output_dir = dir.clone();
    }

    let policy: Policy = scenario.policy()?;
    let templates = match &cli.routes {
        Some(path) => load_templates_csv(path)?,
        None => scenario.routes.clone().unwrap_or_default(),
    };
    let delimiter = config.converter.as_ref().map_or(b';', |c| c.delimiter_byte());

    log::info!(
        "policy {} ({}), {} route template(s), simulator {}",
        policy.id(),
        policy.kind().name(),
        templates.len(),
        config.simulator.binary.display(),
    );

    let simulator = ProcessSimulator::new(&config.simulator);
    let sweep = SweepBuilder::new(config, policy, templates, simulator).build()?;
    sweep.layout().prepare()?;
    let root = sweep.layout().root().to_path_buf();

    let t0 = Instant::now();
    let runs = match cli.format {
        OutputFormat::Csv => drive(&sweep, CsvWriter::new(&root)?, cli.dry_run)?,
        #[cfg(feature = "sqlite")]
        OutputFormat::Sqlite => drive(&sweep, ms_output::SqliteWriter::new(&root)?, cli.dry_run)?,
        #[cfg(feature = "parquet")]
        OutputFormat::Parquet => drive(&sweep, ms_output::ParquetWriter::new(&root)?, cli.dry_run)?,
        #[allow(unreachable_patterns)]
        other => bail!("output format {other:?} needs the `{}` feature", format!("{other:?}").to_lowercase()),
    };
    let elapsed = t0.elapsed();

    if !cli.dry_run {
        aggregate_tables(&runs, delimiter, &sweep.layout().aggregated_csv())?;
    }

    print_summary(&runs);
    println!();
    println!("Sweep finished in {:.3} s; output in {}", elapsed.as_secs_f64(), root.display());
    Ok(())
}

fn drive<W: OutputWriter>(
    sweep:   &Sweep<Policy, ProcessSimulator>,
    writer:  W,
    dry_run: bool,
) -> Result<Vec<SimulationRun>> {
    let mut obs = SweepOutputObserver::new(writer);
    let runs = if dry_run { sweep.dry_run(&mut obs)? } else { sweep.run(&mut obs)? };
    if let Some(e) = obs.take_error() {
        log::error!("output error: {e}");
    }
    Ok(runs)
}

fn print_summary(runs: &[SimulationRun]) {
    println!("{:<6} {:<6} {:>10} {:>8} {:>8}  {:<10}", "Sim", "Day", "Accept", "Public", "Private", "Status");
    println!("{}", "-".repeat(56));
    for run in runs {
        for day in &run.days {
            let (public, private) = day.plan.as_ref().map_or((0, 0), |p| (p.num_public, p.num_private));
            println!(
                "{:<6} {:<6} {:>10.4} {:>8} {:>8}  {:<10}",
                run.id.get(),
                day.key.day.get(),
                day.acceptance_rate,
                public,
                private,
                day.status(),
            );
        }
    }
}
