//! Sweep configuration.
//!
//! `SweepConfig` is built once (usually deserialized from the `[sweep]` table
//! of a scenario file by the application) and handed to the sweep builder.
//! Nothing in the sweep reads global state; every path and constant comes
//! from here.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::{CoreError, CoreResult, SeedSequence};

/// Environment variable that overrides [`SimulatorConfig::binary`].
pub const SIMULATOR_BINARY_ENV: &str = "SUMO_BINARY";

/// Top-level sweep configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Total population split between the two modes every day.  Signed so
    /// that a negative value can be rejected with a typed error rather than
    /// failing deserialization.
    pub population: i64,

    /// Number of repetitions of the multi-day loop.
    pub n_simulations: u32,

    /// Simulated days per repetition.
    pub days_per_sim: u32,

    /// Master seed; per-day simulator seeds are derived from it.
    pub seed: u64,

    /// Floor for a flow's spawn period, in seconds per vehicle.
    pub min_period_secs: f64,

    /// Root of every file the sweep writes.
    pub output_dir: PathBuf,

    /// Road network handed unchanged to every simulator run.
    pub network_file: PathBuf,

    /// Run `(simulation, day)` tasks on a worker pool when the `parallel`
    /// feature of `ms-sim` is compiled in.  Ignored otherwise.
    pub parallel: bool,

    pub simulator: SimulatorConfig,

    /// Raw-output → table conversion.  `None` disables conversion.
    pub converter: Option<ConverterConfig>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            population:      200,
            n_simulations:   1,
            days_per_sim:    7,
            seed:            42,
            min_period_secs: 1.0,
            output_dir:      PathBuf::from("sumo_runs"),
            network_file:    PathBuf::from("network.net.xml"),
            parallel:        false,
            simulator:       SimulatorConfig::default(),
            converter:       Some(ConverterConfig::default()),
        }
    }
}

impl SweepConfig {
    /// Apply environment overrides (currently only [`SIMULATOR_BINARY_ENV`]).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(binary) = std::env::var(SIMULATOR_BINARY_ENV) {
            if !binary.trim().is_empty() {
                self.simulator.binary = PathBuf::from(binary);
            }
        }
        self
    }

    /// Check the settings that do not belong to a more specific error type.
    ///
    /// Population is validated by the flow planner, which owns
    /// `InvalidPopulation`.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.min_period_secs.is_finite() || self.min_period_secs <= 0.0 {
            return Err(CoreError::Config(format!(
                "min_period_secs must be a positive number, got {}",
                self.min_period_secs
            )));
        }
        if self.simulator.timeout_secs == 0 {
            return Err(CoreError::Config("simulator.timeout_secs must be at least 1".into()));
        }
        if let Some(conv) = &self.converter {
            if conv.timeout_secs == 0 {
                return Err(CoreError::Config("converter.timeout_secs must be at least 1".into()));
            }
            if !conv.delimiter.is_ascii() || matches!(conv.delimiter, '"' | '\n' | '\r') {
                return Err(CoreError::Config(format!(
                    "converter.delimiter must be an ASCII character other than a quote or line break, got {:?}",
                    conv.delimiter
                )));
            }
        }
        Ok(())
    }

    /// Seed derivation for this sweep.
    pub fn seeds(&self) -> SeedSequence {
        SeedSequence::new(self.seed)
    }

    /// Total number of `(simulation, day)` tasks.
    pub fn task_count(&self) -> u64 {
        self.n_simulations as u64 * self.days_per_sim as u64
    }
}

// ── SimulatorConfig ───────────────────────────────────────────────────────────

/// How the external traffic simulator is launched.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Executable name or path.  Default: `sumo`.
    pub binary: PathBuf,

    /// Appended after the generated arguments.
    pub extra_args: Vec<String>,

    /// Per-invocation wall-clock limit.  A run that exceeds it is killed and
    /// recorded as a failed day.
    pub timeout_secs: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            binary:       PathBuf::from("sumo"),
            extra_args:   Vec::new(),
            timeout_secs: 3_600,
        }
    }
}

impl SimulatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ── ConverterConfig ───────────────────────────────────────────────────────────

/// How raw simulator outputs are turned into delimited tables.
///
/// The tool is invoked as `program args.. <input> --output <output>`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    pub program: PathBuf,

    /// Leading arguments, typically the converter script path.
    pub args: Vec<String>,

    pub timeout_secs: u64,

    /// Field delimiter of the converted tables.
    pub delimiter: char,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program:      PathBuf::from("python"),
            args:         vec!["xml2csv.py".to_owned()],
            timeout_secs: 600,
            delimiter:    ';',
        }
    }
}

impl ConverterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delimiter as the byte the `csv` crate expects.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}
