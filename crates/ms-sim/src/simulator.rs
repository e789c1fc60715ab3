//! The external traffic simulator collaborator.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use ms_core::{DayKey, SimulatorConfig};

use crate::process::{InvocationReport, run_with_timeout};

/// Inputs and output locations for one simulator run.
#[derive(Clone, Debug)]
pub struct SimulatorJob<'a> {
    pub key:           &'a DayKey,
    pub routes_file:   &'a Path,
    pub network_file:  &'a Path,
    pub tripinfo_out:  &'a Path,
    pub emissions_out: &'a Path,
    pub seed:          u32,
}

/// Runs the simulator for one day.
///
/// Called once per `(simulation, day)`, possibly from several threads at once
/// with the `parallel` feature, hence `Send + Sync`.
///
/// `Err` means the simulator could not be started at all; a run that started
/// and failed is an `Ok` report with a non-zero exit code.
pub trait Simulator: Send + Sync {
    fn invoke(&self, job: &SimulatorJob<'_>) -> io::Result<InvocationReport>;
}

/// Launches the simulator binary as a child process.
#[derive(Clone, Debug)]
pub struct ProcessSimulator {
    binary:     PathBuf,
    extra_args: Vec<String>,
    timeout:    Duration,
}

impl ProcessSimulator {
    pub fn new(config: &SimulatorConfig) -> Self {
        Self {
            binary:     config.binary.clone(),
            extra_args: config.extra_args.clone(),
            timeout:    config.timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The command line for `job`, without spawning it.
    pub fn command(&self, job: &SimulatorJob<'_>) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-n")
            .arg(job.network_file)
            .arg("-r")
            .arg(job.routes_file)
            .arg("--tripinfo-output")
            .arg(job.tripinfo_out)
            .arg("--emission-output")
            .arg(job.emissions_out)
            .arg("--duration-log.statistics")
            .arg("--no-warnings")
            .arg("--seed")
            .arg(job.seed.to_string())
            .args(&self.extra_args);
        cmd
    }
}

impl Simulator for ProcessSimulator {
    fn invoke(&self, job: &SimulatorJob<'_>) -> io::Result<InvocationReport> {
        log::debug!("{}: launching {}", job.key, self.binary.display());
        run_with_timeout(self.command(job), self.timeout)
    }
}
