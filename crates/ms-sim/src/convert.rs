//! The raw-output → delimited-table conversion collaborator.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use ms_core::ConverterConfig;

use crate::process::{InvocationReport, run_with_timeout};

/// Converts one raw simulator output into a delimited table.
///
/// Same error convention as [`Simulator`][crate::Simulator]: `Err` only when
/// the tool cannot be started.
pub trait OutputConverter: Send + Sync {
    fn convert(&self, input: &Path, output: &Path) -> io::Result<InvocationReport>;
}

/// Runs an external converter as `program args.. <input> --output <output>`.
#[derive(Clone, Debug)]
pub struct ProcessConverter {
    program: PathBuf,
    args:    Vec<String>,
    timeout: Duration,
}

impl ProcessConverter {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            program: config.program.clone(),
            args:    config.args.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(input).arg("--output").arg(output);
        cmd
    }
}

impl OutputConverter for ProcessConverter {
    fn convert(&self, input: &Path, output: &Path) -> io::Result<InvocationReport> {
        run_with_timeout(self.command(input, output), self.timeout)
    }
}
