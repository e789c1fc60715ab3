use std::path::PathBuf;

use ms_core::CoreError;
use ms_flow::FlowError;
use ms_policy::PolicyError;
use thiserror::Error;

use crate::{DayStage, OutputKind};

/// Errors that stop a sweep before (or instead of) running it.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("cannot prepare output directory {path}: {source}")]
    OutputDir {
        path:   PathBuf,
        source: std::io::Error,
    },
}

pub type SimResult<T> = Result<T, SimError>;

/// A per-day failure.  Recorded on the day and logged; never aborts the sweep.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DayError {
    #[error("flow planning failed: {0}")]
    Planning(String),

    #[error("cannot write routes file {path}: {message}")]
    RoutesWrite {
        path:    PathBuf,
        message: String,
    },

    #[error("simulator invocation failed (exit code {}): {message}", display_code(.exit_code))]
    SimulatorInvocationFailed {
        exit_code: Option<i32>,
        message:   String,
    },

    #[error("simulator timed out after {timeout_secs} s")]
    SimulatorTimedOut { timeout_secs: u64 },

    #[error("{kind} output not found: {path}")]
    OutputMissing {
        kind: OutputKind,
        path: PathBuf,
    },

    #[error("{kind} conversion failed: {message}")]
    ConversionFailed {
        kind:    OutputKind,
        message: String,
    },
}

impl DayError {
    /// Stage of the day loop this error belongs to.
    pub fn stage(&self) -> DayStage {
        match self {
            DayError::Planning(_) | DayError::RoutesWrite { .. } => DayStage::PlanningDay,
            DayError::SimulatorInvocationFailed { .. } | DayError::SimulatorTimedOut { .. } => {
                DayStage::InvokingSimulator
            }
            DayError::OutputMissing { .. } | DayError::ConversionFailed { .. } => DayStage::CollectingOutput,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_owned(), |c| c.to_string())
}
