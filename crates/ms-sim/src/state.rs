//! Run and day state machines, and the records they leave behind.
//!
//! ```text
//! run:  Pending ──► Running(day 1) ──► … ──► Running(day N) ──► Completed
//! day:  PlanningDay ──► InvokingSimulator ──► CollectingOutput ──► Done
//! ```
//!
//! Transitions only move forward.  A day that fails stops at the stage that
//! failed and is recorded as failed; the run moves on to the next day.

use std::fmt;
use std::path::PathBuf;

use ms_core::{DayKey, DayNumber, SimulationId};
use ms_flow::DayFlowPlan;

use crate::{DayError, OutputKind};

// ── RunState ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running { day: DayNumber },
    Completed,
}

// ── DayStage ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayStage {
    PlanningDay,
    InvokingSimulator,
    CollectingOutput,
    Done,
}

impl DayStage {
    pub fn as_str(self) -> &'static str {
        match self {
            DayStage::PlanningDay       => "planning",
            DayStage::InvokingSimulator => "invoking_simulator",
            DayStage::CollectingOutput  => "collecting_output",
            DayStage::Done              => "done",
        }
    }
}

impl fmt::Display for DayStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DayRecord ─────────────────────────────────────────────────────────────────

/// How a day ended.
#[derive(Clone, Debug, PartialEq)]
pub enum DayOutcome {
    /// The simulator ran.  Collection problems, if any, are in
    /// [`DayRecord::issues`].
    Completed,
    /// The day stopped at `error.stage()`.
    Failed(DayError),
}

/// A converted table produced for one day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableOutput {
    pub kind: OutputKind,
    pub path: PathBuf,
}

/// Everything one `(simulation, day)` task produced.
#[derive(Clone, Debug)]
pub struct DayRecord {
    pub key:             DayKey,
    /// Seed handed to the simulator.
    pub seed:            u32,
    /// Raw model output, before the planner clamps it.
    pub acceptance_rate: f64,
    /// `None` only if planning failed.
    pub plan:            Option<DayFlowPlan>,
    pub routes_file:     PathBuf,
    pub tables:          Vec<TableOutput>,
    /// Non-fatal problems found while collecting output.
    pub issues:          Vec<DayError>,
    pub stage:           DayStage,
    pub outcome:         DayOutcome,
}

impl DayRecord {
    pub(crate) fn new(key: DayKey, seed: u32, routes_file: PathBuf) -> Self {
        Self {
            key,
            seed,
            acceptance_rate: f64::NAN,
            plan:            None,
            routes_file,
            tables:          Vec::new(),
            issues:          Vec::new(),
            stage:           DayStage::PlanningDay,
            outcome:         DayOutcome::Completed,
        }
    }

    /// Move to `next`.  Stages never go backwards.
    pub(crate) fn advance(&mut self, next: DayStage) {
        debug_assert!(next > self.stage, "day stage {} cannot follow {}", next, self.stage);
        self.stage = next;
    }

    pub(crate) fn fail(&mut self, error: DayError) {
        self.outcome = DayOutcome::Failed(error);
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, DayOutcome::Failed(_))
    }

    /// `completed`, `partial` (completed with collection issues) or `failed`.
    pub fn status(&self) -> &'static str {
        match (&self.outcome, self.issues.is_empty()) {
            (DayOutcome::Failed(_), _)     => "failed",
            (DayOutcome::Completed, true)  => "completed",
            (DayOutcome::Completed, false) => "partial",
        }
    }

    /// The failure, or the first collection issue.
    pub fn first_error(&self) -> Option<&DayError> {
        match &self.outcome {
            DayOutcome::Failed(e) => Some(e),
            DayOutcome::Completed => self.issues.first(),
        }
    }
}

// ── SimulationRun ─────────────────────────────────────────────────────────────

/// One repetition of the multi-day loop.
#[derive(Clone, Debug)]
pub struct SimulationRun {
    pub id:    SimulationId,
    pub state: RunState,
    /// Records in ascending day order.
    pub days:  Vec<DayRecord>,
}

impl SimulationRun {
    pub fn new(id: SimulationId) -> Self {
        Self { id, state: RunState::Pending, days: Vec::new() }
    }

    pub(crate) fn begin_day(&mut self, day: DayNumber) {
        debug_assert!(
            match self.state {
                RunState::Pending           => true,
                RunState::Running { day: d } => day > d,
                RunState::Completed         => false,
            },
            "{} cannot start {day} from {:?}",
            self.id,
            self.state,
        );
        self.state = RunState::Running { day };
    }

    pub(crate) fn complete(&mut self) {
        self.state = RunState::Completed;
    }

    pub fn failed_days(&self) -> usize {
        self.days.iter().filter(|d| d.is_failed()).count()
    }
}
