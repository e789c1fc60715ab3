//! The `Sweep` struct and its day loop.

use std::fs;
use std::io;

use ms_core::{DayKey, DayNumber, SeedSequence, SimulationId, SweepConfig};
use ms_flow::{DayFlowPlan, PlanOptions, RouteFlowTemplate, VehicleType, build_day_plan, write_routes_file};
use ms_policy::AcceptanceModel;

use crate::{
    DayError, DayRecord, DayStage, OutputConverter, OutputKind, OutputLayout, SimError, SimResult,
    SimulationRun, Simulator, SimulatorJob, SweepObserver, TableOutput,
};

// ── Sweep ─────────────────────────────────────────────────────────────────────

/// The multi-day sweep runner.
///
/// For every simulation `1..=n_simulations` and every day `1..=days_per_sim`:
///
/// 1. **Planning**: evaluate the acceptance model at the elapsed day, build
///    the day's flow plan and write the routes file.
/// 2. **Invoking**: run the simulator on the routes file and the network
///    with a per-day seed.
/// 3. **Collecting**: check that both raw outputs exist and convert each to
///    a delimited table.
///
/// A failure in any stage is recorded on that day and the loop moves on.
/// Only the checks in [`SweepBuilder::build`][crate::SweepBuilder::build]
/// are fatal.
///
/// Create via [`SweepBuilder`][crate::SweepBuilder].
pub struct Sweep<A: AcceptanceModel, S: Simulator> {
    pub(crate) config:        SweepConfig,
    pub(crate) layout:        OutputLayout,
    pub(crate) seeds:         SeedSequence,
    pub(crate) model:         A,
    pub(crate) templates:     RouteFlowTemplate,
    pub(crate) simulator:     S,
    pub(crate) converter:     Option<Box<dyn OutputConverter>>,
    pub(crate) vehicle_types: Vec<VehicleType>,
    pub(crate) plan_options:  PlanOptions,
}

/// How far a day is taken.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DayMode {
    Full,
    PlanOnly,
}

impl<A: AcceptanceModel, S: Simulator> Sweep<A, S> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn model(&self) -> &A {
        &self.model
    }

    pub fn templates(&self) -> &RouteFlowTemplate {
        &self.templates
    }

    pub fn key(&self, simulation: SimulationId, day: DayNumber) -> DayKey {
        DayKey::new(simulation, day, self.model.policy_id())
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run every `(simulation, day)` task and return one [`SimulationRun`]
    /// per simulation, days in ascending order.
    ///
    /// The only error is failing to create the output directories.
    pub fn run<O: SweepObserver>(&self, observer: &mut O) -> SimResult<Vec<SimulationRun>> {
        self.drive(DayMode::Full, observer)
    }

    /// Plan every day and write its routes file without invoking the
    /// simulator.  Days end at [`DayStage::Done`] with no tables.
    pub fn dry_run<O: SweepObserver>(&self, observer: &mut O) -> SimResult<Vec<SimulationRun>> {
        self.drive(DayMode::PlanOnly, observer)
    }

    /// Build the flow plan for `day` without touching the filesystem.
    pub fn plan_day(&self, day: DayNumber) -> Result<DayFlowPlan, DayError> {
        let rate = self.model.acceptance_on(day);
        build_day_plan(&self.templates, self.config.population, rate, &self.plan_options)
            .map_err(|e| DayError::Planning(e.to_string()))
    }

    /// Run the three stages of one day.  Never fails; problems are recorded
    /// on the returned [`DayRecord`].
    pub fn run_day(&self, key: DayKey) -> DayRecord {
        self.execute_day(key, DayMode::Full)
    }

    // ── Loop ──────────────────────────────────────────────────────────────

    fn drive<O: SweepObserver>(&self, mode: DayMode, observer: &mut O) -> SimResult<Vec<SimulationRun>> {
        self.layout.prepare().map_err(|source| SimError::OutputDir {
            path: self.layout.root().to_path_buf(),
            source,
        })?;

        log::info!(
            "sweep policy={}: {} simulation(s) x {} day(s), population {}{}",
            self.model.policy_id(),
            self.config.n_simulations,
            self.config.days_per_sim,
            self.config.population,
            if mode == DayMode::PlanOnly { " (dry run)" } else { "" },
        );
        observer.on_sweep_start(self.config.task_count());

        let runs = if self.config.parallel && cfg!(feature = "parallel") {
            let records = self.execute_all(mode);
            self.replay(records, observer)
        } else {
            self.run_sequential(mode, observer)
        };

        let failed: usize = runs.iter().map(SimulationRun::failed_days).sum();
        log::info!("sweep finished: {} day(s), {failed} failed", self.config.task_count());
        observer.on_sweep_end(&runs);
        Ok(runs)
    }

    fn run_sequential<O: SweepObserver>(&self, mode: DayMode, observer: &mut O) -> Vec<SimulationRun> {
        SimulationId::range(self.config.n_simulations)
            .map(|simulation| {
                let mut run = SimulationRun::new(simulation);
                observer.on_run_start(simulation);
                for day in DayNumber::range(self.config.days_per_sim) {
                    run.begin_day(day);
                    let record = self.execute_day(self.key(simulation, day), mode);
                    observer.on_day_end(&record);
                    run.days.push(record);
                }
                run.complete();
                observer.on_run_end(&run);
                run
            })
            .collect()
    }

    fn task_keys(&self) -> Vec<DayKey> {
        SimulationId::range(self.config.n_simulations)
            .flat_map(|s| DayNumber::range(self.config.days_per_sim).map(move |d| (s, d)))
            .map(|(s, d)| self.key(s, d))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn execute_all(&self, mode: DayMode) -> Vec<DayRecord> {
        use rayon::prelude::*;

        self.task_keys()
            .into_par_iter()
            .map(|key| self.execute_day(key, mode))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn execute_all(&self, mode: DayMode) -> Vec<DayRecord> {
        self.task_keys()
            .into_iter()
            .map(|key| self.execute_day(key, mode))
            .collect()
    }

    /// Regroup independently computed records into runs, notifying the
    /// observer in simulation and day order.
    fn replay<O: SweepObserver>(&self, mut records: Vec<DayRecord>, observer: &mut O) -> Vec<SimulationRun> {
        records.sort_by(|a, b| a.key.cmp(&b.key));

        let mut runs: Vec<SimulationRun> = Vec::new();
        for record in records {
            let simulation = record.key.simulation;
            if runs.last().is_none_or(|r| r.id != simulation) {
                if let Some(prev) = runs.last_mut() {
                    prev.complete();
                    observer.on_run_end(prev);
                }
                runs.push(SimulationRun::new(simulation));
                observer.on_run_start(simulation);
            }
            if let Some(run) = runs.last_mut() {
                run.begin_day(record.key.day);
                observer.on_day_end(&record);
                run.days.push(record);
            }
        }
        if let Some(last) = runs.last_mut() {
            last.complete();
            observer.on_run_end(last);
        }
        runs
    }

    // ── One day ───────────────────────────────────────────────────────────

    fn execute_day(&self, key: DayKey, mode: DayMode) -> DayRecord {
        let seed = self.seeds.day_seed(key.simulation, key.day);
        let routes_file = self.layout.routes_file(&key);
        let mut record = DayRecord::new(key, seed, routes_file);

        // ── Planning ──────────────────────────────────────────────────────
        record.acceptance_rate = self.model.acceptance_on(record.key.day);
        let plan = match build_day_plan(
            &self.templates,
            self.config.population,
            record.acceptance_rate,
            &self.plan_options,
        ) {
            Ok(plan) => plan,
            Err(e) => return self.failed(record, DayError::Planning(e.to_string())),
        };
        log::info!(
            "{}: acceptance {:.4} -> {} public / {} private, {} flow(s)",
            record.key,
            record.acceptance_rate,
            plan.num_public,
            plan.num_private,
            plan.flows.len(),
        );

        if let Err(e) = write_routes_file(&record.routes_file, &plan, &self.vehicle_types) {
            let err = DayError::RoutesWrite { path: record.routes_file.clone(), message: e.to_string() };
            record.plan = Some(plan);
            return self.failed(record, err);
        }
        record.plan = Some(plan);

        if mode == DayMode::PlanOnly {
            record.advance(DayStage::Done);
            return record;
        }

        // ── Invoking ──────────────────────────────────────────────────────
        self.clear_stale_outputs(&record.key);
        record.advance(DayStage::InvokingSimulator);
        if let Err(err) = self.invoke(&record) {
            return self.failed(record, err);
        }

        // ── Collecting ────────────────────────────────────────────────────
        record.advance(DayStage::CollectingOutput);
        for kind in OutputKind::ALL {
            match self.collect(&record.key, kind) {
                Ok(Some(table)) => record.tables.push(table),
                Ok(None) => {}
                Err(issue) => {
                    log::warn!("{} stage={}: {issue}", record.key, DayStage::CollectingOutput);
                    record.issues.push(issue);
                }
            }
        }

        record.advance(DayStage::Done);
        log::debug!("{}: {}", record.key, record.status());
        record
    }

    fn failed(&self, mut record: DayRecord, error: DayError) -> DayRecord {
        log::error!("{} stage={}: {error}", record.key, record.stage);
        record.fail(error);
        record
    }

    /// Remove raw outputs and tables an earlier sweep left under the same
    /// key, so only files written by this invocation are collected.
    fn clear_stale_outputs(&self, key: &DayKey) {
        for kind in OutputKind::ALL {
            for path in [self.layout.raw_output(kind, key), self.layout.table_output(kind, key)] {
                match fs::remove_file(&path) {
                    Ok(()) => log::debug!("{key}: removed stale {}", path.display()),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => log::warn!("{key}: cannot remove stale {}: {e}", path.display()),
                }
            }
        }
    }

    fn invoke(&self, record: &DayRecord) -> Result<(), DayError> {
        let tripinfo = self.layout.raw_output(OutputKind::TripInfo, &record.key);
        let emissions = self.layout.raw_output(OutputKind::Emissions, &record.key);
        let job = SimulatorJob {
            key:           &record.key,
            routes_file:   &record.routes_file,
            network_file:  &self.config.network_file,
            tripinfo_out:  &tripinfo,
            emissions_out: &emissions,
            seed:          record.seed,
        };

        let report = self.simulator.invoke(&job).map_err(|e| DayError::SimulatorInvocationFailed {
            exit_code: None,
            message:   format!("cannot start simulator: {e}"),
        })?;

        if report.timed_out {
            return Err(DayError::SimulatorTimedOut { timeout_secs: self.config.simulator.timeout_secs });
        }
        if !report.is_success() {
            return Err(DayError::SimulatorInvocationFailed {
                exit_code: report.exit_code,
                message:   report.diagnostic().to_owned(),
            });
        }
        Ok(())
    }

    /// Check one raw output and convert it.  `Ok(None)` when conversion is
    /// disabled.
    fn collect(&self, key: &DayKey, kind: OutputKind) -> Result<Option<TableOutput>, DayError> {
        let raw = self.layout.raw_output(kind, key);
        if !raw.is_file() {
            return Err(DayError::OutputMissing { kind, path: raw });
        }
        let Some(converter) = &self.converter else {
            return Ok(None);
        };

        let table = self.layout.table_output(kind, key);
        let report = converter
            .convert(&raw, &table)
            .map_err(|e| DayError::ConversionFailed { kind, message: format!("cannot start converter: {e}") })?;

        if report.timed_out {
            return Err(DayError::ConversionFailed { kind, message: "converter timed out".into() });
        }
        if !report.is_success() {
            let code = report.exit_code.map_or_else(|| "none".to_owned(), |c| c.to_string());
            return Err(DayError::ConversionFailed {
                kind,
                message: format!("exit code {code}: {}", report.diagnostic()),
            });
        }
        if !table.is_file() {
            return Err(DayError::OutputMissing { kind, path: table });
        }
        Ok(Some(TableOutput { kind, path: table }))
    }
}
