//! Fluent builder for constructing a [`Sweep`].

use ms_core::SweepConfig;
use ms_flow::{PlanOptions, RouteFlowTemplate, VehicleType, split_population};
use ms_policy::{AcceptanceModel, PolicyError};

use crate::{OutputConverter, OutputLayout, ProcessConverter, Simulator, Sweep, SimResult};

/// Fluent builder for [`Sweep<A, S>`].
///
/// # Required inputs
///
/// - [`SweepConfig`]: population, simulation/day counts, seed, paths
/// - `A: AcceptanceModel`, usually a [`ms_policy::Policy`]
/// - [`RouteFlowTemplate`]: the mode-partitioned route templates
/// - `S: Simulator`, usually a [`ProcessSimulator`][crate::ProcessSimulator]
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                                          |
/// |------------------------|--------------------------------------------------|
/// | `.converter(c)`        | `ProcessConverter` from `config.converter`, if set |
/// | `.without_converter()` | (disables conversion)                            |
/// | `.vehicle_types(v)`    | `VehicleType::defaults()` (`car`, `bus`)         |
///
/// # Example
///
/// ```rust,ignore
/// let simulator = ProcessSimulator::new(&config.simulator);
/// let sweep = SweepBuilder::new(config, policy, templates, simulator).build()?;
/// let runs = sweep.run(&mut NoopObserver)?;
/// ```
pub struct SweepBuilder<A: AcceptanceModel, S: Simulator> {
    config:        SweepConfig,
    model:         A,
    templates:     RouteFlowTemplate,
    simulator:     S,
    converter:     Option<Option<Box<dyn OutputConverter>>>,
    vehicle_types: Option<Vec<VehicleType>>,
}

impl<A: AcceptanceModel, S: Simulator> SweepBuilder<A, S> {
    pub fn new(config: SweepConfig, model: A, templates: RouteFlowTemplate, simulator: S) -> Self {
        Self {
            config,
            model,
            templates,
            simulator,
            converter:     None,
            vehicle_types: None,
        }
    }

    /// Use `converter` for raw-output conversion instead of the configured
    /// external program.
    pub fn converter(mut self, converter: Box<dyn OutputConverter>) -> Self {
        self.converter = Some(Some(converter));
        self
    }

    /// Skip conversion; raw outputs are still checked for presence.
    pub fn without_converter(mut self) -> Self {
        self.converter = Some(None);
        self
    }

    pub fn vehicle_types(mut self, vehicle_types: Vec<VehicleType>) -> Self {
        self.vehicle_types = Some(vehicle_types);
        self
    }

    /// Validate every fatal input and return a ready-to-run [`Sweep`].
    ///
    /// Fails before anything touches the filesystem or the simulator.
    pub fn build(self) -> SimResult<Sweep<A, S>> {
        self.config.validate()?;
        split_population(self.config.population, 0.0)?;

        let policy_id = self.model.policy_id();
        if policy_id.is_empty()
            || !policy_id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(PolicyError::InvalidId(policy_id.to_owned()).into());
        }

        if self.templates.is_empty() {
            log::warn!("route template is empty; every day will emit a routes file without flows");
        }
        if self.config.parallel && !cfg!(feature = "parallel") {
            log::warn!("`parallel` requested but ms-sim was built without the `parallel` feature; running sequentially");
        }

        let converter = match self.converter {
            Some(explicit) => explicit,
            None => self
                .config
                .converter
                .as_ref()
                .map(|c| Box::new(ProcessConverter::new(c)) as Box<dyn OutputConverter>),
        };

        let plan_options = PlanOptions { min_period_secs: self.config.min_period_secs };

        Ok(Sweep {
            layout:        OutputLayout::new(&self.config.output_dir),
            seeds:         self.config.seeds(),
            config:        self.config,
            model:         self.model,
            templates:     self.templates,
            simulator:     self.simulator,
            converter,
            vehicle_types: self.vehicle_types.unwrap_or_else(VehicleType::defaults),
            plan_options,
        })
    }
}
