//! Per-day flow planning.
//!
//! # Rounding and reconciliation
//!
//! The public count is rounded once and the private count is the residual, so
//! `num_public + num_private == population` always holds exactly.
//!
//! Inside a mode group each route gets its share by largest remainder:
//!
//! ```text
//! raw_r   = mode_population * share_r          (shares scaled to sum 1 if they exceed it)
//! target  = min(mode_population, round(Σ raw_r))
//! count_r = floor(raw_r), then +1 to the routes with the largest fractional
//!           parts (declaration order on ties) until Σ count_r == target
//! ```
//!
//! For a single route this is plain rounding; for several it never assigns
//! more vehicles than the mode population holds.

use ms_core::TravelMode;

use crate::{FlowError, FlowResult, RouteFlowTemplate};

// ── Options ───────────────────────────────────────────────────────────────────

/// Knobs that are fixed for a whole sweep.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlanOptions {
    /// Lower bound for a flow's period, in seconds per vehicle.
    pub min_period_secs: f64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self { min_period_secs: 1.0 }
    }
}

// ── Plan types ────────────────────────────────────────────────────────────────

/// A route declared in the day's routes file.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteEntry {
    pub route_id: String,
    pub edges:    Vec<String>,
}

/// One scheduled stream of vehicles.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowEntry {
    pub flow_id:      String,
    pub route_id:     String,
    pub mode:         TravelMode,
    pub vehicle_type: String,
    pub edges:        Vec<String>,
    pub begin:        f64,
    pub end:          f64,
    /// Seconds between two spawned vehicles.
    pub period:       f64,
    /// Vehicles assigned to this route (always ≥ 1).
    pub vehicles:     u64,
}

/// Everything the simulator needs for one `(simulation, day)`.
#[derive(Clone, Debug, PartialEq)]
pub struct DayFlowPlan {
    pub total_population: u64,
    /// Rate actually used, after clamping to `[0, 1]`.
    pub acceptance_rate:  f64,
    pub num_public:       u64,
    pub num_private:      u64,
    /// Every template's route, in template order.
    pub routes:           Vec<RouteEntry>,
    /// Routes that received at least one vehicle.
    pub flows:            Vec<FlowEntry>,
    /// Flow ids of templates that received no vehicles.
    pub skipped:          Vec<String>,
}

impl DayFlowPlan {
    /// Population of one mode.
    pub fn mode_population(&self, mode: TravelMode) -> u64 {
        match mode {
            TravelMode::Private => self.num_private,
            TravelMode::Public  => self.num_public,
        }
    }

    /// Vehicles emitted across the flows of one mode.
    pub fn vehicles(&self, mode: TravelMode) -> u64 {
        self.flows.iter().filter(|f| f.mode == mode).map(|f| f.vehicles).sum()
    }
}

// ── Planning ──────────────────────────────────────────────────────────────────

/// Split `total_population` into `(num_public, num_private)`.
///
/// `acceptance_rate` is clamped to `[0, 1]`; NaN is rejected.
pub fn split_population(total_population: i64, acceptance_rate: f64) -> FlowResult<(u64, u64)> {
    if total_population < 0 {
        return Err(FlowError::InvalidPopulation(total_population));
    }
    if acceptance_rate.is_nan() {
        return Err(FlowError::InvalidAcceptanceRate(acceptance_rate));
    }
    let total = total_population as u64;
    let rate = acceptance_rate.clamp(0.0, 1.0);
    let num_public = ((total as f64 * rate).round() as u64).min(total);
    Ok((num_public, total - num_public))
}

/// Distribute `mode_population` vehicles over routes with the given shares.
///
/// See the module docs for the method.  The result has one entry per share
/// and sums to at most `mode_population`.
pub fn allocate_vehicles(mode_population: u64, shares: &[f64]) -> Vec<u64> {
    if shares.is_empty() || mode_population == 0 {
        return vec![0; shares.len()];
    }
    let share_total: f64 = shares.iter().sum();
    let scale = if share_total > 1.0 { 1.0 / share_total } else { 1.0 };

    let raw: Vec<f64> = shares.iter().map(|s| mode_population as f64 * s * scale).collect();
    let target = (raw.iter().sum::<f64>().round() as u64).min(mode_population);

    let mut counts: Vec<u64> = raw.iter().map(|r| r.floor() as u64).collect();
    let assigned: u64 = counts.iter().sum();

    if assigned < target {
        let mut order: Vec<usize> = (0..raw.len()).collect();
        // Stable sort keeps declaration order among equal remainders.
        order.sort_by(|&a, &b| {
            let fa = raw[a] - raw[a].floor();
            let fb = raw[b] - raw[b].floor();
            fb.total_cmp(&fa)
        });
        for &i in order.iter().cycle().take((target - assigned) as usize) {
            counts[i] += 1;
        }
    }
    counts
}

/// Build the flow plan for one day.
///
/// Fails with [`FlowError::InvalidPopulation`] if `total_population < 0`.
pub fn build_day_plan(
    templates:        &RouteFlowTemplate,
    total_population: i64,
    acceptance_rate:  f64,
    options:          &PlanOptions,
) -> FlowResult<DayFlowPlan> {
    let (num_public, num_private) = split_population(total_population, acceptance_rate)?;

    let mut plan = DayFlowPlan {
        total_population: num_public + num_private,
        acceptance_rate:  acceptance_rate.clamp(0.0, 1.0),
        num_public,
        num_private,
        routes:           Vec::with_capacity(templates.len()),
        flows:            Vec::with_capacity(templates.len()),
        skipped:          Vec::new(),
    };

    for mode in TravelMode::ALL {
        let group = templates.group(mode);
        let shares: Vec<f64> = group.iter().map(|t| t.share).collect();
        let counts = allocate_vehicles(plan.mode_population(mode), &shares);

        for (template, vehicles) in group.iter().zip(counts) {
            let route_id = template.route_id();
            plan.routes.push(RouteEntry { route_id: route_id.clone(), edges: template.edges.clone() });

            if vehicles == 0 {
                plan.skipped.push(template.id.clone());
                continue;
            }

            let period = (template.window.duration() / vehicles as f64).max(options.min_period_secs);
            plan.flows.push(FlowEntry {
                flow_id:      template.id.clone(),
                route_id,
                mode,
                vehicle_type: mode.default_vehicle_type().to_owned(),
                edges:        template.edges.clone(),
                begin:        template.window.start,
                end:          template.window.end,
                period,
                vehicles,
            });
        }
    }

    Ok(plan)
}
