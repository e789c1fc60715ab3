//! Plain data row types written by output backends.

use ms_sim::DayRecord;

/// One row per `(simulation, day)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummaryRow {
    pub simulation_id:   u32,
    pub simulation_day:  u32,
    pub policy_id:       String,
    /// Rate the model returned, before clamping.
    pub acceptance_rate: f64,
    /// Zero when planning failed.
    pub num_public:      u64,
    pub num_private:     u64,
    /// `completed`, `partial` or `failed`.
    pub status:          &'static str,
    /// Stage of the first error; empty when there is none.
    pub failed_stage:    &'static str,
    /// First error message; empty when there is none.
    pub message:         String,
}

impl DaySummaryRow {
    pub const HEADER: [&'static str; 9] = [
        "simulation_id",
        "simulation_day",
        "policy_id",
        "acceptance_rate",
        "num_public",
        "num_private",
        "status",
        "failed_stage",
        "message",
    ];

    pub fn from_record(record: &DayRecord) -> Self {
        let (num_public, num_private) =
            record.plan.as_ref().map_or((0, 0), |p| (p.num_public, p.num_private));
        let error = record.first_error();
        Self {
            simulation_id:   record.key.simulation.get(),
            simulation_day:  record.key.day.get(),
            policy_id:       record.key.policy_id.clone(),
            acceptance_rate: record.acceptance_rate,
            num_public,
            num_private,
            status:          record.status(),
            failed_stage:    error.map_or("", |e| e.stage().as_str()),
            message:         error.map(ToString::to_string).unwrap_or_default(),
        }
    }
}

/// One row per emitted flow per day.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRow {
    pub simulation_id:  u32,
    pub simulation_day: u32,
    pub policy_id:      String,
    pub flow_id:        String,
    pub route_id:       String,
    /// `private` or `public`.
    pub mode:           &'static str,
    pub vehicle_type:   String,
    pub begin:          f64,
    pub end:            f64,
    pub period:         f64,
    pub vehicles:       u64,
}

impl FlowRow {
    pub const HEADER: [&'static str; 11] = [
        "simulation_id",
        "simulation_day",
        "policy_id",
        "flow_id",
        "route_id",
        "mode",
        "vehicle_type",
        "begin",
        "end",
        "period",
        "vehicles",
    ];

    /// Rows for every flow the day planned; empty if planning failed.
    pub fn from_record(record: &DayRecord) -> Vec<Self> {
        let Some(plan) = &record.plan else {
            return Vec::new();
        };
        plan.flows
            .iter()
            .map(|flow| Self {
                simulation_id:  record.key.simulation.get(),
                simulation_day: record.key.day.get(),
                policy_id:      record.key.policy_id.clone(),
                flow_id:        flow.flow_id.clone(),
                route_id:       flow.route_id.clone(),
                mode:           flow.mode.as_str(),
                vehicle_type:   flow.vehicle_type.clone(),
                begin:          flow.begin,
                end:            flow.end,
                period:         flow.period,
                vehicles:       flow.vehicles,
            })
            .collect()
    }
}
