//! Where every per-day file lives.
//!
//! ```text
//! <output_dir>/
//!   flows/flows_sim{S}_day{D}_{policy}.xml
//!   raw_xml/tripinfo_sim{S}_day{D}_{policy}.xml
//!   raw_xml/emissions_sim{S}_day{D}_{policy}.xml
//!   csv/tripinfo_sim{S}_day{D}_{policy}.csv
//!   csv/emissions_sim{S}_day{D}_{policy}.csv
//!   summary_per_run.csv
//!   flow_schedule.csv
//!   aggregated_tripinfo_emissions.csv
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use ms_core::DayKey;

/// The two raw result kinds the simulator writes per day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputKind {
    /// Per-vehicle trip summaries.
    TripInfo,
    /// Per-vehicle, per-timestep emissions.
    Emissions,
}

impl OutputKind {
    pub const ALL: [OutputKind; 2] = [OutputKind::TripInfo, OutputKind::Emissions];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputKind::TripInfo  => "tripinfo",
            OutputKind::Emissions => "emissions",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paths under one output root.
#[derive(Clone, Debug)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn flows_dir(&self) -> PathBuf {
        self.root.join("flows")
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("raw_xml")
    }

    pub fn tables_dir(&self) -> PathBuf {
        self.root.join("csv")
    }

    /// Create the root and every subdirectory.
    pub fn prepare(&self) -> std::io::Result<()> {
        for dir in [self.flows_dir(), self.raw_dir(), self.tables_dir()] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn routes_file(&self, key: &DayKey) -> PathBuf {
        self.flows_dir().join(format!("flows_{}.xml", key.file_stem()))
    }

    pub fn raw_output(&self, kind: OutputKind, key: &DayKey) -> PathBuf {
        self.raw_dir().join(format!("{kind}_{}.xml", key.file_stem()))
    }

    pub fn table_output(&self, kind: OutputKind, key: &DayKey) -> PathBuf {
        self.tables_dir().join(format!("{kind}_{}.csv", key.file_stem()))
    }

    pub fn summary_csv(&self) -> PathBuf {
        self.root.join("summary_per_run.csv")
    }

    pub fn flow_schedule_csv(&self) -> PathBuf {
        self.root.join("flow_schedule.csv")
    }

    pub fn aggregated_csv(&self) -> PathBuf {
        self.root.join("aggregated_tripinfo_emissions.csv")
    }
}
