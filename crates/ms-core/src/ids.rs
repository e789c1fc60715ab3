//! Strongly typed identifiers for a sweep.
//!
//! Simulations and days are both labelled from 1, matching the file names the
//! sweep writes (`flows_sim1_day1_<policy>.xml`).  The acceptance model works
//! on the 0-based elapsed day, obtained with [`DayNumber::elapsed`].

use std::fmt;

/// Generate a typed, 1-based label around a `u32`.
macro_rules! typed_label {
    ($(#[$attr:meta])* $vis:vis struct $name:ident => $prefix:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        $vis struct $name(pub u32);

        impl $name {
            /// The first valid label.
            pub const FIRST: $name = $name(1);

            /// Iterate `FIRST..=FIRST + count - 1`.
            pub fn range(count: u32) -> impl DoubleEndedIterator<Item = $name> {
                (1..=count).map($name)
            }

            /// Raw label value.
            #[inline(always)]
            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<$name> for u32 {
            #[inline(always)]
            fn from(id: $name) -> u32 {
                id.0
            }
        }
    };
}

typed_label! {
    /// One repetition of the multi-day loop, in `1..=n_simulations`.
    pub struct SimulationId => "sim";
}

typed_label! {
    /// One simulated day within a simulation, in `1..=days_per_sim`.
    pub struct DayNumber => "day";
}

impl DayNumber {
    /// Elapsed simulated days since the start of the run (0 for day 1).
    #[inline]
    pub fn elapsed(self) -> u32 {
        self.0.saturating_sub(1)
    }
}

// ── DayKey ────────────────────────────────────────────────────────────────────

/// The `(simulation, day, policy)` triple that stamps every per-day artifact.
///
/// Every file written for a day is named from [`file_stem`][Self::file_stem],
/// so two keys that differ in any component never collide on disk.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct DayKey {
    pub simulation: SimulationId,
    pub day:        DayNumber,
    pub policy_id:  String,
}

impl DayKey {
    pub fn new(simulation: SimulationId, day: DayNumber, policy_id: impl Into<String>) -> Self {
        Self { simulation, day, policy_id: policy_id.into() }
    }

    /// `sim{S}_day{D}_{policy}`, the shared suffix of every per-day file.
    pub fn file_stem(&self) -> String {
        format!("{}_{}_{}", self.simulation, self.day, self.policy_id)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} policy={}", self.simulation, self.day, self.policy_id)
    }
}
