//! Deterministic seed derivation for simulator invocations.
//!
//! # Determinism strategy
//!
//! Every `(simulation, day)` pair gets its own seed computed from:
//!
//!   state = master XOR (simulation * MIXING_CONSTANT) XOR rotl(day * MIXING_CONSTANT, 32)
//!
//! A `SmallRng` seeded from that state yields the seed handed to the external
//! simulator.  The derivation depends only on the key, never on how many
//! seeds were drawn before, so days can be scheduled in any order (or in
//! parallel) and still reproduce the same sweep.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{DayNumber, SimulationId};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Master seed plus the derivation rule above.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SeedSequence {
    master: u64,
}

impl SeedSequence {
    pub fn new(master: u64) -> Self {
        Self { master }
    }

    pub fn master(&self) -> u64 {
        self.master
    }

    /// Seed for one simulator run.
    ///
    /// Kept within `0..=i32::MAX` because simulators commonly parse `--seed`
    /// into a signed 32-bit integer.
    pub fn day_seed(&self, simulation: SimulationId, day: DayNumber) -> u32 {
        let sim_mix = (simulation.0 as u64).wrapping_mul(MIXING_CONSTANT);
        let day_mix = (day.0 as u64).wrapping_mul(MIXING_CONSTANT).rotate_left(32);
        let mut rng = SmallRng::seed_from_u64(self.master ^ sim_mix ^ day_mix);
        rng.r#gen::<u32>() & (i32::MAX as u32)
    }
}
