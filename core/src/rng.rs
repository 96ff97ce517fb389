//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through SubsystemRng instances derived
//! from the single master seed stored on the run record.
//!
//! Each subsystem gets its own RNG stream per week, seeded from
//! (master_seed, slot, week). This means:
//!   - Adding a new subsystem never changes existing subsystems' streams.
//!   - Reloading a save at week N replays week N+1 identically.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::types::Week;

/// A named, deterministic RNG for a single subsystem.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Create a subsystem RNG from the master seed and a stable
    /// stream index. The index must never change once assigned.
    pub fn new(master_seed: u64, stream: u64) -> Self {
        let derived_seed = master_seed ^ stream.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n). Returns 0 when n == 0.
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        self.inner.next_u64() % n
    }

    /// Pick an index into a slice of length `len`. None when empty.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.next_u64_below(len as u64) as usize)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform integer in [lo, hi].
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = (i64::from(hi) - i64::from(lo) + 1) as u64;
        (i64::from(lo) + self.next_u64_below(span) as i64) as i32
    }
}

/// All subsystem RNGs for a single run, indexed by stable slot.
#[derive(Debug, Clone, Copy)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// The stream for `slot` during game week `week`.
    pub fn for_subsystem_at_week(&self, slot: SubsystemSlot, week: Week) -> SubsystemRng {
        let stream = ((slot as u64) << 32) | (week & 0xFFFF_FFFF);
        SubsystemRng::new(self.master_seed, stream).with_name(slot.name())
    }
}

/// Stable subsystem slot assignments.
/// NEVER reorder or remove entries; only append.
/// Reordering changes every subsystem's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum SubsystemSlot {
    Engine = 0,
    Production = 1,
    BoxOffice = 2,
    RandomEvents = 3,
    /// Reserved for a rival-studio collaborator; no built-in subsystem draws here.
    Rivals = 4,
    /// Reserved for an achievements collaborator.
    Achievements = 5,
    Scripts = 6,
    Loans = 7,
    Awards = 8,
    /// Reserved for a television-competition collaborator.
    Television = 9,
    Scenario = 10,
    // Add new subsystems here, append only.
}

impl SubsystemSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Engine => "engine",
            Self::Production => "production",
            Self::BoxOffice => "box_office",
            Self::RandomEvents => "random_events",
            Self::Rivals => "rivals",
            Self::Achievements => "achievements",
            Self::Scripts => "scripts",
            Self::Loans => "loans",
            Self::Awards => "awards",
            Self::Television => "television",
            Self::Scenario => "scenario",
        }
    }
}
