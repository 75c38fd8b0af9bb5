//! Simulation time model.
//!
//! # Design
//!
//! Unlike a tick-based digital twin, a Matrix-style simulation does not
//! assume a fixed wall-clock duration per logical step: the
//! `TimestepGenerator` is free to stretch or compress the `[start, end)`
//! real-time window a step represents (e.g. to model a slow-motion replay or
//! a fast-forwarded steady state). `Timestep` carries both the logical tick
//! and that real interval so load measurements can be normalized into
//! "CPU-seconds per simulated second" (see [`Timestep::real_duration`] and
//! `dsim-runtime::Coordinator`'s EMA update).

use std::fmt;

/// One discrete logical tick of the simulation and the real-time interval
/// `[start, end)` it represents.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestep {
    /// Logical (discrete) time of the timestep.
    pub step: f64,
    /// Real start time of the timestep (inclusive).
    pub start: f64,
    /// Real end time of the timestep (exclusive).
    pub end: f64,
}

impl Timestep {
    pub fn new(step: f64, start: f64, end: f64) -> Self {
        Self { step, start, end }
    }

    /// The real-time duration `end - start` this timestep represents.
    ///
    /// Used to normalize an agent's wall-clock step time into
    /// CPU-seconds-per-simulated-second before feeding the load balancer.
    #[inline]
    pub fn real_duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}[{}, {})", self.step, self.start, self.end)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Constructed by the host application (CLI wiring is out of scope for this
/// crate) and passed to `dsim-balance::GreedyLoadBalancer::new` at startup,
/// which pulls its EMA/tolerance tunables from it in place of hardcoded
/// constants.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Number of ranks (buckets) participating in this run.
    pub world_size: u32,

    /// Greedy load balancer's EMA smoothing factor for compute/memory load
    /// (`LAMBDA_A`, `LAMBDA_B` in spec terms — kept equal, as upstream does).
    pub balance_lambda: f64,

    /// EMA smoothing factor used when combining normalized compute and
    /// memory load into one scalar per agent (`LAMBDA` in spec terms).
    pub balance_combine_lambda: f64,

    /// Imbalance ratio below which `balance()` stops moving agents.
    pub imbalance_tolerance: f64,
}

impl SimConfig {
    /// Defaults matching the upstream greedy balancer's tunables
    /// (`LAMBDA_A = LAMBDA_B = LAMBDA = 0.9`, `IMBALANCE_TOL = 0.05`).
    pub fn new(world_size: u32) -> Self {
        Self {
            world_size,
            balance_lambda: 0.9,
            balance_combine_lambda: 0.9,
            imbalance_tolerance: 0.05,
        }
    }
}
