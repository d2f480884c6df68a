//! Physical consistency check of a solved transfer.
//!
//! Both endpoints lie on one Keplerian arc, so the specific orbital energy and
//! the angular momentum vector must agree between them. Nothing in the solve
//! path calls this; it is a post-hoc check for callers and tests.

use serde::{Deserialize, Serialize};

use crate::solver::TransferSolution;
use crate::vector::{cross, dot, norm, sub};

/// Energy and angular momentum at both endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// |v1|²/2 - μ/|r1|
    pub energy_1: f64,
    /// |v2|²/2 - μ/|r2|
    pub energy_2: f64,
    /// r1 × v1
    pub momentum_1: [f64; 3],
    /// r2 × v2
    pub momentum_2: [f64; 3],
}

impl ConsistencyReport {
    /// |E1 - E2|
    pub fn energy_error(&self) -> f64 {
        (self.energy_1 - self.energy_2).abs()
    }

    /// |h1 - h2|
    pub fn momentum_error(&self) -> f64 {
        norm(&sub(&self.momentum_1, &self.momentum_2))
    }

    /// Both mismatches below `tolerance`, relative to the magnitudes involved
    /// (absolute when those are below 1)
    pub fn is_consistent(&self, tolerance: f64) -> bool {
        let energy_scale = self.energy_1.abs().max(self.energy_2.abs()).max(1.0);
        let momentum_scale = norm(&self.momentum_1).max(1.0);
        self.energy_error() <= tolerance * energy_scale
            && self.momentum_error() <= tolerance * momentum_scale
    }
}

/// Compute the energy / angular momentum report for a solution.
pub fn check_consistency(
    r1: &[f64; 3],
    r2: &[f64; 3],
    solution: &TransferSolution,
    mu: f64,
) -> ConsistencyReport {
    let energy = |r: &[f64; 3], v: &[f64; 3]| dot(v, v) / 2.0 - mu / norm(r);

    let report = ConsistencyReport {
        energy_1: energy(r1, &solution.v1),
        energy_2: energy(r2, &solution.v2),
        momentum_1: cross(r1, &solution.v1),
        momentum_2: cross(r2, &solution.v2),
    };

    log::debug!(
        "E_1 = {:.6e}, E_2 = {:.6e}, h_1 = {:.6e}, h_2 = {:.6e}",
        report.energy_1,
        report.energy_2,
        norm(&report.momentum_1),
        norm(&report.momentum_2)
    );

    report
}
