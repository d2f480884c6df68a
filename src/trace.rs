//! Opt-in per-iteration diagnostics.
//!
//! An [`IterationObserver`] receives one [`IterationRecord`] per evaluated
//! iterate. Observers see copies of the iteration scalars and have no way to
//! steer the solve.

use serde::{Deserialize, Serialize};

/// Snapshot of one iterate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Number of Newton updates applied before this evaluation
    pub iteration: usize,
    /// Universal variable
    pub z: f64,
    pub y: f64,
    pub x: f64,
    /// Time of flight implied by z
    pub t_predicted: f64,
    /// dt/dz used for the next update; `None` on the accepting iterate
    pub dt_dz: Option<f64>,
    /// Residual (relative or absolute, per the residual window)
    pub t_error: f64,
}

/// Receives iteration snapshots during a solve.
pub trait IterationObserver {
    fn on_iteration(&mut self, record: &IterationRecord);
}

/// Discards every record
impl IterationObserver for () {
    fn on_iteration(&mut self, _record: &IterationRecord) {}
}

/// Collects the full iteration history
impl IterationObserver for Vec<IterationRecord> {
    fn on_iteration(&mut self, record: &IterationRecord) {
        self.push(*record);
    }
}

/// Adapts a closure into an observer
pub struct FnObserver<F>(pub F);

impl<F: FnMut(&IterationRecord)> IterationObserver for FnObserver<F> {
    fn on_iteration(&mut self, record: &IterationRecord) {
        (self.0)(record)
    }
}
