//! Solver tuning parameters.

use serde::{Deserialize, Serialize};

use crate::error::{GaussError, InputIssue, Result};

/// Default Newton step cap.
///
/// Inside the relative-residual window the Newton step is scaled by
/// 1/time_of_flight, so long coasts need many thousands of steps.
pub const MAX_ITERATIONS: usize = 100_000;

/// Accept the iterate once |t_error| drops below this
pub const CONVERGENCE_TOLERANCE: f64 = 1e-5;

/// Times of flight inside `[lo, hi]` use a relative residual, all others an absolute one
pub const RELATIVE_ERROR_WINDOW: (f64, f64) = (1.0, 1e7);

/// |Δν - π| below this flags the transfer plane as ambiguous
pub const DEGENERATE_ANGLE_TOLERANCE: f64 = 1e-2;

/// |z| below this evaluates c, s by power series
pub const SERIES_BAND: f64 = 1e-5;

/// 0 <= z below this evaluates c', s' by power series
pub const DERIVATIVE_SERIES_BAND: f64 = 1e-4;

/// Configuration for a solve call.
///
/// `Default` reproduces the canonical-unit behaviour (μ = 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of Newton updates before giving up
    pub max_iterations: usize,
    /// Residual threshold for convergence
    pub convergence_tolerance: f64,
    /// Inclusive time-of-flight range that uses the relative residual
    pub relative_error_window: (f64, f64),
    /// Angular distance from π (radians) that flags degenerate geometry
    pub degenerate_angle_tolerance: f64,
    /// Half-width of the c, s series band around z = 0
    pub series_band: f64,
    /// Width of the non-negative c', s' series band
    pub derivative_series_band: f64,
    /// Gravitational parameter μ of the central body
    pub gravitational_parameter: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            convergence_tolerance: CONVERGENCE_TOLERANCE,
            relative_error_window: RELATIVE_ERROR_WINDOW,
            degenerate_angle_tolerance: DEGENERATE_ANGLE_TOLERANCE,
            series_band: SERIES_BAND,
            derivative_series_band: DERIVATIVE_SERIES_BAND,
            gravitational_parameter: 1.0,
        }
    }
}

impl SolverConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance;
        self
    }

    pub fn with_degenerate_angle_tolerance(mut self, tolerance: f64) -> Self {
        self.degenerate_angle_tolerance = tolerance;
        self
    }

    pub fn with_gravitational_parameter(mut self, mu: f64) -> Self {
        self.gravitational_parameter = mu;
        self
    }

    /// Check the configuration before it drives an iteration.
    pub fn validate(&self) -> Result<()> {
        let mu = self.gravitational_parameter;
        if !(mu.is_finite() && mu > 0.0) {
            return Err(InputIssue::NonPositiveGravitationalParameter { mu }.into());
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations must be at least 1"));
        }
        if !is_positive(self.convergence_tolerance) {
            return Err(invalid("convergence_tolerance must be positive and finite"));
        }
        if !is_positive(self.degenerate_angle_tolerance) {
            return Err(invalid("degenerate_angle_tolerance must be positive and finite"));
        }
        if !is_positive(self.series_band) || !is_positive(self.derivative_series_band) {
            return Err(invalid("series bands must be positive and finite"));
        }
        let (lo, hi) = self.relative_error_window;
        if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi) {
            return Err(invalid("relative_error_window must satisfy 0 < lo <= hi"));
        }
        Ok(())
    }

    /// True when `time_of_flight` falls in the relative-residual window
    #[inline]
    pub fn uses_relative_error(&self, time_of_flight: f64) -> bool {
        let (lo, hi) = self.relative_error_window;
        lo <= time_of_flight && time_of_flight <= hi
    }
}

fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

fn invalid(reason: &str) -> GaussError {
    InputIssue::InvalidConfig {
        reason: reason.to_string(),
    }
    .into()
}
