//! Error types for the transfer solver.
//!
//! Every fatal condition comes back as a [`GaussError`]; the solver never hands
//! out a placeholder velocity to signal "no solution".

use thiserror::Error;

/// Which of the two boundary positions an input problem refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Departure position r1
    Departure,
    /// Arrival position r2
    Arrival,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Departure => write!(f, "r1"),
            Endpoint::Arrival => write!(f, "r2"),
        }
    }
}

/// Precondition violations, rejected before any iteration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputIssue {
    /// A position vector contains NaN or infinite components
    #[error("{which} has non-finite components")]
    NonFinitePosition { which: Endpoint },

    /// A position vector has zero length
    #[error("{which} has zero length")]
    ZeroLengthPosition { which: Endpoint },

    /// r1 and r2 coincide, so the transfer angle is undefined
    #[error("r1 and r2 are identical")]
    IdenticalPositions,

    /// Time of flight is zero, negative or not finite
    #[error("time of flight must be positive and finite, got {time_of_flight}")]
    NonPositiveTimeOfFlight { time_of_flight: f64 },

    /// Raw direction selector other than +1 / -1
    #[error("direction must be +1 (short way) or -1 (long way), got {value}")]
    InvalidDirection { value: i32 },

    /// Gravitational parameter is zero, negative or not finite
    #[error("gravitational parameter must be positive and finite, got {mu}")]
    NonPositiveGravitationalParameter { mu: f64 },

    /// A velocity vector contains NaN or infinite components
    #[error("velocity has non-finite components")]
    NonFiniteVelocity,

    /// State vector with zero angular momentum (radial motion), for which
    /// the orbital plane is undefined
    #[error("state has zero angular momentum")]
    RectilinearState,

    /// Solver configuration is unusable
    #[error("invalid solver configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Failure of a single solve call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaussError {
    /// Inputs rejected before iterating
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputIssue),

    /// Transfer angle within tolerance of pi and no usable solution came out;
    /// the transfer plane is not fixed by r1 and r2 alone.
    ///
    /// `cause` holds the abort that ended the iteration, or `None` when the
    /// iteration finished but the velocities came out non-finite (A = 0).
    #[error("degenerate geometry: transfer angle {transfer_angle} rad is too close to pi")]
    DegenerateGeometry {
        transfer_angle: f64,
        #[source]
        cause: Option<Box<GaussError>>,
    },

    /// y became non-positive, so the chosen branch has no real solution
    #[error("imaginary y at iteration {iteration}: y = {y} (z = {z})")]
    ImaginaryY { iteration: usize, z: f64, y: f64 },

    /// Iteration cap hit (or the iterate left the finite range) before the
    /// time residual dropped below tolerance
    #[error("did not converge after {iterations} iterations (z = {z}, t_error = {t_error})")]
    DidNotConverge {
        iterations: usize,
        z: f64,
        t_error: f64,
    },

    /// z == 0 reached outside the series band; a tolerance-boundary bug
    #[error("internal inconsistency: Stumpff evaluation fell through at z = {z}")]
    InternalInconsistency { z: f64 },
}

impl GaussError {
    /// True for errors that indicate a bug in the solver rather than a
    /// property of the requested transfer.
    pub fn is_internal(&self) -> bool {
        matches!(self, GaussError::InternalInconsistency { .. })
    }
}

/// Result alias for solver operations
pub type Result<T> = std::result::Result<T, GaussError>;
