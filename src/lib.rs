//! # Gauss Transfer
//!
//! Solves the two-body orbital boundary value problem: given two position
//! vectors, the time of flight between them and the transfer direction, find
//! the velocities at both ends of the single Keplerian arc that connects them.
//!
//! The solver iterates on the universal variable z with Newton's method,
//! evaluating the time-of-flight equation through the Stumpff functions c(z)
//! and s(z) so that elliptic, parabolic and hyperbolic arcs share one formula.
//! Lengths and times are in canonical units (μ = 1) unless a gravitational
//! parameter is set in [`SolverConfig`].
//!
//! ## References
//!
//! 1. Bate, R. R., Mueller, D. D., and White, J. E., *Fundamentals of
//!    Astrodynamics*, Dover, 1971, Ch. 5 (the Gauss problem, universal variables).
//!
//! 2. Vallado, D. A., *Fundamentals of Astrodynamics and Applications*,
//!    4th ed., Microcosm Press, 2013, Ch. 7.
//!
//! ## Example
//!
//! ```rust
//! use gauss_transfer::{solve, Direction, GaussError};
//!
//! let r1 = [0.5, 0.6, 0.7];   // Departure position (DU)
//! let r2 = [0.0, 1.0, 0.0];   // Arrival position (DU)
//! let tof = 0.9667;           // Time of flight (TU)
//!
//! match solve(&r1, &r2, tof, Direction::ShortWay) {
//!     Ok(solution) => {
//!         println!("v1 = {:?}", solution.v1);
//!         println!("v2 = {:?}", solution.v2);
//!     }
//!     Err(GaussError::ImaginaryY { .. }) => eprintln!("no real solution on this branch"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

mod batch;
mod config;
mod diagnostics;
mod elements;
mod error;
mod geometry;
mod solver;
mod stumpff;
mod trace;
mod vector;
mod velocity;

#[cfg(feature = "parallel")]
pub use batch::solve_batch_parallel;
pub use batch::solve_batch;
pub use config::SolverConfig;
pub use diagnostics::{check_consistency, ConsistencyReport};
pub use elements::OrbitalElements;
pub use error::{Endpoint, GaussError, InputIssue, Result};
pub use geometry::{Direction, GeometryFlag};
pub use solver::{
    solve, solve_observed, solve_with_config, IterationState, OrbitKind, TransferRequest,
    TransferSolution,
};
pub use stumpff::{stumpff, stumpff_derivatives, StumpffDerivatives, StumpffValues};
pub use trace::{FnObserver, IterationObserver, IterationRecord};
