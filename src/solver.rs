//! Universal-variable solver.
//!
//! Newton iteration on the single scalar z until the time of flight implied
//! by z matches the requested one, followed by the algebraic velocity step.
//! All iteration scalars live in an [`IterationState`] local to one call.

use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::error::{Endpoint, GaussError, InputIssue, Result};
use crate::geometry::{Direction, Geometry, GeometryFlag};
use crate::stumpff::{stumpff, stumpff_derivatives, StumpffDerivatives, StumpffValues};
use crate::trace::{IterationObserver, IterationRecord};
use crate::vector::{is_finite, norm, sub};
use crate::velocity::compute_velocities;

/// Inputs of one transfer problem
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Departure position
    pub r1: [f64; 3],
    /// Arrival position
    pub r2: [f64; 3],
    /// Elapsed time from r1 to r2
    pub time_of_flight: f64,
    /// Which of the two arcs to take
    pub direction: Direction,
}

impl TransferRequest {
    pub fn new(r1: [f64; 3], r2: [f64; 3], time_of_flight: f64, direction: Direction) -> Self {
        Self {
            r1,
            r2,
            time_of_flight,
            direction,
        }
    }

    /// Reject malformed inputs before any iteration.
    pub fn validate(&self) -> std::result::Result<(), InputIssue> {
        for (which, r) in [(Endpoint::Departure, &self.r1), (Endpoint::Arrival, &self.r2)] {
            if !is_finite(r) {
                return Err(InputIssue::NonFinitePosition { which });
            }
            if norm(r) == 0.0 {
                return Err(InputIssue::ZeroLengthPosition { which });
            }
        }

        let separation = norm(&sub(&self.r2, &self.r1));
        if separation < 1e-14 * norm(&self.r1) {
            return Err(InputIssue::IdenticalPositions);
        }

        let tof = self.time_of_flight;
        if !(tof.is_finite() && tof > 0.0) {
            return Err(InputIssue::NonPositiveTimeOfFlight {
                time_of_flight: tof,
            });
        }

        Ok(())
    }
}

/// Conic class of the converged transfer, read from the sign of z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitKind {
    Elliptic,
    Parabolic,
    Hyperbolic,
}

/// Solution of one transfer problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferSolution {
    /// Velocity at r1
    pub v1: [f64; 3],
    /// Velocity at r2
    pub v2: [f64; 3],
    /// Converged universal variable
    pub z: f64,
    /// Newton updates applied
    pub iterations: usize,
    /// Residual at the accepted iterate
    pub t_error: f64,
    /// Transfer angle Δν actually swept (radians)
    pub transfer_angle: f64,
    /// Near-π flag; a flagged solution lies in a poorly determined plane
    pub geometry: GeometryFlag,
    /// |z| band the solve evaluated by series; read by [`Self::orbit_kind`]
    pub series_band: f64,
}

impl TransferSolution {
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.geometry == GeometryFlag::NearHalfRevolution
    }

    /// z > 0 bound, z < 0 unbound, z inside the solve's series band parabolic
    pub fn orbit_kind(&self) -> OrbitKind {
        if self.z.abs() < self.series_band {
            OrbitKind::Parabolic
        } else if self.z > 0.0 {
            OrbitKind::Elliptic
        } else {
            OrbitKind::Hyperbolic
        }
    }
}

/// Scratch scalars of one Newton iteration.
///
/// Created per call and dropped on return; never shared.
#[derive(Debug, Clone, Default)]
pub struct IterationState {
    /// Universal variable iterate
    pub z: f64,
    pub c: f64,
    pub s: f64,
    pub c_prime: f64,
    pub s_prime: f64,
    pub y: f64,
    pub x: f64,
    /// Time implied by z, in canonical time units
    pub t_predicted: f64,
    pub t_error: f64,
    /// Newton updates applied so far
    pub iteration_count: usize,
}

impl IterationState {
    /// State at the start of the iteration (z = 0)
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn set_values(&mut self, values: StumpffValues) {
        self.c = values.c;
        self.s = values.s;
    }

    #[inline]
    fn set_derivatives(&mut self, derivatives: StumpffDerivatives) {
        self.c_prime = derivatives.c_prime;
        self.s_prime = derivatives.s_prime;
    }

    fn record(&self, dt_dz: Option<f64>) -> IterationRecord {
        IterationRecord {
            iteration: self.iteration_count,
            z: self.z,
            y: self.y,
            x: self.x,
            t_predicted: self.t_predicted,
            dt_dz,
            t_error: self.t_error,
        }
    }

    fn did_not_converge(&self) -> GaussError {
        GaussError::DidNotConverge {
            iterations: self.iteration_count,
            z: self.z,
            t_error: self.t_error,
        }
    }
}

/// Solve the transfer problem in canonical units (μ = 1) with default settings.
///
/// # Arguments
/// * `r1` - Departure position [x, y, z]
/// * `r2` - Arrival position [x, y, z]
/// * `time_of_flight` - Elapsed time (must be > 0)
/// * `direction` - Short way or long way
///
/// # Example
/// ```
/// use gauss_transfer::{solve, Direction};
///
/// let r1 = [0.5, 0.6, 0.7];
/// let r2 = [0.0, 1.0, 0.0];
///
/// let sol = solve(&r1, &r2, 0.9667, Direction::ShortWay).unwrap();
/// assert!((sol.v1[0] + 0.3617).abs() < 1e-3);
/// ```
pub fn solve(
    r1: &[f64; 3],
    r2: &[f64; 3],
    time_of_flight: f64,
    direction: Direction,
) -> Result<TransferSolution> {
    let request = TransferRequest::new(*r1, *r2, time_of_flight, direction);
    solve_with_config(&request, &SolverConfig::default())
}

/// Solve one request with explicit settings.
pub fn solve_with_config(
    request: &TransferRequest,
    config: &SolverConfig,
) -> Result<TransferSolution> {
    solve_observed(request, config, &mut ())
}

/// Solve one request, reporting every iterate to `observer`.
pub fn solve_observed<O>(
    request: &TransferRequest,
    config: &SolverConfig,
    observer: &mut O,
) -> Result<TransferSolution>
where
    O: IterationObserver + ?Sized,
{
    config.validate()?;
    request.validate()?;

    let geom = Geometry::new(
        &request.r1,
        &request.r2,
        request.direction,
        config.degenerate_angle_tolerance,
    );

    log::debug!(
        "solve: |r1|={:.6e} |r2|={:.6e} dnu={:.6} A={:.6e} tof={:.6e} dir={:?}",
        geom.r1,
        geom.r2,
        geom.transfer_angle,
        geom.a,
        request.time_of_flight,
        request.direction
    );

    if geom.is_degenerate() {
        log::warn!(
            "transfer angle {:.6} rad is within {} of pi; orbit plane not uniquely defined",
            geom.transfer_angle,
            config.degenerate_angle_tolerance
        );
    }

    let sqrt_mu = config.gravitational_parameter.sqrt();
    let canonical_tof = request.time_of_flight * sqrt_mu;

    let state = match iterate(&geom, canonical_tof, config, observer) {
        Ok(state) => state,
        Err(err) if geom.is_degenerate() && !err.is_internal() => {
            log::warn!("degenerate transfer failed: {}", err);
            return Err(GaussError::DegenerateGeometry {
                transfer_angle: geom.transfer_angle,
                cause: Some(Box::new(err)),
            });
        }
        Err(err) => {
            log::debug!("solve failed: {}", err);
            return Err(err);
        }
    };

    let (v1, v2) = compute_velocities(&state, &geom, sqrt_mu);

    if !(is_finite(&v1) && is_finite(&v2)) {
        if geom.is_degenerate() || geom.a == 0.0 {
            log::warn!("degenerate transfer produced non-finite velocities (A = {})", geom.a);
            return Err(GaussError::DegenerateGeometry {
                transfer_angle: geom.transfer_angle,
                cause: None,
            });
        }
        return Err(state.did_not_converge());
    }

    log::debug!(
        "converged: z={:.8} iterations={} t_error={:.3e}",
        state.z,
        state.iteration_count,
        state.t_error
    );

    Ok(TransferSolution {
        v1,
        v2,
        z: state.z,
        iterations: state.iteration_count,
        t_error: state.t_error,
        transfer_angle: geom.transfer_angle,
        geometry: geom.flag,
        series_band: config.series_band,
    })
}

/// Newton iteration on z. Returns the accepted state.
fn iterate<O>(
    geom: &Geometry,
    tof: f64,
    config: &SolverConfig,
    observer: &mut O,
) -> Result<IterationState>
where
    O: IterationObserver + ?Sized,
{
    let relative = config.uses_relative_error(tof);
    let a = geom.a;
    let mut state = IterationState::new();

    loop {
        state.set_values(stumpff(state.z, config.series_band)?);

        state.y = geom.r1 + geom.r2 - a * (1.0 - state.z * state.s) / state.c.sqrt();
        if state.y.is_nan() {
            return Err(state.did_not_converge());
        }
        if state.y <= 0.0 {
            return Err(GaussError::ImaginaryY {
                iteration: state.iteration_count,
                z: state.z,
                y: state.y,
            });
        }

        state.x = (state.y / state.c).sqrt();
        let sqrt_y = state.y.sqrt();
        state.t_predicted = state.x.powi(3) * state.s + a * sqrt_y;

        state.t_error = if relative {
            (tof - state.t_predicted) / tof
        } else {
            tof - state.t_predicted
        };
        if !state.t_error.is_finite() {
            return Err(state.did_not_converge());
        }

        if state.t_error.abs() < config.convergence_tolerance {
            observer.on_iteration(&state.record(None));
            return Ok(state);
        }

        if state.iteration_count >= config.max_iterations {
            observer.on_iteration(&state.record(None));
            return Err(state.did_not_converge());
        }

        state.set_derivatives(stumpff_derivatives(
            state.z,
            &StumpffValues {
                c: state.c,
                s: state.s,
            },
            config.derivative_series_band,
        ));

        let dt_dz = state.x.powi(3)
            * (state.s_prime - 3.0 * state.s * state.c_prime / (2.0 * state.c))
            + (a / 8.0) * (3.0 * state.s * sqrt_y / state.c + a / state.x);

        observer.on_iteration(&state.record(Some(dt_dz)));
        log::trace!(
            "z_{k} = {:.4}, y_{k} = {:.4}, x_{k} = {:.4}, t_{k} = {:.4}, dt_{k} = {:.4}, t_error_{k} = {:.4}",
            state.z,
            state.y,
            state.x,
            state.t_predicted,
            dt_dz,
            state.t_error,
            k = state.iteration_count
        );

        let z_next = state.z + state.t_error / dt_dz;
        if !z_next.is_finite() {
            return Err(state.did_not_converge());
        }

        state.z = z_next;
        state.iteration_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::dot;
    use std::f64::consts::PI;

    fn energy(r: &[f64; 3], v: &[f64; 3]) -> f64 {
        dot(v, v) / 2.0 - 1.0 / norm(r)
    }

    #[test]
    fn test_textbook_example() {
        // Bate, Mueller & White example 5-3
        let r1 = [0.5, 0.6, 0.7];
        let r2 = [0.0, 1.0, 0.0];

        let sol = solve(&r1, &r2, 0.9667, Direction::ShortWay).unwrap();

        let expected_v1 = [-0.361_682_674_7, 0.769_737_056_5, -0.506_355_744_5];
        for i in 0..3 {
            assert!(
                (sol.v1[i] - expected_v1[i]).abs() < 1e-6,
                "v1[{}] = {}, expected {}",
                i,
                sol.v1[i],
                expected_v1[i]
            );
        }
        assert!(sol.t_error.abs() < 1e-5);
        assert_eq!(sol.orbit_kind(), OrbitKind::Elliptic);
        assert!(!sol.is_degenerate());
    }

    #[test]
    fn test_circular_quarter_orbit() {
        let r1 = [1.0, 0.0, 0.0];
        let r2 = [0.0, 1.0, 0.0];

        let sol = solve(&r1, &r2, PI / 2.0, Direction::ShortWay).unwrap();

        // Converged z sits near (π/2)², the circular value
        assert!((sol.z - (PI / 2.0).powi(2)).abs() < 1e-3, "z = {}", sol.z);

        let v1_mag = norm(&sol.v1);
        assert!((v1_mag - 1.0).abs() < 1e-4, "v1_mag = {}", v1_mag);
    }

    #[test]
    fn test_short_time_is_hyperbolic() {
        let r1 = [1.0, 0.0, 0.0];
        let r2 = [0.0, 1.0, 0.0];

        let sol = solve(&r1, &r2, 0.5, Direction::ShortWay).unwrap();
        assert_eq!(sol.orbit_kind(), OrbitKind::Hyperbolic);
        assert!(energy(&r1, &sol.v1) > 0.0);
    }

    #[test]
    fn test_long_way_reverses_angular_momentum() {
        let r1 = [1.0, 0.0, 0.0];
        let r2 = [0.0, 1.0, 0.0];

        let sol = solve(&r1, &r2, 3.0 * PI / 2.0, Direction::LongWay).unwrap();

        let h_z = r1[0] * sol.v1[1] - r1[1] * sol.v1[0];
        assert!(h_z < 0.0, "expected negative h_z for the long way, got {}", h_z);
        assert!((sol.transfer_angle - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_energy_conservation() {
        let r1 = [1.2, 0.3, 0.0];
        let r2 = [-0.4, 1.6, 0.2];

        let sol = solve(&r1, &r2, 1.5, Direction::ShortWay).unwrap();

        let e1 = energy(&r1, &sol.v1);
        let e2 = energy(&r2, &sol.v2);
        assert!((e1 - e2).abs() < 1e-10, "E1={}, E2={}", e1, e2);
    }

    #[test]
    fn test_error_invalid_tof() {
        let r1 = [1.0, 0.0, 0.0];
        let r2 = [0.0, 1.0, 0.0];

        for tof in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = solve(&r1, &r2, tof, Direction::ShortWay);
            assert!(
                matches!(
                    result,
                    Err(GaussError::InvalidInput(InputIssue::NonPositiveTimeOfFlight { .. }))
                ),
                "tof = {}",
                tof
            );
        }
    }

    #[test]
    fn test_error_bad_positions() {
        let r = [1.0, 0.0, 0.0];

        let zero = solve(&[0.0; 3], &r, 1.0, Direction::ShortWay);
        assert!(matches!(
            zero,
            Err(GaussError::InvalidInput(InputIssue::ZeroLengthPosition {
                which: Endpoint::Departure
            }))
        ));

        let nan = solve(&r, &[f64::NAN, 1.0, 0.0], 1.0, Direction::ShortWay);
        assert!(matches!(
            nan,
            Err(GaussError::InvalidInput(InputIssue::NonFinitePosition {
                which: Endpoint::Arrival
            }))
        ));

        let same = solve(&r, &r, 1.0, Direction::ShortWay);
        assert!(matches!(
            same,
            Err(GaussError::InvalidInput(InputIssue::IdenticalPositions))
        ));
    }

    #[test]
    fn test_imaginary_y() {
        // Too fast for the short way at these radii: y goes negative on the
        // first Newton step into the hyperbolic regime.
        let r1 = [1.0, 0.0, 0.0];
        let r2 = [0.0, 1.0, 0.0];

        let result = solve(&r1, &r2, 0.1, Direction::ShortWay);
        match result {
            Err(GaussError::ImaginaryY { iteration, y, .. }) => {
                assert_eq!(iteration, 1);
                assert!(y <= 0.0);
            }
            other => panic!("expected ImaginaryY, got {:?}", other),
        }
    }

    #[test]
    fn test_iteration_cap() {
        let r1 = [1.0, 0.0, 0.0];
        let r2 = [0.0, 1.0, 0.0];
        let config = SolverConfig::default().with_max_iterations(3);
        let request = TransferRequest::new(r1, r2, 5.0, Direction::ShortWay);

        match solve_with_config(&request, &config) {
            Err(GaussError::DidNotConverge { iterations, t_error, .. }) => {
                assert_eq!(iterations, 3);
                assert!(t_error.abs() >= 1e-5);
            }
            other => panic!("expected DidNotConverge, got {:?}", other),
        }
    }

    #[test]
    fn test_observer_sees_every_iterate() {
        let request = TransferRequest::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], PI / 2.0, Direction::ShortWay);
        let mut history: Vec<IterationRecord> = Vec::new();

        let observed = solve_observed(&request, &SolverConfig::default(), &mut history).unwrap();
        let plain = solve_with_config(&request, &SolverConfig::default()).unwrap();

        // Observing must not change the answer
        assert_eq!(observed, plain);

        assert_eq!(history.len(), plain.iterations + 1);
        assert_eq!(history[0].z, 0.0);
        let last = history.last().unwrap();
        assert!(last.dt_dz.is_none());
        assert_eq!(last.z, plain.z);
        assert!(history[..history.len() - 1].iter().all(|r| r.dt_dz.is_some()));
    }

    #[test]
    fn test_gravitational_parameter_scaling() {
        // sqrt(mu) * t is invariant: halving t with mu = 4 doubles the velocities
        let r1 = [1.0, 0.0, 0.0];
        let r2 = [0.5, 1.2, 0.1];

        let base = solve(&r1, &r2, 0.8, Direction::ShortWay).unwrap();

        let config = SolverConfig::default().with_gravitational_parameter(4.0);
        let request = TransferRequest::new(r1, r2, 0.4, Direction::ShortWay);
        let scaled = solve_with_config(&request, &config).unwrap();

        assert!((scaled.z - base.z).abs() < 1e-12);
        for i in 0..3 {
            assert!((scaled.v1[i] - 2.0 * base.v1[i]).abs() < 1e-12);
            assert!((scaled.v2[i] - 2.0 * base.v2[i]).abs() < 1e-12);
        }
    }

    /// Solve on the unit quarter arc and return the accepted iterate
    fn accepted_record(tof: f64, config: &SolverConfig) -> (TransferSolution, IterationRecord) {
        let request = TransferRequest::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], tof, Direction::ShortWay);
        let mut history: Vec<IterationRecord> = Vec::new();
        let sol = solve_observed(&request, config, &mut history).unwrap();
        let last = *history.last().unwrap();
        (sol, last)
    }

    #[test]
    fn test_residual_window_edge() {
        let config = SolverConfig::default();

        // Below the window: absolute residual
        let (below, rec) = accepted_record(0.999, &config);
        assert!(!config.uses_relative_error(0.999));
        assert_eq!(below.t_error, rec.t_error);
        assert!((below.t_error - (0.999 - rec.t_predicted)).abs() < 1e-15);

        // Inside the window: residual divided by the time of flight
        let (above, rec) = accepted_record(1.001, &config);
        assert!(config.uses_relative_error(1.001));
        assert!((above.t_error - (1.001 - rec.t_predicted) / 1.001).abs() < 1e-15);

        // Widening the window to cover 0.999 switches it to relative
        let wide = SolverConfig {
            relative_error_window: (0.5, 1e7),
            ..SolverConfig::default()
        };
        let (rel, rec) = accepted_record(0.999, &wide);
        assert!((rel.t_error - (0.999 - rec.t_predicted) / 0.999).abs() < 1e-15);
    }

    #[test]
    fn test_orbit_kind_uses_configured_series_band() {
        // Converges just above z = 0 (z ≈ 5.7e-3)
        let (narrow, _) = accepted_record(0.978, &SolverConfig::default());
        assert!(narrow.z > 5e-3 && narrow.z < 6e-3);
        assert_eq!(narrow.orbit_kind(), OrbitKind::Elliptic);

        let wide = SolverConfig {
            series_band: 1e-2,
            ..SolverConfig::default()
        };
        let (banded, _) = accepted_record(0.978, &wide);
        assert_eq!(banded.series_band, 1e-2);
        assert!((banded.z - narrow.z).abs() < 1e-6);
        assert_eq!(banded.orbit_kind(), OrbitKind::Parabolic);
    }
}
