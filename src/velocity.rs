//! Terminal velocities from the converged universal-variable state.
//!
//! Once y has converged, the Lagrange f and g coefficients follow
//! algebraically and give both endpoint velocities.

use crate::geometry::Geometry;
use crate::solver::IterationState;

/// Lagrange f coefficient
/// f = 1 - y/|r1|
#[inline]
pub fn compute_f(y: f64, r1: f64) -> f64 {
    1.0 - y / r1
}

/// Lagrange g coefficient
/// g = A*sqrt(y)/sqrt(mu)
#[inline]
pub fn compute_g(a: f64, sqrt_y: f64, sqrt_mu: f64) -> f64 {
    a * sqrt_y / sqrt_mu
}

/// Lagrange g_dot coefficient
/// g_dot = 1 - y/|r2|
#[inline]
pub fn compute_g_dot(y: f64, r2: f64) -> f64 {
    1.0 - y / r2
}

/// Compute terminal velocity vectors from the converged state.
///
/// - v1 = (r2 - f*r1) / g
/// - v2 = (g_dot*r2 - r1) / g
///
/// g vanishes when A does (r1, r2 exactly anti-parallel); the result is then
/// non-finite and the caller must reject it.
pub fn compute_velocities(
    state: &IterationState,
    geom: &Geometry,
    sqrt_mu: f64,
) -> ([f64; 3], [f64; 3]) {
    let f = compute_f(state.y, geom.r1);
    let g = compute_g(geom.a, state.y.sqrt(), sqrt_mu);
    let g_dot = compute_g_dot(state.y, geom.r2);

    let inv_g = 1.0 / g;

    let v1 = [
        (geom.r2_vec[0] - f * geom.r1_vec[0]) * inv_g,
        (geom.r2_vec[1] - f * geom.r1_vec[1]) * inv_g,
        (geom.r2_vec[2] - f * geom.r1_vec[2]) * inv_g,
    ];

    let v2 = [
        (g_dot * geom.r2_vec[0] - geom.r1_vec[0]) * inv_g,
        (g_dot * geom.r2_vec[1] - geom.r1_vec[1]) * inv_g,
        (g_dot * geom.r2_vec[2] - geom.r1_vec[2]) * inv_g,
    ];

    (v1, v2)
}
