//! Classical orbital elements from a state vector.
//!
//! Independent utility: the solver never calls it. Feed it a departure state
//! (r1, v1) from a [`TransferSolution`](crate::TransferSolution) to describe
//! the transfer conic. Angles are measured in the frame of the input vectors
//! with the z axis as the reference pole.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{Endpoint, InputIssue, Result};
use crate::vector::{cross, dot, is_finite, norm};

const TWO_PI: f64 = 2.0 * PI;

/// Below this eccentricity the orbit is treated as circular
const CIRCULAR_TOLERANCE: f64 = 1e-5;

/// Below this |n|/|h| the orbit is treated as equatorial
const EQUATORIAL_TOLERANCE: f64 = 1e-5;

const K_HAT: [f64; 3] = [0.0, 0.0, 1.0];

/// Classical elements of the conic through one state vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// h = r × v
    pub angular_momentum: [f64; 3],
    /// p = |h|²/μ
    pub semi_latus_rectum: f64,
    /// Points at periapsis with magnitude e
    pub eccentricity_vector: [f64; 3],
    pub eccentricity: f64,
    /// 1/a = (1 - e²)/p; zero for a parabola, negative for a hyperbola
    pub inverse_semi_major_axis: f64,
    /// Inclination in [0, π]
    pub inclination: f64,
    /// Right ascension of the ascending node in [0, 2π); 0 when equatorial
    pub raan: f64,
    /// Argument of periapsis in [0, 2π); 0 when equatorial or circular
    pub argument_of_periapsis: f64,
    /// True anomaly in [0, 2π). For circular orbits this is the argument of
    /// latitude, and for circular equatorial orbits the true longitude.
    pub true_anomaly: f64,
}

impl OrbitalElements {
    /// Decompose the state (r, v) about a body with gravitational parameter `mu`.
    pub fn from_state(r: &[f64; 3], v: &[f64; 3], mu: f64) -> Result<Self> {
        if !(mu.is_finite() && mu > 0.0) {
            return Err(InputIssue::NonPositiveGravitationalParameter { mu }.into());
        }
        if !is_finite(r) {
            return Err(InputIssue::NonFinitePosition {
                which: Endpoint::Departure,
            }
            .into());
        }
        if !is_finite(v) {
            return Err(InputIssue::NonFiniteVelocity.into());
        }

        let r_mag = norm(r);
        if r_mag == 0.0 {
            return Err(InputIssue::ZeroLengthPosition {
                which: Endpoint::Departure,
            }
            .into());
        }

        let h = cross(r, v);
        let h_mag = norm(&h);
        if h_mag <= f64::EPSILON * r_mag * norm(v) || h_mag == 0.0 {
            return Err(InputIssue::RectilinearState.into());
        }

        let p = h_mag * h_mag / mu;

        let v_sq = dot(v, v);
        let r_dot_v = dot(r, v);
        let radial = v_sq - mu / r_mag;
        let e_vec = [
            (radial * r[0] - r_dot_v * v[0]) / mu,
            (radial * r[1] - r_dot_v * v[1]) / mu,
            (radial * r[2] - r_dot_v * v[2]) / mu,
        ];
        let e = norm(&e_vec);

        let inverse_semi_major_axis = (1.0 - e * e) / p;

        let inclination = safe_acos(h[2] / h_mag);

        let n = cross(&K_HAT, &h);
        let n_mag = norm(&n);
        let equatorial = n_mag < EQUATORIAL_TOLERANCE * h_mag;
        let circular = e < CIRCULAR_TOLERANCE;

        let raan = if equatorial {
            0.0
        } else {
            quadrant(safe_acos(n[0] / n_mag), n[1] < 0.0)
        };

        let argument_of_periapsis = if equatorial || circular {
            0.0
        } else {
            quadrant(safe_acos(dot(&n, &e_vec) / (n_mag * e)), e_vec[2] < 0.0)
        };

        let true_anomaly = if !circular {
            quadrant(safe_acos(dot(&e_vec, r) / (e * r_mag)), r_dot_v < 0.0)
        } else if !equatorial {
            // Argument of latitude
            quadrant(safe_acos(dot(&n, r) / (n_mag * r_mag)), r[2] < 0.0)
        } else {
            // True longitude, sense taken from h
            let longitude = safe_acos(r[0] / r_mag);
            quadrant(longitude, (r[1] < 0.0) == (h[2] > 0.0))
        };

        Ok(Self {
            angular_momentum: h,
            semi_latus_rectum: p,
            eccentricity_vector: e_vec,
            eccentricity: e,
            inverse_semi_major_axis,
            inclination,
            raan,
            argument_of_periapsis,
            true_anomaly,
        })
    }

    /// Semi-major axis a, or `None` for a parabola
    pub fn semi_major_axis(&self) -> Option<f64> {
        if self.inverse_semi_major_axis == 0.0 {
            None
        } else {
            Some(1.0 / self.inverse_semi_major_axis)
        }
    }
}

#[inline]
fn safe_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

/// Map an acos result in [0, π] onto [0, 2π)
#[inline]
fn quadrant(angle: f64, lower_half: bool) -> f64 {
    if lower_half {
        (TWO_PI - angle) % TWO_PI
    } else {
        angle
    }
}
