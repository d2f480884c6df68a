//! Stumpff functions c(z), s(z) and their z-derivatives.
//!
//! These carry the universal-variable time-of-flight equation across the
//! elliptic (z > 0), parabolic (z ≈ 0) and hyperbolic (z < 0) regimes without
//! switching formulas in the main iteration. Near z = 0 the closed forms lose
//! all precision to cancellation, so truncated power series take over.
//!
//! The value and derivative evaluations use different bands:
//! c, s switch to series on |z| < `series_band` (both signs), while c', s'
//! only switch on 0 <= z < `derivative_series_band`. Small negative z therefore
//! takes the closed-form derivative.

use crate::error::GaussError;

// Factorials for the series expansions
const F2: f64 = 2.0;
const F3: f64 = 6.0;
const F4: f64 = 24.0;
const F5: f64 = 120.0;
const F6: f64 = 720.0;
const F7: f64 = 5_040.0;
const F8: f64 = 40_320.0;
const F9: f64 = 362_880.0;
const F10: f64 = 3_628_800.0;
const F11: f64 = 39_916_800.0;

/// c(z) and s(z) at one iterate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StumpffValues {
    pub c: f64,
    pub s: f64,
}

/// dc/dz and ds/dz at one iterate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StumpffDerivatives {
    pub c_prime: f64,
    pub s_prime: f64,
}

/// Evaluate c(z) and s(z).
///
/// # Errors
/// `InternalInconsistency` if `z` falls through every branch, which only a
/// NaN iterate can do since z = 0 always lies inside the series band.
pub fn stumpff(z: f64, series_band: f64) -> Result<StumpffValues, GaussError> {
    if z.abs() < series_band {
        let z2 = z * z;
        Ok(StumpffValues {
            c: 1.0 / F2 - z / F4 + z2 / F6,
            s: 1.0 / F3 - z / F5 + z2 / F7,
        })
    } else if z > 0.0 {
        // Elliptic
        let sqrt_z = z.sqrt();
        Ok(StumpffValues {
            c: (1.0 - sqrt_z.cos()) / z,
            s: (sqrt_z - sqrt_z.sin()) / (z * z * z).sqrt(),
        })
    } else if z < 0.0 {
        // Hyperbolic
        let neg_z = -z;
        let sqrt_neg_z = neg_z.sqrt();
        Ok(StumpffValues {
            c: (1.0 - sqrt_neg_z.cosh()) / z,
            s: (sqrt_neg_z.sinh() - sqrt_neg_z) / (neg_z * neg_z * neg_z).sqrt(),
        })
    } else {
        Err(GaussError::InternalInconsistency { z })
    }
}

/// Evaluate c'(z) and s'(z) given c and s at the same z.
///
/// The closed form divides by 2z, so it is only reached outside the
/// non-negative series band or for z < 0 (where z is bounded away from 0 by
/// the value band).
pub fn stumpff_derivatives(
    z: f64,
    values: &StumpffValues,
    derivative_series_band: f64,
) -> StumpffDerivatives {
    if 0.0 <= z && z.abs() < derivative_series_band {
        let z2 = z * z;
        let z3 = z2 * z;
        StumpffDerivatives {
            c_prime: 1.0 / F4 + 2.0 * z / F6 - 3.0 * z2 / F8 + 4.0 * z3 / F10,
            s_prime: 1.0 / F5 + 2.0 * z / F7 - 3.0 * z2 / F9 + 4.0 * z3 / F11,
        }
    } else {
        let inv_2z = 1.0 / (2.0 * z);
        StumpffDerivatives {
            c_prime: (1.0 - z * values.s - 2.0 * values.c) * inv_2z,
            s_prime: (values.c - 3.0 * values.s) * inv_2z,
        }
    }
}
