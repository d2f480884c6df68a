//! Shared helpers for the integration tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod kepler;

pub fn vec_mag(v: &[f64; 3]) -> f64 {
    (v[0].powi(2) + v[1].powi(2) + v[2].powi(2)).sqrt()
}

pub fn vec_diff_mag(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}

/// |a - b| / |b|
pub fn relative_error(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    vec_diff_mag(a, b) / vec_mag(b)
}
