//! Two-body propagator used to check solver output independently.
//!
//! Advances (r0, v0) by dt by solving Kepler's equation in the universal
//! anomaly χ, a different equation from the one the solver iterates on.

use gauss_transfer::stumpff;

/// Series band for the propagator's own Stumpff evaluations
const PSI_BAND: f64 = 1e-6;

/// Propagate (r0, v0) forward by dt with gravitational parameter mu.
/// Returns (r, v) at t0 + dt.
pub fn kepler_propagate(r0: &[f64; 3], v0: &[f64; 3], dt: f64, mu: f64) -> ([f64; 3], [f64; 3]) {
    let sqrt_mu = mu.sqrt();
    let r0_mag = (r0[0].powi(2) + r0[1].powi(2) + r0[2].powi(2)).sqrt();
    let v0_sq = v0[0].powi(2) + v0[1].powi(2) + v0[2].powi(2);
    let sigma0 = (r0[0] * v0[0] + r0[1] * v0[1] + r0[2] * v0[2]) / sqrt_mu;

    // alpha = 1/a from vis-viva
    let alpha = 2.0 / r0_mag - v0_sq / mu;

    let mut chi = sqrt_mu * dt * alpha.abs().max(1.0 / r0_mag);

    let kepler = |chi: f64| {
        let psi = alpha * chi * chi;
        let cs = stumpff(psi, PSI_BAND).expect("finite universal anomaly");
        let chi2 = chi * chi;
        let t_of_chi = r0_mag * chi * (1.0 - psi * cs.s) + sigma0 * chi2 * cs.c + chi2 * chi * cs.s;
        let r = chi2 * cs.c + sigma0 * chi * (1.0 - psi * cs.s) + r0_mag * (1.0 - psi * cs.c);
        (t_of_chi, r, cs)
    };

    let target = sqrt_mu * dt;
    for _ in 0..100 {
        let (t_of_chi, r, _) = kepler(chi);
        let step = (t_of_chi - target) / r;
        chi -= step;
        if step.abs() < 1e-15 * chi.abs().max(1.0) {
            break;
        }
    }

    let (_, r_mag, cs) = kepler(chi);
    let chi2 = chi * chi;
    let psi = alpha * chi2;

    let f = 1.0 - chi2 / r0_mag * cs.c;
    let g = dt - chi2 * chi / sqrt_mu * cs.s;
    let f_dot = sqrt_mu / (r_mag * r0_mag) * chi * (psi * cs.s - 1.0);
    let g_dot = 1.0 - chi2 / r_mag * cs.c;

    let mut r = [0.0; 3];
    let mut v = [0.0; 3];
    for i in 0..3 {
        r[i] = f * r0[i] + g * v0[i];
        v[i] = f_dot * r0[i] + g_dot * v0[i];
    }
    (r, v)
}
