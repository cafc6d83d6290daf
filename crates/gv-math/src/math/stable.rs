//! Log-Gamma function.
//!
//! Densities for large shapes are evaluated in log space, so the only Gamma
//! function exposed here is `ln |Γ(z)|`.

use std::f64::consts::PI;

const HALF_LN_TWO_PI: f64 = 0.918_938_533_204_672_8; // 0.5 * ln(2*pi)
const LANCZOS_G: f64 = 7.0;
#[allow(clippy::excessive_precision)] // Published Lanczos coefficients (g = 7, n = 9)
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the Gamma function, `ln |Γ(z)|`.
///
/// Lanczos approximation for `z >= 0.5`; the reflection formula
/// `Γ(z)Γ(1-z) = π / sin(πz)` covers the rest of the real line.
///
/// # Returns
/// * `NaN` for NaN input, `-∞`, and the poles at `0, -1, -2, ...`
/// * `+∞` for `+∞`
pub fn log_gamma(z: f64) -> f64 {
    if z.is_nan() || z == f64::NEG_INFINITY {
        return f64::NAN;
    }
    if z == f64::INFINITY {
        return f64::INFINITY;
    }
    if z <= 0.0 && z == z.round() {
        return f64::NAN;
    }
    if z < 0.5 {
        return reflected_log_gamma(z);
    }
    lanczos_log_gamma(z)
}

/// Alias for [`log_gamma`], matching the C `lgamma` name.
pub fn lgamma(z: f64) -> f64 {
    log_gamma(z)
}

fn reflected_log_gamma(z: f64) -> f64 {
    let sin_pi_z = (PI * z).sin();
    if sin_pi_z == 0.0 {
        return f64::NAN;
    }
    PI.ln() - sin_pi_z.abs().ln() - lanczos_log_gamma(1.0 - z)
}

fn lanczos_log_gamma(z: f64) -> f64 {
    let shifted = z - 1.0;
    let series = LANCZOS_COEFFS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEFFS[0], |acc, (k, coeff)| {
            acc + coeff / (shifted + k as f64)
        });
    let t = shifted + LANCZOS_G + 0.5;
    HALF_LN_TWO_PI + (shifted + 0.5) * t.ln() - t + series.ln()
}
