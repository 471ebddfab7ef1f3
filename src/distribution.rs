//! Standard normal density and cumulative distribution.
//!
//! `norm_cdf` is the Abramowitz–Stegun 7.1.26 rational approximation of
//! `erf`, with absolute error below 7.5e-8. The implied volatility tolerances
//! in [`crate::implied`] are sized against this error floor; a more accurate
//! CDF is a safe substitute, a cruder one is not.
//!
//! # References
//! - Abramowitz, M. & Stegun, I.A. "Handbook of Mathematical Functions" (1964), 7.1.26

/// 1/√(2π).
const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

const A1: f64 = 0.254_829_592;
const A2: f64 = -0.284_496_736;
const A3: f64 = 1.421_413_741;
const A4: f64 = -1.453_152_027;
const A5: f64 = 1.061_405_429;
const P: f64 = 0.327_591_1;

/// Standard normal probability density n(x).
pub fn norm_pdf(x: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal cumulative distribution N(x).
///
/// ```
/// use ivsmile::distribution::norm_cdf;
/// assert!((norm_cdf(1.96) - 0.975).abs() < 1e-4);
/// ```
pub fn norm_cdf(x: f64) -> f64 {
    // The approximation leaves erf(0) at 1e-9; pin the centre so that
    // N(x) + N(−x) = 1 holds exactly, including for x = ±0.
    if x == 0.0 {
        return 0.5;
    }
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let z = x.abs() / std::f64::consts::SQRT_2;
    let t = 1.0 / (1.0 + P * z);
    // Horner form of the degree-5 polynomial in t
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    let erf = 1.0 - poly * (-z * z).exp();
    0.5 * (1.0 + sign * erf)
}
