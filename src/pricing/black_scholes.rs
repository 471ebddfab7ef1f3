//! Closed-form Black–Scholes prices for European options on a
//! non-dividend-paying underlying.
//!
//! # Formula
//! ```text
//! d1 = (ln(S/K) + (r + σ²/2)·T) / (σ·√T)
//! d2 = d1 − σ·√T
//! C  = S·N(d1) − K·e^(−rT)·N(d2)
//! P  = K·e^(−rT)·N(−d2) − S·N(−d1)
//! ```
//!
//! When `σ ≤ 0` or `T ≤ 0` the price collapses to the discounted intrinsic
//! value. That boundary is part of the contract, not an error: the implied
//! volatility solver evaluates the pricer at the lower end of its bracket
//! and relies on the limit being well defined.

use crate::conventions::discount_factor;
use crate::distribution::norm_cdf;
use crate::types::OptionType;

/// Black–Scholes `d1`.
///
/// Undefined (infinite or NaN) for `σ ≤ 0` or `T ≤ 0`; callers guard.
pub fn d1(spot: f64, strike: f64, maturity: f64, rate: f64, vol: f64) -> f64 {
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * maturity) / (vol * maturity.sqrt())
}

/// Black–Scholes `d2 = d1 − σ√T`.
pub fn d2(spot: f64, strike: f64, maturity: f64, rate: f64, vol: f64) -> f64 {
    d1(spot, strike, maturity, rate, vol) - vol * maturity.sqrt()
}

/// European call price.
///
/// ```
/// use ivsmile::pricing::bs_call;
/// let c = bs_call(100.0, 100.0, 0.5, 0.02, 0.2);
/// assert!((c - 6.1207).abs() < 1e-3);
/// ```
pub fn bs_call(spot: f64, strike: f64, maturity: f64, rate: f64, vol: f64) -> f64 {
    let df = discount_factor(rate, maturity);
    if vol <= 0.0 || maturity <= 0.0 {
        return (spot - strike * df).max(0.0);
    }
    let d1 = d1(spot, strike, maturity, rate, vol);
    let d2 = d1 - vol * maturity.sqrt();
    spot * norm_cdf(d1) - strike * df * norm_cdf(d2)
}

/// European put price.
pub fn bs_put(spot: f64, strike: f64, maturity: f64, rate: f64, vol: f64) -> f64 {
    let df = discount_factor(rate, maturity);
    if vol <= 0.0 || maturity <= 0.0 {
        return (strike * df - spot).max(0.0);
    }
    let d1 = d1(spot, strike, maturity, rate, vol);
    let d2 = d1 - vol * maturity.sqrt();
    strike * df * norm_cdf(-d2) - spot * norm_cdf(-d1)
}

/// European price for either side.
pub fn bs_price(
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    vol: f64,
    option_type: OptionType,
) -> f64 {
    match option_type {
        OptionType::Call => bs_call(spot, strike, maturity, rate, vol),
        OptionType::Put => bs_put(spot, strike, maturity, rate, vol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const S: f64 = 100.0;
    const K: f64 = 100.0;
    const T: f64 = 0.5;
    const R: f64 = 0.02;
    const VOL: f64 = 0.2;

    #[test]
    fn atm_reference_prices() {
        // d1 = 0.02 / (0.2·√0.5) = 0.141421..., d2 = 0
        assert_abs_diff_eq!(d1(S, K, T, R, VOL), 0.141_421_356_237_309_5, epsilon = 1e-12);
        assert_abs_diff_eq!(d2(S, K, T, R, VOL), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bs_call(S, K, T, R, VOL), 6.120_656_643, epsilon = 1e-6);
        assert_abs_diff_eq!(bs_put(S, K, T, R, VOL), 5.125_640_018, epsilon = 1e-6);
    }

    #[test]
    fn put_call_parity() {
        for &k in &[70.0, 90.0, 100.0, 115.0, 130.0] {
            for &t in &[0.1, 0.5, 2.0] {
                for &r in &[0.0, 0.05] {
                    for &vol in &[0.05, 0.2, 0.8, 2.5] {
                        let lhs = bs_call(S, k, t, r, vol) - bs_put(S, k, t, r, vol);
                        let rhs = S - k * (-r * t).exp();
                        assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn zero_vol_is_discounted_intrinsic() {
        let df = (-R * T).exp();
        assert_abs_diff_eq!(bs_call(S, 90.0, T, R, 0.0), S - 90.0 * df, epsilon = 1e-12);
        assert_eq!(bs_put(S, 90.0, T, R, 0.0), 0.0);
        assert_abs_diff_eq!(bs_put(S, 110.0, T, R, -0.1), 110.0 * df - S, epsilon = 1e-12);
        assert_eq!(bs_call(S, 110.0, T, R, 0.0), 0.0);
    }

    #[test]
    fn zero_maturity_is_intrinsic() {
        assert_abs_diff_eq!(bs_call(S, 90.0, 0.0, R, VOL), 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bs_put(S, 110.0, -1.0, 0.0, VOL), 10.0, epsilon = 1e-12);
        assert_eq!(bs_put(S, 90.0, 0.0, R, VOL), 0.0);
    }

    #[test]
    fn call_non_decreasing_in_vol() {
        for &k in &[70.0, 100.0, 130.0] {
            let mut prev = bs_call(S, k, T, R, 1e-6);
            for i in 1..=500 {
                let vol = i as f64 * 0.01;
                let c = bs_call(S, k, T, R, vol);
                assert!(c >= prev - 1e-12, "C(σ={vol}) = {c} < {prev} at K={k}");
                prev = c;
            }
        }
    }

    #[test]
    fn call_bounded_by_spot() {
        let c = bs_call(S, K, T, R, 5.0);
        assert!(c < S);
        assert!(c > S - K * (-R * T).exp());
    }

    #[test]
    fn bs_price_dispatches_on_side() {
        assert_eq!(bs_price(S, K, T, R, VOL, OptionType::Call), bs_call(S, K, T, R, VOL));
        assert_eq!(bs_price(S, K, T, R, VOL, OptionType::Put), bs_put(S, K, T, R, VOL));
    }
}
