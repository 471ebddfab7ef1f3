//! Analytic Black–Scholes Greeks.
//!
//! Gamma and vega share one form for calls and puts; delta, theta and rho
//! differ by the put–call relations. Every formula divides by `σ√T`, so the
//! unguarded functions return non-finite values when `σ ≤ 0` or `T ≤ 0`.
//! Use [`try_greeks`] when the inputs are not already known to be valid.

use crate::conventions::discount_factor;
use crate::distribution::{norm_cdf, norm_pdf};
use crate::error::IvSmileError;
use crate::pricing::black_scholes::d1;
use crate::types::{Greeks, OptionType};

/// Call Greeks. Caller guarantees `vol > 0` and `maturity > 0`.
pub fn greeks_call(spot: f64, strike: f64, maturity: f64, rate: f64, vol: f64) -> Greeks {
    greeks(spot, strike, maturity, rate, vol, OptionType::Call)
}

/// Put Greeks. Caller guarantees `vol > 0` and `maturity > 0`.
pub fn greeks_put(spot: f64, strike: f64, maturity: f64, rate: f64, vol: f64) -> Greeks {
    greeks(spot, strike, maturity, rate, vol, OptionType::Put)
}

/// Greeks for either side. Caller guarantees `vol > 0` and `maturity > 0`.
pub fn greeks(
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    vol: f64,
    option_type: OptionType,
) -> Greeks {
    let sqrt_t = maturity.sqrt();
    let d1 = d1(spot, strike, maturity, rate, vol);
    let d2 = d1 - vol * sqrt_t;
    let pdf = norm_pdf(d1);
    let df = discount_factor(rate, maturity);

    let gamma = pdf / (spot * vol * sqrt_t);
    let vega = spot * pdf * sqrt_t;
    let decay = -(spot * pdf * vol) / (2.0 * sqrt_t);

    match option_type {
        OptionType::Call => Greeks {
            delta: norm_cdf(d1),
            gamma,
            vega,
            theta: decay - rate * strike * df * norm_cdf(d2),
            rho: strike * maturity * df * norm_cdf(d2),
        },
        OptionType::Put => Greeks {
            delta: norm_cdf(d1) - 1.0,
            gamma,
            vega,
            theta: decay + rate * strike * df * norm_cdf(-d2),
            rho: -strike * maturity * df * norm_cdf(-d2),
        },
    }
}

/// Guarded [`greeks`].
///
/// # Errors
/// Returns [`IvSmileError::InvalidInput`] when `vol` or `maturity` is not
/// strictly positive and finite, or when `spot`/`strike` is not positive.
pub fn try_greeks(
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    vol: f64,
    option_type: OptionType,
) -> crate::error::Result<Greeks> {
    use crate::validate::{validate_finite, validate_positive};

    validate_positive(spot, "spot")?;
    validate_positive(strike, "strike")?;
    validate_positive(maturity, "maturity")?;
    validate_positive(vol, "vol")?;
    validate_finite(rate, "rate")?;
    let g = greeks(spot, strike, maturity, rate, vol, option_type);
    if [g.delta, g.gamma, g.vega, g.theta, g.rho]
        .iter()
        .any(|v| !v.is_finite())
    {
        return Err(IvSmileError::InvalidInput {
            message: format!("Greeks are not finite for vol={vol}, maturity={maturity}"),
        });
    }
    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{bs_call, bs_put};
    use approx::assert_abs_diff_eq;

    const S: f64 = 100.0;
    const K: f64 = 100.0;
    const T: f64 = 0.5;
    const R: f64 = 0.02;
    const VOL: f64 = 0.2;

    #[test]
    fn atm_put_reference_values() {
        let g = greeks_put(S, K, T, R, VOL);
        assert_abs_diff_eq!(g.delta, -0.443_768_517, epsilon = 1e-6);
        assert_abs_diff_eq!(g.gamma, 0.027_928_790, epsilon = 1e-8);
        assert_abs_diff_eq!(g.vega, 27.928_790_170, epsilon = 1e-6);
        assert_abs_diff_eq!(g.theta, -4.595_708_199, epsilon = 1e-6);
        assert_abs_diff_eq!(g.rho, -24.751_245_868, epsilon = 1e-5);
    }

    #[test]
    fn gamma_and_vega_shared_between_sides() {
        let c = greeks_call(S, 110.0, T, R, VOL);
        let p = greeks_put(S, 110.0, T, R, VOL);
        assert_eq!(c.gamma, p.gamma);
        assert_eq!(c.vega, p.vega);
        assert_abs_diff_eq!(c.delta - p.delta, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rho_and_theta_parity() {
        // C − P = S − K e^(−rT): ∂/∂r gives ρC − ρP = K T e^(−rT),
        // ∂/∂t gives θC − θP = −r K e^(−rT).
        let k = 95.0;
        let df = (-R * T).exp();
        let c = greeks_call(S, k, T, R, VOL);
        let p = greeks_put(S, k, T, R, VOL);
        assert_abs_diff_eq!(c.rho - p.rho, k * T * df, epsilon = 1e-9);
        assert_abs_diff_eq!(c.theta - p.theta, -R * k * df, epsilon = 1e-9);
    }

    #[test]
    fn delta_and_vega_match_finite_differences() {
        let h = 1e-4;
        let g = greeks_call(S, 105.0, T, R, VOL);
        let fd_delta =
            (bs_call(S + h, 105.0, T, R, VOL) - bs_call(S - h, 105.0, T, R, VOL)) / (2.0 * h);
        let fd_vega =
            (bs_call(S, 105.0, T, R, VOL + h) - bs_call(S, 105.0, T, R, VOL - h)) / (2.0 * h);
        // The CDF approximation bounds finite-difference agreement.
        assert_abs_diff_eq!(g.delta, fd_delta, epsilon = 1e-3);
        assert_abs_diff_eq!(g.vega, fd_vega, epsilon = 1e-2);

        let gp = greeks_put(S, 105.0, T, R, VOL);
        let fd_rho =
            (bs_put(S, 105.0, T, R + h, VOL) - bs_put(S, 105.0, T, R - h, VOL)) / (2.0 * h);
        assert_abs_diff_eq!(gp.rho, fd_rho, epsilon = 1e-2);
    }

    #[test]
    fn unguarded_greeks_are_not_finite_at_zero_vol() {
        let g = greeks_call(S, K, T, R, 0.0);
        assert!(!g.gamma.is_finite());
    }

    #[test]
    fn try_greeks_rejects_degenerate_inputs() {
        assert!(matches!(
            try_greeks(S, K, T, R, 0.0, OptionType::Call),
            Err(IvSmileError::InvalidInput { .. })
        ));
        assert!(try_greeks(S, K, 0.0, R, VOL, OptionType::Put).is_err());
        assert!(try_greeks(S, K, T, f64::NAN, VOL, OptionType::Put).is_err());
        let g = try_greeks(S, K, T, R, VOL, OptionType::Put).unwrap();
        assert_eq!(g, greeks_put(S, K, T, R, VOL));
    }
}
