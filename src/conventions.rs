//! Market conventions shared by the pricer and the smile fit.
//!
//! The smile is parameterized in the moneyness offset `x = K/S − 1`, so the
//! at-the-money point sits at `x = 0` and the polynomial's intercept is the
//! ATM volatility.

/// Convert a strike to simple moneyness: m = K / S.
pub fn moneyness(strike: f64, spot: f64) -> f64 {
    strike / spot
}

/// Convert a strike to the moneyness offset: x = K / S − 1.
pub fn moneyness_offset(strike: f64, spot: f64) -> f64 {
    strike / spot - 1.0
}

/// Continuously compounded discount factor e^(−rT).
pub fn discount_factor(rate: f64, maturity: f64) -> f64 {
    (-rate * maturity).exp()
}
