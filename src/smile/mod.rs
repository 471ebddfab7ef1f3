//! Single-maturity smile smoothing.
//!
//! A smile represents how implied volatility varies with strike at a fixed
//! expiry. The smile here is a least-squares cubic in the moneyness offset
//! `x = K/S − 1`; see [`cubic`] for the model and [`fit_cubic`] for the fit.

pub mod cubic;
mod solve;

pub use cubic::{CubicSmile, MIN_FIT_POINTS, PolynomialCoefficients, evaluate_cubic, fit_cubic};
