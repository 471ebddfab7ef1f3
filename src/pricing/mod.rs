//! Black–Scholes pricing of European options and their Greeks.
//!
//! - [`black_scholes`] — `d1`/`d2`, call/put prices, intrinsic fallback
//! - [`greeks`] — delta, gamma, vega, theta, rho
//!
//! Prices never fail. Greeks are only defined for `σ > 0`, `T > 0`.

pub mod black_scholes;
pub mod greeks;

pub use black_scholes::{bs_call, bs_price, bs_put, d1, d2};
pub use greeks::{greeks, greeks_call, greeks_put, try_greeks};
