//! Implied volatility extraction from option prices.
//!
//! - [`implied_vol`] — invert the Black–Scholes pricer for one price
//! - [`implied_vols`] — invert a whole quote set, index aligned, `NaN` on failure
//! - [`implied_vol_detailed`] — same solve with iteration count and convergence flag

mod brent;
pub mod black_scholes;

pub use black_scholes::{
    ImpliedVolConfig, ImpliedVolSolution, implied_vol, implied_vol_detailed, implied_vol_with,
    implied_vols, implied_vols_with,
};
