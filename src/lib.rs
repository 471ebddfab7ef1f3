//! # ivsmile
//!
//! Implied volatility smile extraction for a single expiry.
//!
//! Provides the full pipeline: option quotes → Black–Scholes implied vol per
//! quote → clean-point filtering → least-squares cubic smile in moneyness →
//! fitted vols at every strike, plus Greeks for a diagnostic ATM put.
//!
//! ## Architecture
//!
//! - **`distribution`** — standard normal pdf and a closed-form CDF approximation
//! - **`pricing`** — Black–Scholes prices and Greeks
//! - **`implied`** — implied volatility by bracketed Brent–Dekker root finding
//! - **`smile`** — cubic smile fit in `x = K/S − 1`
//! - **`pipeline`** — one end-to-end run over a quote set
//! - **`io`** — quote sources and result sinks (CSV behind the `io` feature)
//!
//! ## Design
//!
//! - **Failure in-band where it is data.** A quote with no implied vol yields
//!   `NaN` in its slot; every per-quote series stays index aligned with the
//!   input. Only the smile fit and I/O return [`Result`].
//! - **Validated value types.** [`MarketQuote`], [`PricingParameters`] and the
//!   solver/filter configs check their invariants in `new` and again on
//!   Serde deserialization.
//! - **No panics.** Library code never calls `unwrap()` or `expect()`.
//! - **Pure and `Send + Sync`.** No shared state; callers may parallelise
//!   over quotes freely.

pub mod conventions;
pub mod distribution;
pub mod error;
pub mod implied;
pub mod io;
pub mod pipeline;
pub mod pricing;
pub mod smile;
pub mod types;
mod validate;

#[doc(inline)]
pub use error::{IvSmileError, Result};
#[doc(inline)]
pub use implied::{ImpliedVolConfig, implied_vol, implied_vols};
#[doc(inline)]
pub use pipeline::{
    AtmDiagnostic, CleanPointFilter, FitOutcome, PipelineConfig, SmileRun, atm_put_diagnostic,
    run_pipeline,
};
#[doc(inline)]
pub use smile::{CubicSmile, PolynomialCoefficients, evaluate_cubic, fit_cubic};
#[doc(inline)]
pub use types::{Greeks, MarketQuote, OptionType, PricingParameters};
