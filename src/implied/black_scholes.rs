//! Black–Scholes implied volatility via a bracketed Brent solve.
//!
//! Solves `price(σ) − observed = 0` for σ in `[lo, hi]` using the pricer in
//! [`crate::pricing`] as the oracle.
//!
//! Failure is an expected outcome (e.g. a deep out-of-the-money quote below
//! the pricer's resolution, or a price outside the no-arbitrage bounds), so
//! it is reported in-band: [`implied_vol`] returns `NaN` when the bracket
//! holds no root. Callers test the result with `is_finite()`.
//!
//! Exhausting the iteration cap is not reported by [`implied_vol`]; it
//! returns the best estimate found. [`implied_vol_detailed`] exposes the
//! iteration count and a convergence flag for callers that need to tell the
//! two apart.

use serde::{Deserialize, Serialize};

use crate::error::IvSmileError;
use crate::implied::brent::{BrentConfig, brent};
use crate::pricing::bs_price;
use crate::types::{MarketQuote, OptionType, PricingParameters};

/// Solver knobs for implied volatility extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ImpliedVolConfigRaw", into = "ImpliedVolConfigRaw")]
pub struct ImpliedVolConfig {
    lower_vol: f64,
    upper_vol: f64,
    max_iterations: usize,
    tolerance: f64,
}

#[derive(Serialize, Deserialize)]
struct ImpliedVolConfigRaw {
    lower_vol: f64,
    upper_vol: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl TryFrom<ImpliedVolConfigRaw> for ImpliedVolConfig {
    type Error = IvSmileError;
    fn try_from(raw: ImpliedVolConfigRaw) -> Result<Self, Self::Error> {
        Self::new(raw.lower_vol, raw.upper_vol, raw.max_iterations, raw.tolerance)
    }
}

impl From<ImpliedVolConfig> for ImpliedVolConfigRaw {
    fn from(c: ImpliedVolConfig) -> Self {
        Self {
            lower_vol: c.lower_vol,
            upper_vol: c.upper_vol,
            max_iterations: c.max_iterations,
            tolerance: c.tolerance,
        }
    }
}

impl Default for ImpliedVolConfig {
    /// Bracket `[1e-6, 5.0]`, 200 iterations, tolerance `1e-10` in vol units.
    fn default() -> Self {
        Self {
            lower_vol: 1e-6,
            upper_vol: 5.0,
            max_iterations: 200,
            tolerance: 1e-10,
        }
    }
}

impl ImpliedVolConfig {
    /// Create a solver configuration.
    ///
    /// # Errors
    /// Returns [`IvSmileError::InvalidInput`] unless `lower_vol < upper_vol`
    /// (both finite), `max_iterations > 0` and `tolerance` is positive and
    /// finite.
    pub fn new(
        lower_vol: f64,
        upper_vol: f64,
        max_iterations: usize,
        tolerance: f64,
    ) -> crate::error::Result<Self> {
        use crate::validate::{validate_finite, validate_positive};

        validate_finite(lower_vol, "lower_vol")?;
        validate_finite(upper_vol, "upper_vol")?;
        validate_positive(tolerance, "tolerance")?;
        if lower_vol >= upper_vol {
            return Err(IvSmileError::InvalidInput {
                message: format!(
                    "vol bracket must satisfy lower < upper, got [{lower_vol}, {upper_vol}]"
                ),
            });
        }
        if max_iterations == 0 {
            return Err(IvSmileError::InvalidInput {
                message: "max_iterations must be at least 1".into(),
            });
        }
        Ok(Self {
            lower_vol,
            upper_vol,
            max_iterations,
            tolerance,
        })
    }

    pub fn lower_vol(&self) -> f64 {
        self.lower_vol
    }

    pub fn upper_vol(&self) -> f64 {
        self.upper_vol
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// Implied volatility together with solver diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpliedVolSolution {
    /// Best volatility estimate.
    pub vol: f64,
    /// Brent iterations performed.
    pub iterations: usize,
    /// `false` if the iteration cap was hit before the bracket closed.
    pub converged: bool,
}

/// Implied volatility with the default solver configuration.
///
/// Returns `NaN` when `[1e-6, 5.0]` does not bracket a root.
///
/// ```
/// use ivsmile::implied::implied_vol;
/// use ivsmile::pricing::bs_put;
/// use ivsmile::OptionType;
///
/// let price = bs_put(100.0, 100.0, 0.5, 0.02, 0.2);
/// let vol = implied_vol(price, 100.0, 100.0, 0.5, 0.02, OptionType::Put);
/// assert!((vol - 0.2).abs() < 1e-6);
///
/// // Above the maximum call value S: no volatility reproduces it.
/// assert!(implied_vol(101.0, 100.0, 100.0, 0.5, 0.02, OptionType::Call).is_nan());
/// ```
pub fn implied_vol(
    observed_price: f64,
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    option_type: OptionType,
) -> f64 {
    implied_vol_with(
        observed_price,
        spot,
        strike,
        maturity,
        rate,
        option_type,
        &ImpliedVolConfig::default(),
    )
}

/// Implied volatility with an explicit solver configuration.
///
/// Returns `NaN` when the configured bracket does not hold a root; returns
/// the best estimate, converged or not, otherwise.
pub fn implied_vol_with(
    observed_price: f64,
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    option_type: OptionType,
    config: &ImpliedVolConfig,
) -> f64 {
    implied_vol_detailed(observed_price, spot, strike, maturity, rate, option_type, config)
        .map_or(f64::NAN, |s| s.vol)
}

/// Implied volatility with iteration count and convergence status.
///
/// Returns `None` exactly where [`implied_vol_with`] returns `NaN`.
pub fn implied_vol_detailed(
    observed_price: f64,
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    option_type: OptionType,
    config: &ImpliedVolConfig,
) -> Option<ImpliedVolSolution> {
    let objective =
        |vol: f64| bs_price(spot, strike, maturity, rate, vol, option_type) - observed_price;
    let brent_config = BrentConfig {
        max_iter: config.max_iterations,
        tolerance: config.tolerance,
    };
    brent(objective, config.lower_vol, config.upper_vol, &brent_config).map(|r| {
        ImpliedVolSolution {
            vol: r.root,
            iterations: r.iterations,
            converged: r.converged,
        }
    })
}

/// Implied volatility of every quote, index aligned with `quotes`.
///
/// Quotes without an implied volatility yield `NaN` in their slot; nothing
/// is dropped or reordered.
pub fn implied_vols(quotes: &[MarketQuote], params: &PricingParameters) -> Vec<f64> {
    implied_vols_with(quotes, params, &ImpliedVolConfig::default())
}

/// [`implied_vols`] with an explicit solver configuration.
pub fn implied_vols_with(
    quotes: &[MarketQuote],
    params: &PricingParameters,
    config: &ImpliedVolConfig,
) -> Vec<f64> {
    let vols: Vec<f64> = quotes
        .iter()
        .map(|q| {
            implied_vol_with(
                q.price(),
                params.spot(),
                q.strike(),
                params.maturity_years(),
                params.risk_free_rate(),
                q.option_type(),
                config,
            )
        })
        .collect();

    #[cfg(feature = "logging")]
    tracing::debug!(
        n_quotes = quotes.len(),
        n_failed = vols.iter().filter(|v| v.is_nan()).count(),
        "implied vol extraction complete"
    );

    vols
}
