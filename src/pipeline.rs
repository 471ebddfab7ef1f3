//! One end-to-end smile run over a quote set.
//!
//! 1. Invert every quote to an implied volatility (`NaN` where none exists).
//! 2. Keep the clean points: moneyness and vol inside configured bands.
//! 3. Fit the cubic smile to the clean points, if there are enough.
//! 4. Evaluate the fitted smile at every original strike.
//!
//! Every per-quote series in [`SmileRun`] is index aligned with the input
//! quotes. Filtering builds copies; the aligned series are never compacted.

use serde::{Deserialize, Serialize};

use crate::conventions::moneyness;
use crate::error::IvSmileError;
use crate::implied::{ImpliedVolConfig, implied_vol, implied_vols_with};
use crate::pricing::{bs_put, greeks_put};
use crate::smile::{PolynomialCoefficients, evaluate_cubic, fit_cubic};
use crate::types::{Greeks, MarketQuote, OptionType, PricingParameters};
use crate::validate::validate_finite;

/// Volatility used to manufacture the at-the-money diagnostic quote.
pub const DIAGNOSTIC_VOL: f64 = 0.2;

/// Band of acceptable points for the smile fit.
///
/// Both bands are open intervals. A run with fewer than `min_points` clean
/// points skips the fit instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CleanPointFilterRaw", into = "CleanPointFilterRaw")]
pub struct CleanPointFilter {
    min_moneyness: f64,
    max_moneyness: f64,
    min_vol: f64,
    max_vol: f64,
    min_points: usize,
}

#[derive(Serialize, Deserialize)]
struct CleanPointFilterRaw {
    min_moneyness: f64,
    max_moneyness: f64,
    min_vol: f64,
    max_vol: f64,
    min_points: usize,
}

impl TryFrom<CleanPointFilterRaw> for CleanPointFilter {
    type Error = IvSmileError;
    fn try_from(raw: CleanPointFilterRaw) -> Result<Self, Self::Error> {
        Self::new(
            raw.min_moneyness,
            raw.max_moneyness,
            raw.min_vol,
            raw.max_vol,
            raw.min_points,
        )
    }
}

impl From<CleanPointFilter> for CleanPointFilterRaw {
    fn from(f: CleanPointFilter) -> Self {
        Self {
            min_moneyness: f.min_moneyness,
            max_moneyness: f.max_moneyness,
            min_vol: f.min_vol,
            max_vol: f.max_vol,
            min_points: f.min_points,
        }
    }
}

impl Default for CleanPointFilter {
    /// Moneyness in (0.7, 1.3), vol in (0.01, 3.0), at least 8 points.
    fn default() -> Self {
        Self {
            min_moneyness: 0.7,
            max_moneyness: 1.3,
            min_vol: 0.01,
            max_vol: 3.0,
            min_points: 8,
        }
    }
}

impl CleanPointFilter {
    /// Create a filter.
    ///
    /// `min_points` below [`crate::smile::MIN_FIT_POINTS`] is accepted; the fit
    /// itself then reports [`IvSmileError::InsufficientData`].
    ///
    /// # Errors
    /// Returns [`IvSmileError::InvalidInput`] if a bound is not finite or a
    /// band is empty.
    pub fn new(
        min_moneyness: f64,
        max_moneyness: f64,
        min_vol: f64,
        max_vol: f64,
        min_points: usize,
    ) -> crate::error::Result<Self> {
        validate_finite(min_moneyness, "min_moneyness")?;
        validate_finite(max_moneyness, "max_moneyness")?;
        validate_finite(min_vol, "min_vol")?;
        validate_finite(max_vol, "max_vol")?;
        if min_moneyness >= max_moneyness {
            return Err(IvSmileError::InvalidInput {
                message: format!(
                    "moneyness band must satisfy min < max, got ({min_moneyness}, {max_moneyness})"
                ),
            });
        }
        if min_vol >= max_vol {
            return Err(IvSmileError::InvalidInput {
                message: format!("vol band must satisfy min < max, got ({min_vol}, {max_vol})"),
            });
        }
        Ok(Self {
            min_moneyness,
            max_moneyness,
            min_vol,
            max_vol,
            min_points,
        })
    }

    pub fn min_moneyness(&self) -> f64 {
        self.min_moneyness
    }

    pub fn max_moneyness(&self) -> f64 {
        self.max_moneyness
    }

    pub fn min_vol(&self) -> f64 {
        self.min_vol
    }

    pub fn max_vol(&self) -> f64 {
        self.max_vol
    }

    pub fn min_points(&self) -> usize {
        self.min_points
    }

    /// Whether `(strike, vol)` is a clean point for the given spot.
    pub fn accepts(&self, strike: f64, vol: f64, spot: f64) -> bool {
        let m = moneyness(strike, spot);
        m > self.min_moneyness
            && m < self.max_moneyness
            && vol.is_finite()
            && vol > self.min_vol
            && vol < self.max_vol
    }

    /// Copy out the clean `(strikes, vols)`, preserving input order.
    pub fn select(&self, strikes: &[f64], vols: &[f64], spot: f64) -> (Vec<f64>, Vec<f64>) {
        strikes
            .iter()
            .zip(vols)
            .filter(|&(&k, &v)| self.accepts(k, v, spot))
            .map(|(&k, &v)| (k, v))
            .unzip()
    }
}

/// Configuration of one smile run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub implied_vol: ImpliedVolConfig,
    pub filter: CleanPointFilter,
}

/// Result of the fitting stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FitOutcome {
    /// The smile was fitted to `n_points` clean points and evaluated at
    /// every input strike.
    Fitted {
        coefficients: PolynomialCoefficients,
        fitted_vols: Vec<f64>,
        n_points: usize,
    },
    /// Too few clean points; no smile was fitted.
    Skipped { clean_points: usize, required: usize },
}

/// Output of [`run_pipeline`]. All vectors are index aligned with the quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmileRun {
    strikes: Vec<f64>,
    observed_vols: Vec<f64>,
    fit: FitOutcome,
}

impl SmileRun {
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// Implied vol per quote, `NaN` where none exists.
    pub fn observed_vols(&self) -> &[f64] {
        &self.observed_vols
    }

    pub fn fit(&self) -> &FitOutcome {
        &self.fit
    }

    /// Fitted vol per quote, if the fit ran.
    pub fn fitted_vols(&self) -> Option<&[f64]> {
        match &self.fit {
            FitOutcome::Fitted { fitted_vols, .. } => Some(fitted_vols),
            FitOutcome::Skipped { .. } => None,
        }
    }

    pub fn coefficients(&self) -> Option<&PolynomialCoefficients> {
        match &self.fit {
            FitOutcome::Fitted { coefficients, .. } => Some(coefficients),
            FitOutcome::Skipped { .. } => None,
        }
    }

    /// Number of quotes with a finite implied vol.
    pub fn n_solved(&self) -> usize {
        self.observed_vols.iter().filter(|v| v.is_finite()).count()
    }
}

/// Run implied vol extraction and smile fitting over `quotes`.
///
/// # Errors
/// - [`IvSmileError::InvalidInput`] if `quotes` is empty.
/// - [`IvSmileError::InsufficientData`] / [`IvSmileError::SingularSystem`]
///   from the fit when enough clean points exist but the regression fails.
pub fn run_pipeline(
    quotes: &[MarketQuote],
    params: &PricingParameters,
    config: &PipelineConfig,
) -> crate::error::Result<SmileRun> {
    if quotes.is_empty() {
        return Err(IvSmileError::InvalidInput {
            message: "no quotes to process".into(),
        });
    }

    let spot = params.spot();
    let strikes: Vec<f64> = quotes.iter().map(MarketQuote::strike).collect();
    let observed_vols = implied_vols_with(quotes, params, &config.implied_vol);

    let (clean_strikes, clean_vols) = config.filter.select(&strikes, &observed_vols, spot);
    let fit = if clean_strikes.len() < config.filter.min_points() {
        #[cfg(feature = "logging")]
        tracing::warn!(
            clean_points = clean_strikes.len(),
            required = config.filter.min_points(),
            "too few clean points, skipping smile fit"
        );
        FitOutcome::Skipped {
            clean_points: clean_strikes.len(),
            required: config.filter.min_points(),
        }
    } else {
        let coefficients = fit_cubic(&clean_strikes, &clean_vols, spot)?;
        FitOutcome::Fitted {
            fitted_vols: evaluate_cubic(&strikes, &coefficients, spot),
            coefficients,
            n_points: clean_strikes.len(),
        }
    };

    #[cfg(feature = "logging")]
    tracing::debug!(
        n_quotes = quotes.len(),
        n_clean = clean_strikes.len(),
        fitted = matches!(fit, FitOutcome::Fitted { .. }),
        "smile run complete"
    );

    Ok(SmileRun {
        strikes,
        observed_vols,
        fit,
    })
}

/// At-the-money put sanity check for a market snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmDiagnostic {
    /// Vol recovered from the ATM put priced at [`DIAGNOSTIC_VOL`].
    pub implied_vol: f64,
    /// Put Greeks at the recovered vol.
    pub greeks: Greeks,
}

/// Price an ATM put at [`DIAGNOSTIC_VOL`], invert it, and report the Greeks
/// at the recovered vol.
///
/// Returns `None` when the inversion yields no positive vol (e.g. zero
/// maturity, where the price carries no volatility information).
pub fn atm_put_diagnostic(params: &PricingParameters) -> Option<AtmDiagnostic> {
    let (s, t, r) = (
        params.spot(),
        params.maturity_years(),
        params.risk_free_rate(),
    );
    let price = bs_put(s, s, t, r, DIAGNOSTIC_VOL);
    let vol = implied_vol(price, s, s, t, r, OptionType::Put);
    if !vol.is_finite() || vol <= 0.0 {
        return None;
    }
    Some(AtmDiagnostic {
        implied_vol: vol,
        greeks: greeks_put(s, s, t, r, vol),
    })
}
