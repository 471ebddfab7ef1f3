//! Core domain types for implied volatility extraction.
//!
//! Implied volatilities themselves travel as bare `f64` in vectors parallel
//! to the quote sequence: a `NaN` entry means "no implied volatility exists
//! for this quote" and keeps every later series index aligned with the input.
//!
//! # Why no `Eq` or `Ord`?
//! These types hold `f64`, which does not implement `Eq` or `Ord` because
//! `NaN` breaks total ordering. We derive `PartialEq` only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IvSmileError;
use crate::validate::{validate_finite, validate_non_negative, validate_positive};

/// Option type: call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Right to buy at strike price.
    Call,
    /// Right to sell at strike price.
    Put,
}

impl OptionType {
    /// `true` for [`OptionType::Call`].
    pub fn is_call(self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Map the boolean call flag used by tabular inputs onto the enum.
    pub fn from_is_call(is_call: bool) -> Self {
        if is_call {
            OptionType::Call
        } else {
            OptionType::Put
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => f.write_str("call"),
            OptionType::Put => f.write_str("put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = IvSmileError;

    /// Parses `call`/`c` and `put`/`p`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(IvSmileError::InvalidInput {
                message: format!("option type must be 'call' or 'put', got '{other}'"),
            }),
        }
    }
}

/// One observed option price at a strike.
///
/// Immutable once constructed. The price is not checked against the
/// intrinsic-value floor; a price below it simply has no implied volatility.
///
/// # Examples
/// ```
/// use ivsmile::{MarketQuote, OptionType};
/// let q = MarketQuote::new(95.0, 3.2, OptionType::Put).unwrap();
/// assert_eq!(q.strike(), 95.0);
/// assert!(!q.is_call());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MarketQuoteRaw", into = "MarketQuoteRaw")]
pub struct MarketQuote {
    strike: f64,
    price: f64,
    option_type: OptionType,
}

#[derive(Serialize, Deserialize)]
struct MarketQuoteRaw {
    strike: f64,
    price: f64,
    option_type: OptionType,
}

impl TryFrom<MarketQuoteRaw> for MarketQuote {
    type Error = IvSmileError;
    fn try_from(raw: MarketQuoteRaw) -> Result<Self, Self::Error> {
        Self::new(raw.strike, raw.price, raw.option_type)
    }
}

impl From<MarketQuote> for MarketQuoteRaw {
    fn from(q: MarketQuote) -> Self {
        Self {
            strike: q.strike,
            price: q.price,
            option_type: q.option_type,
        }
    }
}

impl MarketQuote {
    /// Create a quote.
    ///
    /// # Errors
    /// Returns [`IvSmileError::InvalidInput`] if `strike` is not positive and
    /// finite, or `price` is negative or not finite.
    pub fn new(strike: f64, price: f64, option_type: OptionType) -> crate::error::Result<Self> {
        validate_positive(strike, "strike")?;
        validate_non_negative(price, "price")?;
        Ok(Self {
            strike,
            price,
            option_type,
        })
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn is_call(&self) -> bool {
        self.option_type.is_call()
    }
}

/// Market snapshot shared read-only by every quote of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PricingParametersRaw", into = "PricingParametersRaw")]
pub struct PricingParameters {
    spot: f64,
    maturity_years: f64,
    risk_free_rate: f64,
}

#[derive(Serialize, Deserialize)]
struct PricingParametersRaw {
    spot: f64,
    maturity_years: f64,
    risk_free_rate: f64,
}

impl TryFrom<PricingParametersRaw> for PricingParameters {
    type Error = IvSmileError;
    fn try_from(raw: PricingParametersRaw) -> Result<Self, Self::Error> {
        Self::new(raw.spot, raw.maturity_years, raw.risk_free_rate)
    }
}

impl From<PricingParameters> for PricingParametersRaw {
    fn from(p: PricingParameters) -> Self {
        Self {
            spot: p.spot,
            maturity_years: p.maturity_years,
            risk_free_rate: p.risk_free_rate,
        }
    }
}

impl PricingParameters {
    /// Create a snapshot.
    ///
    /// A zero maturity is accepted: the pricer then returns discounted
    /// intrinsic value and no quote has an implied volatility.
    ///
    /// # Errors
    /// Returns [`IvSmileError::InvalidInput`] if `spot` is not positive,
    /// `maturity_years` is negative, or any input is not finite.
    pub fn new(spot: f64, maturity_years: f64, risk_free_rate: f64) -> crate::error::Result<Self> {
        validate_positive(spot, "spot")?;
        validate_non_negative(maturity_years, "maturity_years")?;
        validate_finite(risk_free_rate, "risk_free_rate")?;
        Ok(Self {
            spot,
            maturity_years,
            risk_free_rate,
        })
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn maturity_years(&self) -> f64 {
        self.maturity_years
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }
}

/// First- and second-order Black–Scholes sensitivities.
///
/// Vega is per unit of volatility, theta per year, rho per unit of rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// ∂V/∂S.
    pub delta: f64,
    /// ∂²V/∂S².
    pub gamma: f64,
    /// ∂V/∂σ.
    pub vega: f64,
    /// ∂V/∂t (calendar time, negative for decay).
    pub theta: f64,
    /// ∂V/∂r.
    pub rho: f64,
}
