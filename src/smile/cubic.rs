//! Least-squares cubic smile in moneyness.
//!
//! Models implied volatility as a cubic in the moneyness offset:
//!
//! ```text
//! iv(x) = a + b·x + c·x² + d·x³,    x = K/S − 1
//! ```
//!
//! The fit accumulates the power sums `Σxᵏ` (k = 0..6) and `Σxᵏ·y`
//! (k = 0..3) in one pass over the data, builds the 4×4 normal equations
//! `XᵀX·θ = Xᵀy` from them and solves with partial pivoting. Accumulation is
//! O(n); the solve is constant size.
//!
//! The cubic is a smoothing device, not a no-arbitrage parameterization:
//! nothing prevents it from turning negative or producing butterfly
//! arbitrage far outside the fitted strike range.

use serde::{Deserialize, Serialize};

use crate::conventions::moneyness_offset;
use crate::error::IvSmileError;
use crate::smile::solve::solve_4x4;
use crate::validate::{validate_positive, validate_same_len};

/// Minimum number of usable points for a cubic fit.
pub const MIN_FIT_POINTS: usize = 6;

/// Coefficients of `iv(x) = a + b·x + c·x² + d·x³` with `x = K/S − 1`.
///
/// `a` is the fitted at-the-money volatility, `b` the skew and `c`, `d`
/// the curvature terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolynomialCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl PolynomialCoefficients {
    /// Evaluate the polynomial at moneyness offset `x` (Horner form).
    pub fn eval_moneyness(&self, x: f64) -> f64 {
        self.a + x * (self.b + x * (self.c + x * self.d))
    }

    /// Evaluate the polynomial at `strike` for the given `spot`.
    pub fn eval_strike(&self, strike: f64, spot: f64) -> f64 {
        self.eval_moneyness(moneyness_offset(strike, spot))
    }
}

/// Fit a cubic smile to `(strike, implied vol)` pairs.
///
/// Pairs whose vol is NaN, infinite or non-positive, or whose strike is not
/// finite, are left out of the regression. The inputs are only read; callers
/// keep their index-aligned sequences intact.
///
/// # Errors
/// - [`IvSmileError::InvalidInput`] if `spot` is not positive and finite or
///   the slices differ in length.
/// - [`IvSmileError::InsufficientData`] if fewer than [`MIN_FIT_POINTS`]
///   pairs are usable.
/// - [`IvSmileError::SingularSystem`] if the usable strikes do not span
///   enough distinct moneyness values (e.g., all identical).
///
/// # Examples
/// ```
/// use ivsmile::smile::fit_cubic;
///
/// let strikes = [80.0, 90.0, 95.0, 100.0, 105.0, 110.0, 120.0];
/// let vols: Vec<f64> = strikes
///     .iter()
///     .map(|k| {
///         let x: f64 = k / 100.0 - 1.0;
///         0.2 - 0.1 * x + 0.3 * x * x
///     })
///     .collect();
/// let coeffs = fit_cubic(&strikes, &vols, 100.0).unwrap();
/// assert!((coeffs.a - 0.2).abs() < 1e-10);
/// assert!((coeffs.b + 0.1).abs() < 1e-10);
/// ```
pub fn fit_cubic(
    strikes: &[f64],
    implied_vols: &[f64],
    spot: f64,
) -> crate::error::Result<PolynomialCoefficients> {
    validate_positive(spot, "spot")?;
    validate_same_len(strikes.len(), implied_vols.len(), ("strikes", "implied_vols"))?;

    let sums = PowerSums::accumulate(strikes, implied_vols, spot);
    if sums.n < MIN_FIT_POINTS {
        return Err(IvSmileError::InsufficientData {
            required: MIN_FIT_POINTS,
            found: sums.n,
        });
    }

    let [a, b, c, d] = solve_4x4(sums.normal_matrix(), sums.xy)?;
    let coeffs = PolynomialCoefficients { a, b, c, d };

    #[cfg(feature = "logging")]
    tracing::debug!(
        n_points = sums.n,
        n_excluded = strikes.len() - sums.n,
        a,
        b,
        c,
        d,
        "cubic smile fit complete"
    );

    Ok(coeffs)
}

/// Evaluate a fitted cubic at every strike, index aligned with `strikes`.
///
/// Strikes excluded from the fit are evaluated too; the output always has
/// one value per input strike.
pub fn evaluate_cubic(strikes: &[f64], coeffs: &PolynomialCoefficients, spot: f64) -> Vec<f64> {
    strikes
        .iter()
        .map(|&k| coeffs.eval_strike(k, spot))
        .collect()
}

/// Power sums for the normal equations of a degree-3 least-squares fit.
struct PowerSums {
    /// `x[k] = Σ xᵏ`, k = 0..6 (`x[0]` is the point count as `f64`).
    x: [f64; 7],
    /// `xy[k] = Σ xᵏ·y`, k = 0..3.
    xy: [f64; 4],
    n: usize,
}

impl PowerSums {
    fn accumulate(strikes: &[f64], vols: &[f64], spot: f64) -> Self {
        let mut sums = Self {
            x: [0.0; 7],
            xy: [0.0; 4],
            n: 0,
        };
        for (&strike, &vol) in strikes.iter().zip(vols) {
            if !vol.is_finite() || vol <= 0.0 || !strike.is_finite() {
                continue;
            }
            let x = moneyness_offset(strike, spot);
            let mut power = 1.0;
            for k in 0..7 {
                sums.x[k] += power;
                if k < 4 {
                    sums.xy[k] += power * vol;
                }
                power *= x;
            }
            sums.n += 1;
        }
        sums
    }

    /// `XᵀX` for the design matrix with columns `1, x, x², x³`.
    fn normal_matrix(&self) -> [[f64; 4]; 4] {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, entry) in row.iter_mut().enumerate() {
                *entry = self.x[i + j];
            }
        }
        m
    }
}

/// A fitted cubic smile bound to the spot it was fitted against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicSmile {
    spot: f64,
    coeffs: PolynomialCoefficients,
}

impl CubicSmile {
    /// Fit a smile; see [`fit_cubic`] for filtering and errors.
    pub fn fit(strikes: &[f64], implied_vols: &[f64], spot: f64) -> crate::error::Result<Self> {
        let coeffs = fit_cubic(strikes, implied_vols, spot)?;
        Ok(Self { spot, coeffs })
    }

    /// Wrap existing coefficients.
    ///
    /// # Errors
    /// Returns [`IvSmileError::InvalidInput`] if `spot` is not positive and finite.
    pub fn new(spot: f64, coeffs: PolynomialCoefficients) -> crate::error::Result<Self> {
        validate_positive(spot, "spot")?;
        Ok(Self { spot, coeffs })
    }

    /// Fitted volatility at `strike`.
    pub fn vol(&self, strike: f64) -> f64 {
        self.coeffs.eval_strike(strike, self.spot)
    }

    /// Fitted volatility at every strike, index aligned.
    pub fn evaluate(&self, strikes: &[f64]) -> Vec<f64> {
        evaluate_cubic(strikes, &self.coeffs, self.spot)
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn coefficients(&self) -> &PolynomialCoefficients {
        &self.coeffs
    }
}
