//! Quote input and result output.
//!
//! The pipeline itself only sees the two traits here. [`QuoteSource`]
//! supplies market quotes, and [`ResultSink`] receives named
//! `(strike, value)` series. With the `io` feature the CSV implementations
//! [`CsvQuoteFile`] and [`CsvDirectorySink`] are available; [`MemorySink`]
//! and the `Vec<MarketQuote>` source are always available.

#[cfg(feature = "io")]
mod csv_file;

#[cfg(feature = "io")]
pub use csv_file::{CsvDirectorySink, CsvQuoteFile};

use serde::{Deserialize, Serialize};

use crate::pipeline::SmileRun;
use crate::types::MarketQuote;
use crate::validate::validate_same_len;

/// Series name of the observed implied vols.
pub const OBSERVED_SERIES: &str = "iv_observed.csv";
/// Column label of the observed implied vols.
pub const OBSERVED_LABEL: &str = "IV";
/// Series name of the fitted smile.
pub const FITTED_SERIES: &str = "iv_poly_fit.csv";
/// Column label of the fitted smile.
pub const FITTED_LABEL: &str = "IV_poly";

/// Supplier of market quotes.
pub trait QuoteSource {
    /// Read all quotes. Rows that are not valid quotes are skipped, not
    /// reported as errors.
    ///
    /// # Errors
    /// Returns an error only when the underlying source cannot be read.
    fn read_quotes(&mut self) -> crate::error::Result<Vec<MarketQuote>>;
}

impl QuoteSource for Vec<MarketQuote> {
    fn read_quotes(&mut self) -> crate::error::Result<Vec<MarketQuote>> {
        Ok(self.clone())
    }
}

/// Receiver of named `(strike, value)` series.
pub trait ResultSink {
    /// Write one series. Implementations skip pairs whose value is `NaN`.
    ///
    /// # Errors
    /// [`crate::IvSmileError::InvalidInput`] if `strikes` and `values` differ in
    /// length; otherwise whatever the destination reports.
    fn write_series(
        &mut self,
        name: &str,
        label: &str,
        strikes: &[f64],
        values: &[f64],
    ) -> crate::error::Result<()>;
}

/// One series captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// In-memory [`ResultSink`], mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    series: Vec<Series>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All series in write order.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// The most recently written series named `name`.
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().rev().find(|s| s.name == name)
    }
}

impl ResultSink for MemorySink {
    fn write_series(
        &mut self,
        name: &str,
        label: &str,
        strikes: &[f64],
        values: &[f64],
    ) -> crate::error::Result<()> {
        validate_same_len(strikes.len(), values.len(), ("strikes", "values"))?;
        self.series.push(Series {
            name: name.to_owned(),
            label: label.to_owned(),
            points: non_nan_points(strikes, values).collect(),
        });
        Ok(())
    }
}

/// Pairs of `(strike, value)` with `NaN` values dropped.
pub(crate) fn non_nan_points<'a>(
    strikes: &'a [f64],
    values: &'a [f64],
) -> impl Iterator<Item = (f64, f64)> + 'a {
    strikes
        .iter()
        .zip(values)
        .filter(|(_, v)| !v.is_nan())
        .map(|(&k, &v)| (k, v))
}

/// Write the observed series of `run`, and the fitted series if the fit ran.
///
/// # Errors
/// Propagates the sink's error.
pub fn write_run(run: &SmileRun, sink: &mut impl ResultSink) -> crate::error::Result<()> {
    sink.write_series(
        OBSERVED_SERIES,
        OBSERVED_LABEL,
        run.strikes(),
        run.observed_vols(),
    )?;
    if let Some(fitted) = run.fitted_vols() {
        sink.write_series(FITTED_SERIES, FITTED_LABEL, run.strikes(), fitted)?;
    }
    Ok(())
}
