//! Error types for the ivsmile library.
//!
//! Only the smile fit and the I/O collaborators fail hard. The pricer never
//! fails (degenerate inputs fall back to intrinsic value) and the implied
//! volatility solver reports "no root in the bracket" in-band as `NaN`.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, IvSmileError>;

/// Errors raised by the smile fit, input validation and quote/result I/O.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IvSmileError {
    /// Input data is invalid (e.g., non-positive spot, mismatched slice lengths).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Too few usable (strike, vol) points to determine the polynomial.
    #[error("insufficient data: cubic fit needs at least {required} usable points, got {found}")]
    InsufficientData { required: usize, found: usize },

    /// A pivot of the normal-equations solve vanished after row exchange.
    ///
    /// Distinct from [`InsufficientData`](IvSmileError::InsufficientData):
    /// enough points were supplied but their moneyness values are degenerate
    /// (e.g., every strike identical).
    #[error("singular system in cubic fit: pivot {pivot:e} in column {column}")]
    SingularSystem { column: usize, pivot: f64 },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer rejected a file.
    #[cfg(feature = "io")]
    #[error("CSV error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
