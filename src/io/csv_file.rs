//! CSV quote reader and CSV result writer.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IvSmileError;
use crate::io::{QuoteSource, ResultSink, non_nan_points};
use crate::types::{MarketQuote, OptionType};
use crate::validate::validate_same_len;

fn csv_error(path: &Path, source: csv::Error) -> IvSmileError {
    IvSmileError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Lenient reader for `strike,price[,side]` quote files.
///
/// - no header is required; any row whose strike or price is not numeric
///   (a header, a note) is skipped
/// - lines starting with `#`, blank lines and single-field rows are skipped
/// - the side is a call iff the third field contains `call`, case-insensitively;
///   rows without a third field take the reader's default side
/// - rows that parse but are not valid quotes (negative price, zero strike)
///   are skipped with a warning
#[derive(Debug, Clone)]
pub struct CsvQuoteFile {
    path: PathBuf,
    default_side: OptionType,
}

impl CsvQuoteFile {
    /// Reader for `path` with [`OptionType::Put`] as the default side.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_side: OptionType::Put,
        }
    }

    pub fn with_default_side(mut self, side: OptionType) -> Self {
        self.default_side = side;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse_row(&self, record: &csv::StringRecord) -> Option<(f64, f64, OptionType)> {
        if record.len() < 2 {
            return None;
        }
        let strike = record.get(0)?.parse::<f64>().ok()?;
        let price = record.get(1)?.parse::<f64>().ok()?;
        let side = match record.get(2) {
            Some(field) if !field.is_empty() => {
                OptionType::from_is_call(field.to_ascii_lowercase().contains("call"))
            }
            _ => self.default_side,
        };
        Some((strike, price, side))
    }
}

impl QuoteSource for CsvQuoteFile {
    fn read_quotes(&mut self) -> crate::error::Result<Vec<MarketQuote>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| csv_error(&self.path, e))?;

        let mut quotes = Vec::new();
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                    #[cfg(feature = "logging")]
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "skipping non-UTF-8 row"
                    );
                    continue;
                }
                Err(e) => return Err(csv_error(&self.path, e)),
            };
            let Some((strike, price, side)) = self.parse_row(&record) else {
                continue;
            };
            match MarketQuote::new(strike, price, side) {
                Ok(quote) => quotes.push(quote),
                Err(_e) => {
                    #[cfg(feature = "logging")]
                    tracing::warn!(
                        path = %self.path.display(),
                        line = record.position().map(|p| p.line()),
                        error = %_e,
                        "skipping invalid quote"
                    );
                }
            }
        }

        #[cfg(feature = "logging")]
        tracing::debug!(path = %self.path.display(), n_quotes = quotes.len(), "read quotes");

        Ok(quotes)
    }
}

/// Writes each series to `<dir>/<name>` as a two-column CSV with header
/// `Strike,<label>`. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct CsvDirectorySink {
    dir: PathBuf,
}

impl CsvDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the series `name` is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl ResultSink for CsvDirectorySink {
    fn write_series(
        &mut self,
        name: &str,
        label: &str,
        strikes: &[f64],
        values: &[f64],
    ) -> crate::error::Result<()> {
        validate_same_len(strikes.len(), values.len(), ("strikes", "values"))?;
        fs::create_dir_all(&self.dir).map_err(|source| IvSmileError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(name);
        let mut writer = csv::Writer::from_path(&path).map_err(|e| csv_error(&path, e))?;
        writer
            .write_record(["Strike", label])
            .map_err(|e| csv_error(&path, e))?;
        for (strike, value) in non_nan_points(strikes, values) {
            writer
                .write_record([strike.to_string(), value.to_string()])
                .map_err(|e| csv_error(&path, e))?;
        }
        writer.flush().map_err(|source| IvSmileError::Io {
            path: path.clone(),
            source,
        })?;

        #[cfg(feature = "logging")]
        tracing::debug!(
            path = %path.display(),
            rows = non_nan_points(strikes, values).count(),
            "wrote series"
        );

        Ok(())
    }
}
