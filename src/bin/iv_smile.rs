//! iv-smile: implied volatility smile from a file of option quotes.
//!
//! Reads `strike,price[,call|put]` rows, inverts each price to a
//! Black–Scholes implied vol, fits a cubic smile in moneyness to the clean
//! points, and writes `iv_observed.csv` and `iv_poly_fit.csv` to the output
//! directory. Finishes with the Greeks of a diagnostic ATM put.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ivsmile::io::{
    CsvDirectorySink, CsvQuoteFile, FITTED_SERIES, OBSERVED_SERIES, QuoteSource, write_run,
};
use ivsmile::{
    CleanPointFilter, FitOutcome, ImpliedVolConfig, OptionType, PipelineConfig,
    PricingParameters, atm_put_diagnostic, run_pipeline,
};

/// Implied volatility smile extraction
#[derive(Parser)]
#[command(name = "iv-smile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Quote file with `strike,price[,call|put]` rows
    quotes: PathBuf,

    /// Spot price of the underlying
    spot: f64,

    /// Time to maturity in years
    maturity: f64,

    /// Continuously compounded risk-free rate
    #[arg(allow_negative_numbers = true)]
    rate: f64,

    /// Side assumed for rows without a call/put column (call or put)
    side: OptionType,

    /// Directory the result CSVs are written to
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,

    /// Lower moneyness bound (exclusive) for fit points
    #[arg(long, default_value_t = 0.7)]
    min_moneyness: f64,

    /// Upper moneyness bound (exclusive) for fit points
    #[arg(long, default_value_t = 1.3)]
    max_moneyness: f64,

    /// Minimum number of clean points required to fit the smile
    #[arg(long, default_value_t = 8)]
    min_points: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let params = PricingParameters::new(cli.spot, cli.maturity, cli.rate)
        .context("invalid market parameters")?;
    let defaults = CleanPointFilter::default();
    let filter = CleanPointFilter::new(
        cli.min_moneyness,
        cli.max_moneyness,
        defaults.min_vol(),
        defaults.max_vol(),
        cli.min_points,
    )
    .context("invalid clean-point filter")?;
    let config = PipelineConfig {
        implied_vol: ImpliedVolConfig::default(),
        filter,
    };
    tracing::debug!(?params, ?config, "configuration");

    let quotes = CsvQuoteFile::new(&cli.quotes)
        .with_default_side(cli.side)
        .read_quotes()
        .with_context(|| format!("reading quotes from {}", cli.quotes.display()))?;
    if quotes.is_empty() {
        bail!("no quotes read from {}", cli.quotes.display());
    }
    tracing::info!(n_quotes = quotes.len(), "quotes loaded");

    let run = run_pipeline(&quotes, &params, &config).context("smile fit failed")?;
    let mut sink = CsvDirectorySink::new(&cli.out_dir);
    write_run(&run, &mut sink).context("writing results")?;

    println!("[OK] Wrote {}", sink.path_for(OBSERVED_SERIES).display());
    match run.fit() {
        FitOutcome::Skipped {
            clean_points,
            required,
        } => {
            eprintln!("Too few clean points for poly fit ({clean_points} < {required}).");
            return Ok(());
        }
        FitOutcome::Fitted { coefficients, .. } => {
            println!("[OK] Wrote {}", sink.path_for(FITTED_SERIES).display());
            tracing::info!(
                a = coefficients.a,
                b = coefficients.b,
                c = coefficients.c,
                d = coefficients.d,
                "smile coefficients"
            );
        }
    }

    if let Some(diag) = atm_put_diagnostic(&params) {
        let g = diag.greeks;
        println!(
            "ATM put Greeks (iv≈{:.6}): Delta={:.6} Gamma={:.6} Vega={:.6} Theta={:.6} Rho={:.6}",
            diag.implied_vol, g.delta, g.gamma, g.vega, g.theta, g.rho
        );
    }

    println!("[DONE] Price->IV inversion + cubic polynomial smile fit completed.");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
