//! Logbook report binary.
//!
//! Imports a JSON logbook export into an in-memory repository and prints the
//! monthly or yearly report as JSON.
//!
//! # Usage
//!
//! ```bash
//! astrolog-report logbook.json monthly 2013-12
//! astrolog-report logbook.json yearly 2013
//! ```
//!
//! Prints `no data` when no session falls in the requested period.
//!
//! # Environment Variables
//!
//! - `ASTROLOG_CONFIG`: Path to the configuration file (default: `astrolog.toml` lookup)
//! - `RUST_LOG`: Log filter directives, e.g. `astrolog=debug` (default: info)

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use astrolog::db::{self, LogbookConfig};
use astrolog::io::LogbookLoader;
use astrolog::services::{self, Report};

const USAGE: &str = "usage: astrolog-report <logbook.json> monthly YYYY-MM | yearly YYYY";

#[derive(Debug, PartialEq, Eq)]
enum Period {
    Month { year: i32, month: u32 },
    Year(i32),
}

fn parse_period(kind: &str, value: &str) -> Result<Period> {
    match kind {
        "monthly" => {
            let (year, month) = value
                .split_once('-')
                .with_context(|| format!("Expected YYYY-MM, got '{}'", value))?;
            Ok(Period::Month {
                year: year.parse().with_context(|| format!("Invalid year '{}'", year))?,
                month: month
                    .parse()
                    .with_context(|| format!("Invalid month '{}'", month))?,
            })
        }
        "yearly" => Ok(Period::Year(
            value
                .parse()
                .with_context(|| format!("Invalid year '{}'", value))?,
        )),
        other => bail!("Unknown period '{}'\n{}", other, USAGE),
    }
}

fn render(report: Option<Report>) -> Result<String> {
    match report {
        Some(report) => Ok(serde_json::to_string_pretty(&report)?),
        None => Ok("no data".to_string()),
    }
}

/// Filter from `RUST_LOG` directives, falling back to `info` when unset or unparsable.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(log_filter(env::var("RUST_LOG").ok()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [path, kind, value] = args.as_slice() else {
        bail!(USAGE);
    };
    let period = parse_period(kind, value)?;

    let config = LogbookConfig::from_env().context("Failed to load configuration")?;
    let repo = db::create_repository(&config).context("Failed to create repository")?;

    let summary = LogbookLoader::import_file(repo.as_ref(), &PathBuf::from(path))?;
    info!(
        "Loaded {} sessions with {} observations",
        summary.sessions, summary.observations_created
    );

    let report = match period {
        Period::Month { year, month } => services::get_monthly_report(repo.as_ref(), year, month)?,
        Period::Year(year) => services::get_yearly_report(repo.as_ref(), year)?,
    };
    println!("{}", render(report)?);

    Ok(())
}
