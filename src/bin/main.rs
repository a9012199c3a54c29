// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fare_engine_rs::batch::{quote_rides, write_quotes};
use fare_engine_rs::config::{AppConfig, ConfigError};
use fare_engine_rs::telemetry::{self, TelemetryError};
use fare_engine_rs::{
    ConfigurationSnapshot, ConfigurationStore, Engine, LoadError, PricingError, RideInputs,
    StoreError,
};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing::info;

/// Fare Engine - Price rides from a pricing configuration
///
/// Loads one pricing configuration (JSON), makes it the active one, and
/// prices rides against it.
#[derive(Parser, Debug)]
#[command(name = "fare-engine-rs")]
#[command(about = "A rule engine that prices rides from a pricing configuration", long_about = None)]
struct Cli {
    /// Path to the pricing configuration JSON (overrides FARE_PRICING_PATH)
    #[arg(long, short, value_name = "FILE", global = true)]
    pricing: Option<PathBuf>,

    /// Log filter such as `info` or `fare_engine_rs=debug` (overrides FARE_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price every ride in a CSV file and write the fares to stdout
    ///
    /// Expected format: ride_date,distance_km,ride_time_min,waiting_time_min
    /// Example: cargo run -- --pricing pricing.json batch rides.csv > fares.csv
    Batch {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
    /// Price a single ride and print the breakdown as JSON
    Quote {
        /// Ride date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// Total distance in kilometers
        #[arg(long)]
        distance: Decimal,
        /// Total ride time in minutes
        #[arg(long, default_value_t = 0)]
        ride_time: u32,
        /// Waiting time in minutes
        #[arg(long, default_value_t = 0)]
        waiting_time: u32,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("no pricing configuration given (use --pricing or FARE_PRICING_PATH)")]
    MissingPricing,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("error opening file '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = AppConfig::load()?;
    if let Some(level) = cli.log_level {
        config.telemetry.log_level = level;
    }
    telemetry::init(&config.telemetry)?;

    let pricing_path = cli
        .pricing
        .or(config.pricing_path)
        .ok_or(CliError::MissingPricing)?;
    let snapshot = ConfigurationSnapshot::from_path(&pricing_path)?;
    info!(
        configuration = %snapshot.id(),
        name = snapshot.name(),
        path = %pricing_path.display(),
        "loaded pricing configuration"
    );

    let store = ConfigurationStore::new();
    let id = snapshot.id();
    store.insert(snapshot);
    store.activate(id)?;
    let engine = Engine::new(store);

    match cli.command {
        Command::Batch { input } => {
            let file = File::open(&input).map_err(|source| CliError::Open {
                path: input.clone(),
                source,
            })?;
            let quotes = quote_rides(&engine, BufReader::new(file))?;
            write_quotes(&quotes, io::stdout())?;
        }
        Command::Quote {
            date,
            distance,
            ride_time,
            waiting_time,
        } => {
            let inputs = RideInputs::new(date, distance, ride_time, waiting_time)?;
            let breakdown = engine.quote(&inputs)?;
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
        }
    }

    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date(" 2025-06-09 "),
            Ok(NaiveDate::from_ymd_opt(2025, 6, 9).unwrap())
        );
        assert!(parse_date("09/06/2025").is_err());
    }

    #[test]
    fn parses_quote_command() {
        let cli = Cli::try_parse_from([
            "fare-engine-rs",
            "--pricing",
            "pricing.json",
            "quote",
            "--date",
            "2025-06-09",
            "--distance",
            "7.5",
            "--ride-time",
            "75",
        ])
        .unwrap();

        assert_eq!(cli.pricing, Some(PathBuf::from("pricing.json")));
        match cli.command {
            Command::Quote {
                date,
                distance,
                ride_time,
                waiting_time,
            } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
                assert_eq!(distance, Decimal::new(75, 1));
                assert_eq!(ride_time, 75);
                assert_eq!(waiting_time, 0);
            }
            other => panic!("expected quote command, got {other:?}"),
        }
    }

    #[test]
    fn parses_batch_command_with_trailing_global_flag() {
        let cli = Cli::try_parse_from(["fare-engine-rs", "batch", "rides.csv", "-p", "p.json"])
            .unwrap();
        assert_eq!(cli.pricing, Some(PathBuf::from("p.json")));
        assert!(matches!(cli.command, Command::Batch { ref input } if input == &PathBuf::from("rides.csv")));
    }

    #[test]
    fn rejects_bad_distance() {
        let result = Cli::try_parse_from([
            "fare-engine-rs",
            "quote",
            "--date",
            "2025-06-09",
            "--distance",
            "far",
        ]);
        assert!(result.is_err());
    }
}
