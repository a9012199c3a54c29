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

//! CSV batch pricing.
//!
//! # CSV Format
//!
//! Input columns: `ride_date, distance_km, ride_time_min, waiting_time_min`
//!
//! ```csv
//! ride_date,distance_km,ride_time_min,waiting_time_min
//! 2025-06-09,7.5,75,10
//! 2025-06-10,0,30,0
//! ```
//!
//! Output columns: `ride_date, base_price, additional_distance_charge,
//! time_multiplier_charge, waiting_charge, final_price`

use crate::engine::Engine;
use crate::provider::ConfigurationProvider;
use crate::ride::{Breakdown, RideInputs};
use crate::PricingError;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::warn;

/// Raw CSV record matching the input format.
#[derive(Debug, Deserialize)]
struct RideRecord {
    ride_date: NaiveDate,
    distance_km: Decimal,
    ride_time_min: u32,
    waiting_time_min: u32,
}

impl RideRecord {
    fn into_inputs(self) -> Result<RideInputs, PricingError> {
        RideInputs::new(
            self.ride_date,
            self.distance_km,
            self.ride_time_min,
            self.waiting_time_min,
        )
    }
}

/// One priced ride, as written to the output CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FareQuote {
    pub ride_date: NaiveDate,
    pub base_price: Decimal,
    pub additional_distance_charge: Decimal,
    pub time_multiplier_charge: Decimal,
    pub waiting_charge: Decimal,
    pub final_price: Decimal,
}

impl FareQuote {
    pub fn new(ride_date: NaiveDate, breakdown: Breakdown) -> Self {
        Self {
            ride_date,
            base_price: breakdown.base_price,
            additional_distance_charge: breakdown.additional_distance_charge,
            time_multiplier_charge: breakdown.time_multiplier_charge,
            waiting_charge: breakdown.waiting_charge,
            final_price: breakdown.final_price,
        }
    }
}

/// Prices every ride in a CSV stream.
///
/// Malformed rows and rides that fail to price are logged and skipped;
/// output order follows input order.
///
/// # Errors
///
/// Returns a CSV error only if the header cannot be read.
pub fn quote_rides<P, R>(engine: &Engine<P>, reader: R) -> Result<Vec<FareQuote>, csv::Error>
where
    P: ConfigurationProvider,
    R: Read,
{
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);
    rdr.headers()?;

    let mut quotes = Vec::new();
    for (index, result) in rdr.deserialize::<RideRecord>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(line, error = %e, "skipping malformed row");
                continue;
            }
        };

        let ride_date = record.ride_date;
        let priced = record
            .into_inputs()
            .and_then(|inputs| engine.quote(&inputs));
        match priced {
            Ok(breakdown) => quotes.push(FareQuote::new(ride_date, breakdown)),
            Err(e) => warn!(line, code = e.code(), error = %e, "skipping ride"),
        }
    }

    Ok(quotes)
}

/// Writes priced rides as CSV.
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_quotes<W: Write>(quotes: &[FareQuote], writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    for quote in quotes {
        wtr.serialize(quote)?;
    }
    wtr.flush()?;
    Ok(())
}
