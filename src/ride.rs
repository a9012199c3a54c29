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

//! Ride measurements and the fare breakdown produced for them.

use crate::PricingError;
use crate::base::Weekday;
use crate::decimal::round_money;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Measurements of one ride, supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRideInputs")]
pub struct RideInputs {
    ride_date: NaiveDate,
    total_distance_km: Decimal,
    total_ride_time_min: u32,
    waiting_time_min: u32,
}

impl RideInputs {
    /// Validates and builds ride inputs.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidRideInputs`] if the distance is negative.
    pub fn new(
        ride_date: NaiveDate,
        total_distance_km: Decimal,
        total_ride_time_min: u32,
        waiting_time_min: u32,
    ) -> Result<Self, PricingError> {
        if total_distance_km.is_sign_negative() && !total_distance_km.is_zero() {
            return Err(PricingError::InvalidRideInputs(format!(
                "total_distance_km must not be negative (got {total_distance_km})"
            )));
        }
        Ok(Self {
            ride_date,
            total_distance_km,
            total_ride_time_min,
            waiting_time_min,
        })
    }

    pub fn ride_date(&self) -> NaiveDate {
        self.ride_date
    }

    /// Weekday of [`Self::ride_date`].
    pub fn weekday(&self) -> Weekday {
        Weekday::of(self.ride_date)
    }

    pub fn total_distance_km(&self) -> Decimal {
        self.total_distance_km
    }

    pub fn total_ride_time_min(&self) -> u32 {
        self.total_ride_time_min
    }

    pub fn waiting_time_min(&self) -> u32 {
        self.waiting_time_min
    }
}

#[derive(Deserialize)]
struct RawRideInputs {
    ride_date: NaiveDate,
    #[serde(deserialize_with = "crate::decimal::deserialize")]
    total_distance_km: Decimal,
    total_ride_time_min: u32,
    waiting_time_min: u32,
}

impl TryFrom<RawRideInputs> for RideInputs {
    type Error = PricingError;

    fn try_from(raw: RawRideInputs) -> Result<Self, Self::Error> {
        RideInputs::new(
            raw.ride_date,
            raw.total_distance_km,
            raw.total_ride_time_min,
            raw.waiting_time_min,
        )
    }
}

/// Monetary breakdown of a ride fare.
///
/// Every component is rounded to two decimal places and `final_price` is
/// their exact sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub base_price: Decimal,
    pub additional_distance_charge: Decimal,
    pub time_multiplier_charge: Decimal,
    pub waiting_charge: Decimal,
    pub final_price: Decimal,
}

impl Breakdown {
    /// Builds a breakdown from the four components.
    ///
    /// Each component is rounded to cents; `final_price` is the exact sum of
    /// the rounded components.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::AmountOverflow`] if the sum does not fit in a
    /// `Decimal`.
    pub fn from_components(
        base_price: Decimal,
        additional_distance_charge: Decimal,
        time_multiplier_charge: Decimal,
        waiting_charge: Decimal,
    ) -> Result<Self, PricingError> {
        let base_price = round_money(base_price);
        let additional_distance_charge = round_money(additional_distance_charge);
        let time_multiplier_charge = round_money(time_multiplier_charge);
        let waiting_charge = round_money(waiting_charge);
        let final_price = [additional_distance_charge, time_multiplier_charge, waiting_charge]
            .into_iter()
            .try_fold(base_price, Decimal::checked_add)
            .ok_or(PricingError::AmountOverflow {
                component: "final_price",
            })?;
        Ok(Self {
            base_price,
            additional_distance_charge,
            time_multiplier_charge,
            waiting_charge,
            final_price,
        })
    }
}
