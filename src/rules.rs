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

//! Individual pricing rules.
//!
//! Each function computes one component of a fare from a single rule row.
//! Absent optional rules produce a zero charge. A missing base tier is an
//! error, as is any amount that overflows a `Decimal`. Amounts are returned
//! unrounded.

use crate::PricingError;
use crate::base::Weekday;
use crate::configuration::{AdditionalRate, BaseTier, ConfigurationSnapshot, TimeSlab, WaitingRule};
use rust_decimal::Decimal;

/// Looks up the base tier for `weekday`.
///
/// # Errors
///
/// Returns [`PricingError::MissingBaseTier`] if the snapshot has no tier for
/// that day.
pub fn resolve_base_tier(
    snapshot: &ConfigurationSnapshot,
    weekday: Weekday,
) -> Result<&BaseTier, PricingError> {
    snapshot
        .base_tier(weekday)
        .ok_or(PricingError::MissingBaseTier { weekday })
}

fn overflow(component: &'static str) -> PricingError {
    PricingError::AmountOverflow { component }
}

/// Kilometers driven beyond the tier's cap, never negative.
pub fn overage_km(tier: &BaseTier, total_distance_km: Decimal) -> Result<Decimal, PricingError> {
    total_distance_km
        .checked_sub(tier.up_to_distance_km)
        .map(|overage| overage.max(Decimal::ZERO))
        .ok_or_else(|| overflow("additional_distance_charge"))
}

/// Charge for the distance beyond the tier's cap.
pub fn additional_distance_charge(
    rate: Option<&AdditionalRate>,
    tier: &BaseTier,
    total_distance_km: Decimal,
) -> Result<Decimal, PricingError> {
    let Some(rate) = rate else {
        return Ok(Decimal::ZERO);
    };
    let overage = overage_km(tier, total_distance_km)?;
    if overage.is_zero() {
        return Ok(Decimal::ZERO);
    }
    rate.per_km_price
        .checked_mul(overage)
        .ok_or_else(|| overflow("additional_distance_charge"))
}

/// Selects the slab covering `minutes`.
///
/// When several slabs match (touching or overlapping ranges), the one with
/// the lowest `from_minutes` wins, then the lowest `to_minutes`. The first
/// authored slab wins among exact duplicates.
pub fn select_time_slab(slabs: &[TimeSlab], minutes: u32) -> Option<&TimeSlab> {
    slabs
        .iter()
        .filter(|slab| slab.contains(minutes))
        .min_by_key(|slab| (slab.from_minutes, slab.to_minutes))
}

/// Multiplier charge on the distance-derived subtotal.
pub fn time_multiplier_charge(
    slab: Option<&TimeSlab>,
    subtotal: Decimal,
) -> Result<Decimal, PricingError> {
    match slab {
        Some(slab) => subtotal
            .checked_mul(slab.multiplier)
            .ok_or_else(|| overflow("time_multiplier_charge")),
        None => Ok(Decimal::ZERO),
    }
}

/// Number of billable waiting slabs; a started slab counts in full.
pub fn waiting_slabs(rule: &WaitingRule, waiting_time_min: u32) -> u32 {
    if waiting_time_min <= rule.free_minutes {
        return 0;
    }
    let billable = waiting_time_min - rule.free_minutes;
    billable.div_ceil(rule.slab_minutes.get())
}

/// Charge for waiting beyond the free allowance.
pub fn waiting_charge(
    rule: Option<&WaitingRule>,
    waiting_time_min: u32,
) -> Result<Decimal, PricingError> {
    match rule {
        Some(rule) => rule
            .charge_per_slab
            .checked_mul(Decimal::from(waiting_slabs(rule, waiting_time_min)))
            .ok_or_else(|| overflow("waiting_charge")),
        None => Ok(Decimal::ZERO),
    }
}
