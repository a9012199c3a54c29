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

//! Fare evaluation engine.
//!
//! [`evaluate`] turns one [`ConfigurationSnapshot`] and one [`RideInputs`]
//! into a [`Breakdown`] in a single pass:
//!
//! 1. Resolve the base tier for the ride's weekday.
//! 2. Charge the distance beyond the tier's cap.
//! 3. Apply the matching time slab's multiplier to the distance subtotal.
//! 4. Bill waiting time beyond the free allowance in whole slabs.
//! 5. Zero components whose raw input is zero, then sum.
//!
//! The evaluation reads nothing outside the snapshot and keeps no state, so
//! any number of evaluations may run concurrently.
//!
//! [`Engine`] pairs the evaluation with a [`ConfigurationProvider`], fetching
//! exactly one snapshot per ride.

use crate::configuration::ConfigurationSnapshot;
use crate::provider::ConfigurationProvider;
use crate::ride::{Breakdown, RideInputs};
use crate::{PricingError, rules};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Evaluates a ride against a configuration snapshot.
///
/// # Edge Cases
///
/// | Raw input | Effect |
/// |-----------|--------|
/// | `total_distance_km <= 0` | base price and additional distance charge are zero |
/// | `total_ride_time_min == 0` | time multiplier charge is zero |
/// | `waiting_time_min == 0` | waiting charge is zero |
///
/// The overrides are checked against the raw inputs only; the time
/// multiplier is computed on the subtotal before any override applies.
///
/// # Errors
///
/// - [`PricingError::MissingBaseTier`] - No tier for the ride's weekday.
/// - [`PricingError::AmountOverflow`] - A component does not fit in a `Decimal`.
pub fn evaluate(
    snapshot: &ConfigurationSnapshot,
    inputs: &RideInputs,
) -> Result<Breakdown, PricingError> {
    let weekday = inputs.weekday();
    let tier = rules::resolve_base_tier(snapshot, weekday).inspect_err(|_| {
        warn!(configuration = %snapshot.id(), %weekday, "no base tier for weekday");
    })?;

    let distance = inputs.total_distance_km();
    let mut base_price = tier.base_price;
    let mut additional_distance_charge =
        rules::additional_distance_charge(snapshot.additional_rate(), tier, distance)?;

    // The multiplier applies to the exact subtotal; rounding happens once per
    // component when the breakdown is built.
    let subtotal = base_price
        .checked_add(additional_distance_charge)
        .ok_or(PricingError::AmountOverflow {
            component: "time_multiplier_charge",
        })?;
    let slab = rules::select_time_slab(snapshot.time_slabs(), inputs.total_ride_time_min());
    let mut time_multiplier_charge = rules::time_multiplier_charge(slab, subtotal)?;

    let mut waiting_charge =
        rules::waiting_charge(snapshot.waiting_rule(), inputs.waiting_time_min())?;

    // A zero-distance ride carries no distance-based charge, flat tier included.
    if distance <= Decimal::ZERO {
        base_price = Decimal::ZERO;
        additional_distance_charge = Decimal::ZERO;
    }
    if inputs.total_ride_time_min() == 0 {
        time_multiplier_charge = Decimal::ZERO;
    }
    if inputs.waiting_time_min() == 0 {
        waiting_charge = Decimal::ZERO;
    }

    let breakdown = Breakdown::from_components(
        base_price,
        additional_distance_charge,
        time_multiplier_charge,
        waiting_charge,
    )?;

    debug!(
        configuration = %snapshot.id(),
        %weekday,
        slab = ?slab.map(|s| (s.from_minutes, s.to_minutes)),
        final_price = %breakdown.final_price,
        "evaluated ride"
    );

    Ok(breakdown)
}

/// Evaluates a ride against a snapshot that may not have been found.
///
/// # Errors
///
/// - [`PricingError::NoActiveConfiguration`] - `snapshot` is `None`.
/// - [`PricingError::MissingBaseTier`] - No tier for the ride's weekday.
pub fn evaluate_resolved(
    snapshot: Option<&ConfigurationSnapshot>,
    inputs: &RideInputs,
) -> Result<Breakdown, PricingError> {
    let snapshot = snapshot.ok_or(PricingError::NoActiveConfiguration)?;
    evaluate(snapshot, inputs)
}

/// Prices rides against whatever configuration its provider reports active.
pub struct Engine<P> {
    provider: P,
}

impl<P: ConfigurationProvider> Engine<P> {
    pub fn new(provider: P) -> Self {
        Engine { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Prices one ride.
    ///
    /// The active snapshot is fetched once and used for the whole
    /// evaluation, even if another configuration is activated meanwhile.
    ///
    /// # Errors
    ///
    /// - [`PricingError::NoActiveConfiguration`] - The provider has no active configuration.
    /// - [`PricingError::MissingBaseTier`] - No tier for the ride's weekday.
    pub fn quote(&self, inputs: &RideInputs) -> Result<Breakdown, PricingError> {
        let snapshot = self.provider.active_configuration();
        evaluate_resolved(snapshot.as_deref(), inputs)
    }
}
