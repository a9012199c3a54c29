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

//! Rule engine public API integration tests.

use chrono::NaiveDate;
use fare_engine_rs::{
    AdditionalRate, BaseTier, Breakdown, ConfigurationId, ConfigurationSnapshot,
    ConfigurationStore, Engine, PricingError, RideInputs, StaticProvider, TimeSlab, WaitingRule,
    Weekday, evaluate, evaluate_resolved,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::num::NonZeroU32;

/// 2025-06-09 was a Monday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 9).unwrap()
}

fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

fn waiting_rule(free: u32, charge: Decimal, slab: u32) -> WaitingRule {
    WaitingRule::new(free, charge, NonZeroU32::new(slab).unwrap())
}

/// Monday tier {5 km, 100}, 20/km, 60-120 min x1.5, 5 free minutes then 10 per 5 minutes.
fn standard_config() -> ConfigurationSnapshot {
    ConfigurationSnapshot::new(ConfigurationId(1), "Test Config")
        .with_base_tier(Weekday::Monday, BaseTier::new(dec!(5), dec!(100)))
        .with_additional_rate(AdditionalRate::new(dec!(20)))
        .with_time_slab(TimeSlab::new(60, 120, dec!(1.5)))
        .with_waiting_rule(waiting_rule(5, dec!(10), 5))
}

fn ride(date: NaiveDate, distance: Decimal, time: u32, waiting: u32) -> RideInputs {
    RideInputs::new(date, distance, time, waiting).unwrap()
}

// =============================================================================
// Reference Scenarios
// =============================================================================

#[test]
fn scenario_a_full_breakdown() {
    let breakdown = evaluate(&standard_config(), &ride(monday(), dec!(7.5), 75, 10)).unwrap();

    assert_eq!(breakdown.base_price, dec!(100));
    assert_eq!(breakdown.additional_distance_charge, dec!(50)); // (7.5 - 5) * 20
    assert_eq!(breakdown.time_multiplier_charge, dec!(225)); // (100 + 50) * 1.5
    assert_eq!(breakdown.waiting_charge, dec!(10)); // 5 billable minutes = 1 slab
    assert_eq!(breakdown.final_price, dec!(385));
}

#[test]
fn scenario_b_zero_distance_is_free_of_distance_charges() {
    let breakdown = evaluate(&standard_config(), &ride(monday(), dec!(0), 75, 10)).unwrap();

    assert_eq!(breakdown.base_price, Decimal::ZERO);
    assert_eq!(breakdown.additional_distance_charge, Decimal::ZERO);
    assert_eq!(
        breakdown.final_price,
        breakdown.time_multiplier_charge + breakdown.waiting_charge
    );
    // The multiplier is computed before the zero-distance override.
    assert_eq!(breakdown.time_multiplier_charge, dec!(150));
    assert_eq!(breakdown.waiting_charge, dec!(10));
    assert_eq!(breakdown.final_price, dec!(160));
}

#[test]
fn scenario_c_missing_weekday_tier() {
    let result = evaluate(&standard_config(), &ride(tuesday(), dec!(7.5), 75, 10));
    assert_eq!(
        result,
        Err(PricingError::MissingBaseTier {
            weekday: Weekday::Tuesday
        })
    );
}

#[test]
fn scenario_d_waiting_equal_to_free_minutes() {
    let breakdown = evaluate(&standard_config(), &ride(monday(), dec!(3), 30, 5)).unwrap();
    assert_eq!(breakdown.waiting_charge, Decimal::ZERO);
    assert_eq!(breakdown.final_price, dec!(100));
}

#[test]
fn scenario_e_shared_boundary_picks_lower_slab() {
    let config = ConfigurationSnapshot::new(ConfigurationId(2), "Touching slabs")
        .with_base_tier(Weekday::Monday, BaseTier::new(dec!(5), dec!(100)))
        .with_time_slab(TimeSlab::new(60, 120, dec!(1.5)))
        .with_time_slab(TimeSlab::new(0, 60, dec!(1.2)));

    let breakdown = evaluate(&config, &ride(monday(), dec!(3), 60, 0)).unwrap();
    assert_eq!(breakdown.time_multiplier_charge, dec!(120));

    let breakdown = evaluate(&config, &ride(monday(), dec!(3), 61, 0)).unwrap();
    assert_eq!(breakdown.time_multiplier_charge, dec!(150));
}

#[test]
fn tuesday_config_breakdown() {
    let config = ConfigurationSnapshot::new(ConfigurationId(3), "API Config")
        .with_base_tier(Weekday::Tuesday, BaseTier::new(dec!(5), dec!(90)))
        .with_additional_rate(AdditionalRate::new(dec!(15)))
        .with_time_slab(TimeSlab::new(60, 120, dec!(2.0)))
        .with_waiting_rule(waiting_rule(5, dec!(5), 5));

    let breakdown = evaluate(&config, &ride(tuesday(), dec!(10), 75, 10)).unwrap();
    assert_eq!(
        breakdown,
        Breakdown::from_components(dec!(90), dec!(75), dec!(330), dec!(5)).unwrap()
    );
    assert_eq!(breakdown.final_price, dec!(500));
}

// =============================================================================
// Optional Rules
// =============================================================================

#[test]
fn base_tier_only() {
    let config = ConfigurationSnapshot::new(ConfigurationId(4), "Flat")
        .with_base_tier(Weekday::Monday, BaseTier::new(dec!(5), dec!(100)));

    let breakdown = evaluate(&config, &ride(monday(), dec!(42), 300, 60)).unwrap();
    assert_eq!(breakdown.base_price, dec!(100));
    assert_eq!(breakdown.additional_distance_charge, Decimal::ZERO);
    assert_eq!(breakdown.time_multiplier_charge, Decimal::ZERO);
    assert_eq!(breakdown.waiting_charge, Decimal::ZERO);
    assert_eq!(breakdown.final_price, dec!(100));
}

#[test]
fn ride_time_outside_all_slabs_is_not_an_error() {
    let breakdown = evaluate(&standard_config(), &ride(monday(), dec!(3), 121, 0)).unwrap();
    assert_eq!(breakdown.time_multiplier_charge, Decimal::ZERO);
    assert_eq!(breakdown.final_price, dec!(100));
}

#[test]
fn distance_exactly_at_cap_has_no_overage() {
    let breakdown = evaluate(&standard_config(), &ride(monday(), dec!(5), 0, 0)).unwrap();
    assert_eq!(breakdown.additional_distance_charge, Decimal::ZERO);
}

#[test]
fn fractional_overage_is_exact() {
    let breakdown = evaluate(&standard_config(), &ride(monday(), dec!(5.333), 0, 0)).unwrap();
    // 0.333 km * 20 = 6.66
    assert_eq!(breakdown.additional_distance_charge, dec!(6.66));
    assert_eq!(breakdown.final_price, dec!(106.66));
}

#[test]
fn waiting_partial_slab_rounds_up() {
    let breakdown = evaluate(&standard_config(), &ride(monday(), dec!(3), 0, 12)).unwrap();
    // 7 billable minutes = 2 slabs
    assert_eq!(breakdown.waiting_charge, dec!(20));
}

#[test]
fn zero_distance_with_zero_time_and_waiting_is_free() {
    let breakdown = evaluate(&standard_config(), &ride(monday(), dec!(0), 0, 0)).unwrap();
    assert_eq!(breakdown.final_price, Decimal::ZERO);
}

// =============================================================================
// Active Configuration
// =============================================================================

#[test]
fn absent_snapshot_is_no_active_configuration() {
    let result = evaluate_resolved(None, &ride(monday(), dec!(7.5), 75, 10));
    assert_eq!(result, Err(PricingError::NoActiveConfiguration));

    let engine = Engine::new(StaticProvider::empty());
    assert_eq!(
        engine.quote(&ride(monday(), dec!(7.5), 75, 10)),
        Err(PricingError::NoActiveConfiguration)
    );
}

#[test]
fn engine_follows_activation() {
    let store = ConfigurationStore::new();
    store.insert(standard_config());
    store.insert(
        ConfigurationSnapshot::new(ConfigurationId(2), "Cheap Mondays")
            .with_base_tier(Weekday::Monday, BaseTier::new(dec!(10), dec!(40))),
    );
    let engine = Engine::new(store);
    let inputs = ride(monday(), dec!(7.5), 75, 10);

    assert_eq!(
        engine.quote(&inputs),
        Err(PricingError::NoActiveConfiguration)
    );

    engine.provider().activate(ConfigurationId(1)).unwrap();
    assert_eq!(engine.quote(&inputs).unwrap().final_price, dec!(385));

    engine.provider().activate(ConfigurationId(2)).unwrap();
    assert_eq!(engine.quote(&inputs).unwrap().final_price, dec!(40));

    engine.provider().deactivate();
    assert_eq!(
        engine.quote(&inputs),
        Err(PricingError::NoActiveConfiguration)
    );
}

#[test]
fn snapshot_loaded_from_json_prices_like_built_one() {
    let json = r#"{
        "id": 1,
        "name": "Test Config",
        "base_tiers": { "monday": { "up_to_distance_km": 5, "base_price": 100 } },
        "additional_rate": { "per_km_price": 20 },
        "time_slabs": [ { "from_minutes": 60, "to_minutes": 120, "multiplier": 1.5 } ],
        "waiting_rule": { "free_minutes": 5, "charge_per_slab": 10, "slab_minutes": 5 }
    }"#;
    let loaded = ConfigurationSnapshot::from_reader(json.as_bytes()).unwrap();
    let inputs = ride(monday(), dec!(7.5), 75, 10);

    assert_eq!(
        evaluate(&loaded, &inputs).unwrap(),
        evaluate(&standard_config(), &inputs).unwrap()
    );
}
