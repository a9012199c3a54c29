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

//! # Fare Engine
//!
//! This library prices rides from a versioned set of pricing rules: a
//! per-weekday base distance tier, an overage rate beyond that tier, a
//! time multiplier applied in duration bands, and a waiting surcharge billed
//! in slabs.
//!
//! ## Core Components
//!
//! - [`evaluate`]: Pure function from a snapshot and ride inputs to a [`Breakdown`]
//! - [`ConfigurationSnapshot`]: Immutable copy of one configuration's rules
//! - [`ConfigurationProvider`]: Source of the single active snapshot
//! - [`Engine`]: Prices rides against its provider's active snapshot
//! - [`PricingError`]: Error types for evaluation failures
//!
//! ## Example
//!
//! ```
//! use fare_engine_rs::{
//!     AdditionalRate, BaseTier, ConfigurationId, ConfigurationSnapshot, RideInputs, TimeSlab,
//!     WaitingRule, Weekday, evaluate,
//! };
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use std::num::NonZeroU32;
//!
//! let snapshot = ConfigurationSnapshot::new(ConfigurationId(1), "Standard")
//!     .with_base_tier(Weekday::Monday, BaseTier::new(dec!(5), dec!(100)))
//!     .with_additional_rate(AdditionalRate::new(dec!(20)))
//!     .with_time_slab(TimeSlab::new(60, 120, dec!(1.5)))
//!     .with_waiting_rule(WaitingRule::new(5, dec!(10), NonZeroU32::new(5).unwrap()));
//!
//! // 2025-06-09 is a Monday.
//! let ride = RideInputs::new(NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(), dec!(7.5), 75, 10)
//!     .unwrap();
//!
//! let breakdown = evaluate(&snapshot, &ride).unwrap();
//! assert_eq!(breakdown.base_price, dec!(100));
//! assert_eq!(breakdown.additional_distance_charge, dec!(50));
//! assert_eq!(breakdown.time_multiplier_charge, dec!(225));
//! assert_eq!(breakdown.waiting_charge, dec!(10));
//! assert_eq!(breakdown.final_price, dec!(385));
//! ```
//!
//! ## Thread Safety
//!
//! Evaluation is stateless and performs no I/O. [`ConfigurationStore`] can be
//! shared across threads; each evaluation holds its own `Arc` of the snapshot
//! it started with.

mod base;
pub mod batch;
pub mod config;
mod configuration;
pub mod decimal;
mod engine;
pub mod error;
mod provider;
mod ride;
pub mod rules;
pub mod telemetry;

pub use base::{ConfigurationId, ParseWeekdayError, Weekday};
pub use configuration::{AdditionalRate, BaseTier, ConfigurationSnapshot, TimeSlab, WaitingRule};
pub use engine::{Engine, evaluate, evaluate_resolved};
pub use error::{LoadError, PricingError, StoreError};
pub use provider::{ConfigurationProvider, ConfigurationStore, StaticProvider};
pub use ride::{Breakdown, RideInputs};
