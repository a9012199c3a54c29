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

//! Pricing configuration snapshots.
//!
//! A [`ConfigurationSnapshot`] is an immutable copy of one pricing
//! configuration and all of its rule rows. The rule engine reads nothing
//! else while evaluating a ride.
//!
//! # Example
//!
//! ```
//! use fare_engine_rs::{BaseTier, ConfigurationId, ConfigurationSnapshot, Weekday};
//! use rust_decimal_macros::dec;
//!
//! let snapshot = ConfigurationSnapshot::new(ConfigurationId(1), "Weekday fares")
//!     .with_base_tier(Weekday::Monday, BaseTier::new(dec!(5), dec!(100)));
//! assert!(snapshot.base_tier(Weekday::Monday).is_some());
//! assert!(snapshot.base_tier(Weekday::Sunday).is_none());
//! ```

use crate::base::{ConfigurationId, Weekday};
use crate::error::LoadError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::num::NonZeroU32;
use std::path::Path;
use tracing::warn;

/// Flat price covering every ride up to a distance cap on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseTier {
    #[serde(deserialize_with = "crate::decimal::deserialize")]
    pub up_to_distance_km: Decimal,
    #[serde(deserialize_with = "crate::decimal::deserialize")]
    pub base_price: Decimal,
}

impl BaseTier {
    pub fn new(up_to_distance_km: Decimal, base_price: Decimal) -> Self {
        Self {
            up_to_distance_km,
            base_price,
        }
    }
}

/// Per-kilometer price for distance beyond the base tier's cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalRate {
    #[serde(deserialize_with = "crate::decimal::deserialize")]
    pub per_km_price: Decimal,
}

impl AdditionalRate {
    pub fn new(per_km_price: Decimal) -> Self {
        Self { per_km_price }
    }
}

/// Ride-duration band whose multiplier applies to the distance subtotal.
///
/// Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlab {
    pub from_minutes: u32,
    pub to_minutes: u32,
    #[serde(deserialize_with = "crate::decimal::deserialize")]
    pub multiplier: Decimal,
}

impl TimeSlab {
    pub fn new(from_minutes: u32, to_minutes: u32, multiplier: Decimal) -> Self {
        Self {
            from_minutes,
            to_minutes,
            multiplier,
        }
    }

    /// Returns `true` if `minutes` falls within `[from_minutes, to_minutes]`.
    pub fn contains(&self, minutes: u32) -> bool {
        self.from_minutes <= minutes && minutes <= self.to_minutes
    }

    /// Returns `true` if the two ranges share more than a boundary minute.
    pub fn overlaps(&self, other: &TimeSlab) -> bool {
        self.from_minutes.max(other.from_minutes) < self.to_minutes.min(other.to_minutes)
    }
}

/// Waiting-time surcharge billed per started slab beyond a free allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingRule {
    #[serde(default)]
    pub free_minutes: u32,
    #[serde(deserialize_with = "crate::decimal::deserialize")]
    pub charge_per_slab: Decimal,
    pub slab_minutes: NonZeroU32,
}

impl WaitingRule {
    pub fn new(free_minutes: u32, charge_per_slab: Decimal, slab_minutes: NonZeroU32) -> Self {
        Self {
            free_minutes,
            charge_per_slab,
            slab_minutes,
        }
    }
}

/// Immutable, fully-resolved copy of one pricing configuration.
///
/// # Invariants
///
/// - At most one base tier per weekday (guaranteed by the map).
/// - At most one additional rate and one waiting rule.
/// - Time slabs keep their authored order; overlaps are tolerated and
///   resolved by the engine's tie-break, never by the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSnapshot {
    id: ConfigurationId,
    name: String,
    #[serde(default)]
    base_tiers: BTreeMap<Weekday, BaseTier>,
    #[serde(default)]
    additional_rate: Option<AdditionalRate>,
    #[serde(default)]
    time_slabs: Vec<TimeSlab>,
    #[serde(default)]
    waiting_rule: Option<WaitingRule>,
}

impl ConfigurationSnapshot {
    /// Creates a snapshot with no rules.
    pub fn new(id: ConfigurationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            base_tiers: BTreeMap::new(),
            additional_rate: None,
            time_slabs: Vec::new(),
            waiting_rule: None,
        }
    }

    /// Sets the base tier for `weekday`, replacing any previous one.
    pub fn with_base_tier(mut self, weekday: Weekday, tier: BaseTier) -> Self {
        self.base_tiers.insert(weekday, tier);
        self
    }

    pub fn with_additional_rate(mut self, rate: AdditionalRate) -> Self {
        self.additional_rate = Some(rate);
        self
    }

    /// Appends a time slab after the existing ones.
    pub fn with_time_slab(mut self, slab: TimeSlab) -> Self {
        self.time_slabs.push(slab);
        self
    }

    pub fn with_waiting_rule(mut self, rule: WaitingRule) -> Self {
        self.waiting_rule = Some(rule);
        self
    }

    pub fn id(&self) -> ConfigurationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_tier(&self, weekday: Weekday) -> Option<&BaseTier> {
        self.base_tiers.get(&weekday)
    }

    pub fn base_tiers(&self) -> impl Iterator<Item = (Weekday, &BaseTier)> {
        self.base_tiers.iter().map(|(day, tier)| (*day, tier))
    }

    pub fn additional_rate(&self) -> Option<&AdditionalRate> {
        self.additional_rate.as_ref()
    }

    pub fn time_slabs(&self) -> &[TimeSlab] {
        &self.time_slabs
    }

    pub fn waiting_rule(&self) -> Option<&WaitingRule> {
        self.waiting_rule.as_ref()
    }

    /// Pairs of time slabs whose ranges overlap beyond a shared boundary.
    ///
    /// Advisory only: evaluation never consults this.
    pub fn overlapping_slabs(&self) -> Vec<(&TimeSlab, &TimeSlab)> {
        let mut pairs = Vec::new();
        for (i, slab) in self.time_slabs.iter().enumerate() {
            for other in &self.time_slabs[i + 1..] {
                if slab.overlaps(other) {
                    pairs.push((slab, other));
                }
            }
        }
        pairs
    }

    /// Parses a snapshot from JSON.
    ///
    /// Overlapping time slabs are logged at `warn` and kept as authored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let snapshot: ConfigurationSnapshot = serde_json::from_reader(reader)?;
        for (a, b) in snapshot.overlapping_slabs() {
            warn!(
                configuration = %snapshot.id,
                first_from = a.from_minutes,
                first_to = a.to_minutes,
                second_from = b.from_minutes,
                second_to = b.to_minutes,
                "overlapping time slabs; lowest range wins"
            );
        }
        Ok(snapshot)
    }

    /// Reads a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }
}
