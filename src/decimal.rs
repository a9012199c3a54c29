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

//! Fixed-point helpers shared by the rule engine and its adapters.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserialize, Deserializer};
use std::str::FromStr;

/// Minor-unit precision of every monetary amount the engine reports.
pub const MONEY_PRECISION: u32 = 2;

/// Rounds an amount to [`MONEY_PRECISION`] places, halves away from zero.
///
/// The result always carries exactly [`MONEY_PRECISION`] places, so `5`
/// becomes `5.00`.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_PRECISION);
    rounded
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum DecimalRepr {
    Text(String),
    Number(serde_json::Number),
}

/// Deserializes a decimal written either as a JSON string (`"7.5"`) or a
/// JSON number (`7.5`).
///
/// Numbers are parsed from their textual form, so `0.1` stays exactly `0.1`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match DecimalRepr::deserialize(deserializer)? {
        DecimalRepr::Text(text) => text,
        DecimalRepr::Number(number) => number.to_string(),
    };
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|err| de::Error::custom(format!("invalid decimal `{raw}`: {err}")))
}
