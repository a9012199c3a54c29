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

//! Error types for fare evaluation and configuration handling.

use crate::base::{ConfigurationId, Weekday};
use std::path::PathBuf;
use thiserror::Error;

/// Fare evaluation errors.
///
/// Only data-completeness failures are errors. A missing additional rate,
/// time slab or waiting rule is a zero charge, never an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// No pricing configuration is active
    #[error("no active pricing configuration found")]
    NoActiveConfiguration,

    /// The active configuration has no base tier for the ride's weekday
    #[error("no base tier for {weekday} in the active configuration")]
    MissingBaseTier { weekday: Weekday },

    /// Ride measurements failed shape validation
    #[error("invalid ride inputs: {0}")]
    InvalidRideInputs(String),

    /// A fare component does not fit in a decimal amount
    #[error("{component} overflows the representable amount")]
    AmountOverflow { component: &'static str },
}

impl PricingError {
    /// Stable machine-readable code for adapters.
    pub fn code(&self) -> &'static str {
        match self {
            PricingError::NoActiveConfiguration => "NO_ACTIVE_CONFIGURATION",
            PricingError::MissingBaseTier { .. } => "MISSING_BASE_TIER",
            PricingError::InvalidRideInputs(_) => "INVALID_RIDE_INPUTS",
            PricingError::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
        }
    }
}

/// Configuration registry errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Referenced configuration ID does not exist
    #[error("configuration {0} not found")]
    UnknownConfiguration(ConfigurationId),
}

impl StoreError {
    /// Stable machine-readable code for adapters.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::UnknownConfiguration(_) => "UNKNOWN_CONFIGURATION",
        }
    }
}

/// Errors raised while loading a configuration snapshot from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read pricing file `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse pricing configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            PricingError::NoActiveConfiguration.to_string(),
            "no active pricing configuration found"
        );
        assert_eq!(
            PricingError::MissingBaseTier {
                weekday: Weekday::Monday
            }
            .to_string(),
            "no base tier for monday in the active configuration"
        );
        assert_eq!(
            PricingError::InvalidRideInputs("distance must not be negative".into()).to_string(),
            "invalid ride inputs: distance must not be negative"
        );
        assert_eq!(
            PricingError::AmountOverflow {
                component: "waiting_charge"
            }
            .to_string(),
            "waiting_charge overflows the representable amount"
        );
        assert_eq!(
            StoreError::UnknownConfiguration(ConfigurationId(9)).to_string(),
            "configuration 9 not found"
        );
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            PricingError::NoActiveConfiguration.code(),
            "NO_ACTIVE_CONFIGURATION"
        );
        assert_eq!(
            PricingError::MissingBaseTier {
                weekday: Weekday::Sunday
            }
            .code(),
            "MISSING_BASE_TIER"
        );
        assert_eq!(
            PricingError::InvalidRideInputs(String::new()).code(),
            "INVALID_RIDE_INPUTS"
        );
        assert_eq!(
            PricingError::AmountOverflow {
                component: "final_price"
            }
            .code(),
            "AMOUNT_OVERFLOW"
        );
        assert_eq!(
            StoreError::UnknownConfiguration(ConfigurationId(1)).code(),
            "UNKNOWN_CONFIGURATION"
        );
    }

    #[test]
    fn errors_are_cloneable() {
        let error = PricingError::MissingBaseTier {
            weekday: Weekday::Friday,
        };
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
