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

//! Tracing subscriber setup.

use crate::config::TelemetryConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter { value: String, source: ParseError },

    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global subscriber, logging to stderr.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::EnvFilter {
                value: config.log_level.clone(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `RUST_LOG` overrides the configured level, so these only hold without it.
    fn rust_log_unset() -> bool {
        std::env::var_os("RUST_LOG").is_none()
    }

    #[test]
    fn accepts_directive_filters() {
        if !rust_log_unset() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "fare_engine_rs=debug,warn".to_string(),
        };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn rejects_malformed_filter() {
        if !rust_log_unset() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "fare_engine_rs=loud".to_string(),
        };
        let err = build_filter(&config).unwrap_err();
        assert!(matches!(
            err,
            TelemetryError::EnvFilter { ref value, .. } if value == "fare_engine_rs=loud"
        ));
        assert!(err.to_string().contains("fare_engine_rs=loud"));
    }
}
