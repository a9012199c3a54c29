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

//! Sources of the active pricing configuration.
//!
//! The engine only ever asks a [`ConfigurationProvider`] for the active
//! snapshot, once per evaluation. Which configuration is active is owned
//! entirely by the provider.
//!
//! # Thread Safety
//!
//! [`ConfigurationStore`] keeps snapshots in a [`DashMap`] and the active ID
//! behind a [`RwLock`]. Snapshots are handed out as [`Arc`] clones, so an
//! activation racing an evaluation never exposes a half-updated
//! configuration. Locks are always taken in the order: active ID, then map
//! shard.

use crate::base::ConfigurationId;
use crate::configuration::ConfigurationSnapshot;
use crate::error::StoreError;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Resolves the single active pricing configuration.
pub trait ConfigurationProvider: Send + Sync {
    /// Returns the active snapshot, or `None` if no configuration is active.
    fn active_configuration(&self) -> Option<Arc<ConfigurationSnapshot>>;
}

impl<P: ConfigurationProvider + ?Sized> ConfigurationProvider for Arc<P> {
    fn active_configuration(&self) -> Option<Arc<ConfigurationSnapshot>> {
        (**self).active_configuration()
    }
}

impl<P: ConfigurationProvider + ?Sized> ConfigurationProvider for &P {
    fn active_configuration(&self) -> Option<Arc<ConfigurationSnapshot>> {
        (**self).active_configuration()
    }
}

/// Provider with a fixed (possibly absent) snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    snapshot: Option<Arc<ConfigurationSnapshot>>,
}

impl StaticProvider {
    pub fn new(snapshot: ConfigurationSnapshot) -> Self {
        Self {
            snapshot: Some(Arc::new(snapshot)),
        }
    }

    /// A provider that never has an active configuration.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl ConfigurationProvider for StaticProvider {
    fn active_configuration(&self) -> Option<Arc<ConfigurationSnapshot>> {
        self.snapshot.clone()
    }
}

/// In-memory registry of configurations with at most one active.
#[derive(Debug, Default)]
pub struct ConfigurationStore {
    /// Snapshots indexed by configuration ID.
    configurations: DashMap<ConfigurationId, Arc<ConfigurationSnapshot>>,
    /// ID of the active configuration, if any.
    active: RwLock<Option<ConfigurationId>>,
}

impl ConfigurationStore {
    /// Creates an empty store with nothing active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a configuration, replacing any snapshot with the same ID.
    ///
    /// Replacing the active configuration makes the new snapshot active;
    /// evaluations already holding the old one finish against it.
    pub fn insert(&self, snapshot: ConfigurationSnapshot) -> Option<Arc<ConfigurationSnapshot>> {
        self.configurations.insert(snapshot.id(), Arc::new(snapshot))
    }

    /// Removes a configuration. Removing the active one leaves none active.
    pub fn remove(&self, id: ConfigurationId) -> Option<Arc<ConfigurationSnapshot>> {
        let mut active = self.active.write();
        if *active == Some(id) {
            *active = None;
        }
        self.configurations.remove(&id).map(|(_, snapshot)| snapshot)
    }

    /// Makes `id` the only active configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownConfiguration`] if no configuration has
    /// that ID; the previously active configuration stays active.
    pub fn activate(&self, id: ConfigurationId) -> Result<(), StoreError> {
        let mut active = self.active.write();
        if !self.configurations.contains_key(&id) {
            return Err(StoreError::UnknownConfiguration(id));
        }
        let previous = active.replace(id);
        info!(configuration = %id, previous = ?previous.map(|p| p.0), "activated pricing configuration");
        Ok(())
    }

    /// Leaves no configuration active. Returns the previously active ID.
    pub fn deactivate(&self) -> Option<ConfigurationId> {
        self.active.write().take()
    }

    pub fn active_id(&self) -> Option<ConfigurationId> {
        *self.active.read()
    }

    pub fn get(&self, id: ConfigurationId) -> Option<Arc<ConfigurationSnapshot>> {
        self.configurations.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}

impl ConfigurationProvider for ConfigurationStore {
    fn active_configuration(&self) -> Option<Arc<ConfigurationSnapshot>> {
        let active = self.active.read();
        let id = (*active)?;
        self.get(id)
    }
}
