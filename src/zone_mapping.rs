// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Static group ID to private DNS zone mapping.
//!
//! Loaded once per invocation from a JSON document of the form:
//!
//! ```json
//! { "privateDnsZoneMappings": {
//!     "blob": {
//!       "zoneName": "privatelink.blob.core.windows.net",
//!       "resourceId": "/subscriptions/.../privateDnsZones/privatelink.blob.core.windows.net"
//!     }
//! }}
//! ```

use crate::errors::SettingsError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Target private DNS zone for one group ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsZoneTarget {
    pub zone_name: String,
    #[serde(rename = "resourceId")]
    pub zone_resource_id: String,
}

/// Read-only mapping from group ID to target zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsZoneMapping {
    #[serde(rename = "privateDnsZoneMappings", default)]
    zones: HashMap<String, DnsZoneTarget>,
}

impl DnsZoneMapping {
    /// Look up the zone a group ID must be linked to.
    #[must_use]
    pub fn get(&self, group_id: &str) -> Option<&DnsZoneTarget> {
        self.zones.get(group_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Parse the mapping document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Json`] if the document is malformed.
    pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse the mapping document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file cannot be read, or
    /// [`SettingsError::Json`] if it is malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

impl FromIterator<(String, DnsZoneTarget)> for DnsZoneMapping {
    fn from_iter<I: IntoIterator<Item = (String, DnsZoneTarget)>>(iter: I) -> Self {
        Self {
            zones: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "zone_mapping_tests.rs"]
mod zone_mapping_tests;
