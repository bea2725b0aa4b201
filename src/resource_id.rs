// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Positional decomposition of cloud resource identifiers.
//!
//! Identifiers have the shape
//! `/subscriptions/{sub}/resourceGroups/{rg}/providers/{provider}/{type}/{name}`.
//! Only the segments at index 2 (subscription), index 4 (resource group) and
//! the last segment (resource name) are read. Segment keywords are never
//! inspected, so child resources such as private link connections resolve
//! the same way as top-level endpoints.

use crate::errors::ProcessingError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const SUBSCRIPTION_INDEX: usize = 2;
const RESOURCE_GROUP_INDEX: usize = 4;

/// Subscription, resource group and resource name of a cloud resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIdentifier {
    pub subscription_id: String,
    pub resource_group: String,
    pub resource_name: String,
}

impl ResourceIdentifier {
    /// Decompose an identifier string by segment position.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::UnparsableResourceId`] if the identifier has
    /// too few segments for the name to sit past the resource group, or if any
    /// of the three extracted segments is empty.
    pub fn parse(id: &str) -> Result<Self, ProcessingError> {
        let segments: Vec<&str> = id.split('/').collect();

        if segments.len() <= RESOURCE_GROUP_INDEX + 1 {
            return Err(unparsable(
                id,
                format!(
                    "expected more than {} path segments, found {}",
                    RESOURCE_GROUP_INDEX + 1,
                    segments.len()
                ),
            ));
        }

        let subscription_id = segments[SUBSCRIPTION_INDEX];
        let resource_group = segments[RESOURCE_GROUP_INDEX];
        let resource_name = segments.last().copied().unwrap_or_default();

        for (field, value) in [
            ("subscription", subscription_id),
            ("resource group", resource_group),
            ("resource name", resource_name),
        ] {
            if value.is_empty() {
                return Err(unparsable(id, format!("{field} segment is empty")));
            }
        }

        Ok(Self {
            subscription_id: subscription_id.to_string(),
            resource_group: resource_group.to_string(),
            resource_name: resource_name.to_string(),
        })
    }
}

fn unparsable(id: &str, reason: String) -> ProcessingError {
    ProcessingError::UnparsableResourceId {
        id: id.to_string(),
        reason,
    }
}

impl FromStr for ResourceIdentifier {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.subscription_id, self.resource_group, self.resource_name
        )
    }
}

#[cfg(test)]
#[path = "resource_id_tests.rs"]
mod resource_id_tests;
