// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Inbound "private endpoint created" events.
//!
//! The transport layer may hand over either a decoded JSON object or the raw
//! JSON text, so [`PrivateEndpointEvent::from_value`] accepts both. The wire
//! shape is kept in private structs and flattened into [`ResourceInfo`].

use crate::errors::ProcessingError;
use serde::Deserialize;
use serde_json::Value;

/// The inbound unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateEndpointEvent {
    pub event_type: String,
    pub resource_info: ResourceInfo,
}

/// The private endpoint the event refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    pub id: String,
    pub name: String,
    pub connections: Vec<Connection>,
}

/// A private link service connection and the group IDs it targets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Connection {
    pub group_ids: Vec<String>,
}

impl ResourceInfo {
    /// Flatten the group IDs of all connections, in connection order then
    /// declaration order. Duplicates are kept.
    #[must_use]
    pub fn group_ids(&self) -> Vec<String> {
        self.connections
            .iter()
            .flat_map(|connection| connection.group_ids.iter().cloned())
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    event_type: String,
    data: WireData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireData {
    resource_info: WireResourceInfo,
}

#[derive(Deserialize)]
struct WireResourceInfo {
    id: String,
    name: String,
    #[serde(default)]
    properties: WireProperties,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WireProperties {
    #[serde(default)]
    private_link_service_connections: Vec<WireConnection>,
    #[serde(default)]
    manual_private_link_service_connections: Vec<WireConnection>,
}

#[derive(Deserialize)]
struct WireConnection {
    #[serde(default)]
    properties: WireConnectionProperties,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WireConnectionProperties {
    #[serde(default)]
    group_ids: Vec<String>,
}

impl From<WireEvent> for PrivateEndpointEvent {
    fn from(wire: WireEvent) -> Self {
        let info = wire.data.resource_info;
        let connections = info
            .properties
            .private_link_service_connections
            .into_iter()
            .chain(info.properties.manual_private_link_service_connections)
            .map(|c| Connection {
                group_ids: c.properties.group_ids,
            })
            .collect();

        Self {
            event_type: wire.event_type,
            resource_info: ResourceInfo {
                id: info.id,
                name: info.name,
                connections,
            },
        }
    }
}

impl PrivateEndpointEvent {
    /// Decode an event from a JSON value. A JSON string value is treated as
    /// encoded JSON and decoded once more.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::InvalidEvent`] if the payload does not carry
    /// `eventType` and `data.resourceInfo.{id,name}`.
    pub fn from_value(value: Value) -> Result<Self, ProcessingError> {
        match value {
            Value::String(text) => Self::from_json_str(&text),
            other => serde_json::from_value::<WireEvent>(other)
                .map(Into::into)
                .map_err(invalid_event),
        }
    }

    /// Decode an event from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::InvalidEvent`] if the text is not a valid event.
    pub fn from_json_str(text: &str) -> Result<Self, ProcessingError> {
        serde_json::from_str::<WireEvent>(text)
            .map(Into::into)
            .map_err(invalid_event)
    }
}

#[allow(clippy::needless_pass_by_value)]
fn invalid_event(err: serde_json::Error) -> ProcessingError {
    ProcessingError::InvalidEvent {
        reason: err.to_string(),
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod event_tests;
