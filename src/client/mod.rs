// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cloud resource client abstraction consumed by the pipeline.
//!
//! `ResourceClient` has one method per remote operation. A [`ClientFactory`]
//! hands out a client scoped to a subscription once the event's resource
//! identifier has been parsed.
//!
//! Two implementations ship with the crate:
//!
//! - [`arm::ArmClient`] - Azure Resource Manager REST API over `reqwest`
//! - [`memory::InMemoryResourceClient`] - in-process backend with scripted
//!   provisioning states and injectable failures

pub mod arm;
pub mod memory;

use crate::errors::ApiError;
use std::collections::BTreeMap;
use std::fmt;

/// Remote lifecycle status of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningState {
    /// Any non-terminal value (`Creating`, `Updating`, `Deleting`, ...)
    Pending,
    Succeeded,
    Failed,
    Canceled,
}

impl ProvisioningState {
    /// Map the remote API's state string; anything non-terminal is `Pending`.
    #[must_use]
    pub fn from_remote(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "canceled" | "cancelled" => Self::Canceled,
            _ => Self::Pending,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Canceled => "Canceled",
        };
        f.write_str(s)
    }
}

/// The parts of a remote resource this pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResource {
    pub provisioning_state: ProvisioningState,
    pub tags: BTreeMap<String, String>,
}

/// One entry of a DNS zone group: binds a group ID to a private DNS zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneGroupConfig {
    /// Entry name; set to the group ID
    pub name: String,
    pub private_dns_zone_id: String,
}

/// Remote operations against a single subscription.
#[async_trait::async_trait]
pub trait ResourceClient: Send + Sync {
    /// Read provisioning state and tags.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] if the resource does not exist, or a transient error.
    async fn get_resource(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<RemoteResource, ApiError>;

    /// Write the complete tag set.
    ///
    /// # Errors
    ///
    /// A transient error or [`ApiError::Conflict`].
    async fn set_resource_tags(
        &self,
        resource_group: &str,
        name: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), ApiError>;

    /// Create or overwrite the named DNS zone group with exactly `configs`.
    ///
    /// # Errors
    ///
    /// A transient error or [`ApiError::InvalidArgument`].
    async fn create_or_replace_dns_zone_group(
        &self,
        resource_group: &str,
        resource_name: &str,
        zone_group_name: &str,
        configs: &[ZoneGroupConfig],
    ) -> Result<(), ApiError>;
}

/// Produces subscription-scoped clients.
pub trait ClientFactory: Send + Sync {
    type Client: ResourceClient;

    fn client_for(&self, subscription_id: &str) -> Self::Client;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod mod_tests;
