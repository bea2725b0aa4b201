// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Event entry point: sequences the pipeline for one private endpoint event.
//!
//! Per event, strictly in order:
//!
//! 1. Parse the resource identifier and resolve a subscription-scoped client
//! 2. Ensure the provisioned-state tag (exhaustion tolerated)
//! 3. Extract group IDs from the endpoint's connections
//! 4. For each group ID: look up its zone, wait for provisioning, reconcile
//!    the DNS zone group
//!
//! Failures in steps 1-3 abort the event and are returned so the transport
//! can redeliver. Failures inside step 4 are isolated per group ID and show
//! up in the returned [`EventReport`].

use crate::client::ClientFactory;
use crate::constants::{DEFAULT_ZONE_GROUP_NAME, EVENT_TYPE_PRIVATE_ENDPOINT_WRITE};
use crate::errors::ProcessingError;
use crate::event::PrivateEndpointEvent;
use crate::reconcilers::retry::RetryPolicy;
use crate::reconcilers::{
    ensure_provisioned_tag, reconcile_dns_zone_group, wait_for_provisioning, TagOutcome,
    ZoneGroupOutcome,
};
use crate::resource_id::ResourceIdentifier;
use crate::zone_mapping::DnsZoneMapping;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// Outcome for one group ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GroupStatus {
    /// Zone group written. `provisioned` is false when the poll budget ran
    /// out before the endpoint reported `Succeeded`.
    Configured { zone_name: String, provisioned: bool },
    /// No zone mapping for this group ID
    Skipped,
    /// Provisioning or reconciliation failed
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOutcome {
    pub group_id: String,
    #[serde(flatten)]
    pub status: GroupStatus,
}

/// Everything that happened while processing one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReport {
    pub event_type: String,
    pub resource: ResourceIdentifier,
    pub tagging: TagOutcome,
    pub groups: Vec<GroupOutcome>,
}

impl EventReport {
    /// Whether any group ID failed to configure.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.groups
            .iter()
            .any(|g| matches!(g.status, GroupStatus::Failed { .. }))
    }

    /// Group IDs whose zone group was written, in processing order.
    #[must_use]
    pub fn configured_group_ids(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|g| matches!(g.status, GroupStatus::Configured { .. }))
            .map(|g| g.group_id.as_str())
            .collect()
    }

    /// Group IDs skipped for lack of a zone mapping.
    #[must_use]
    pub fn skipped_group_ids(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|g| g.status == GroupStatus::Skipped)
            .map(|g| g.group_id.as_str())
            .collect()
    }
}

/// Processes private endpoint events against a zone mapping.
///
/// Holds no per-event state; one processor can serve many events, including
/// concurrent deliveries for the same endpoint.
pub struct EventProcessor<F: ClientFactory> {
    factory: F,
    mapping: DnsZoneMapping,
    policy: RetryPolicy,
    zone_group_name: String,
}

impl<F: ClientFactory> EventProcessor<F> {
    #[must_use]
    pub fn new(factory: F, mapping: DnsZoneMapping, policy: RetryPolicy) -> Self {
        Self {
            factory,
            mapping,
            policy,
            zone_group_name: DEFAULT_ZONE_GROUP_NAME.to_string(),
        }
    }

    /// Override the zone group container name.
    #[must_use]
    pub fn with_zone_group_name(mut self, zone_group_name: impl Into<String>) -> Self {
        self.zone_group_name = zone_group_name.into();
        self
    }

    /// Decode a raw payload (object or JSON-encoded string) and process it.
    ///
    /// # Errors
    ///
    /// [`ProcessingError::InvalidEvent`] if the payload cannot be decoded, or
    /// any error from [`Self::process_event`].
    pub async fn process_payload(&self, payload: Value) -> Result<EventReport, ProcessingError> {
        let event = PrivateEndpointEvent::from_value(payload)?;
        self.process_event(&event).await
    }

    /// Run the pipeline for one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource identifier is unparsable or tagging
    /// hits a non-retryable API error. Per-group failures are reported, not
    /// returned.
    pub async fn process_event(
        &self,
        event: &PrivateEndpointEvent,
    ) -> Result<EventReport, ProcessingError> {
        let info = &event.resource_info;

        if event.event_type != EVENT_TYPE_PRIVATE_ENDPOINT_WRITE {
            warn!(
                event_type = %event.event_type,
                resource_id = %info.id,
                "Unexpected event type, processing anyway"
            );
        }

        let resource = ResourceIdentifier::parse(&info.id)?;
        info!(
            subscription_id = %resource.subscription_id,
            resource_group = %resource.resource_group,
            resource_name = %resource.resource_name,
            "Processing private endpoint event"
        );

        let client = self.factory.client_for(&resource.subscription_id);

        let tagging = ensure_provisioned_tag(
            &client,
            &resource.resource_group,
            &resource.resource_name,
            &self.policy,
        )
        .await?;

        let group_ids = info.group_ids();
        if group_ids.is_empty() {
            info!(
                resource_name = %resource.resource_name,
                "Private endpoint has no connection group IDs"
            );
        }

        let mut groups = Vec::with_capacity(group_ids.len());
        for group_id in group_ids {
            let status = self.process_group(&client, &resource, &group_id).await;
            groups.push(GroupOutcome { group_id, status });
        }

        let report = EventReport {
            event_type: event.event_type.clone(),
            resource,
            tagging,
            groups,
        };
        info!(
            resource_name = %report.resource.resource_name,
            configured = ?report.configured_group_ids(),
            skipped = ?report.skipped_group_ids(),
            has_failures = report.has_failures(),
            "Private endpoint event processed"
        );
        Ok(report)
    }

    async fn process_group(
        &self,
        client: &F::Client,
        resource: &ResourceIdentifier,
        group_id: &str,
    ) -> GroupStatus {
        let Some(target) = self.mapping.get(group_id) else {
            info!(
                group_id = group_id,
                resource_name = %resource.resource_name,
                "No private DNS zone mapping for group ID, skipping"
            );
            return GroupStatus::Skipped;
        };

        let provisioned = match wait_for_provisioning(
            client,
            &resource.resource_group,
            &resource.resource_name,
            &self.policy,
        )
        .await
        {
            Ok(provisioned) => provisioned,
            Err(e) => {
                warn!(
                    group_id = group_id,
                    resource_name = %resource.resource_name,
                    error = %e,
                    "Skipping DNS configuration for group ID"
                );
                return GroupStatus::Failed {
                    reason: e.to_string(),
                };
            }
        };

        if !provisioned {
            warn!(
                group_id = group_id,
                resource_name = %resource.resource_name,
                "Endpoint not confirmed provisioned, configuring DNS zone group anyway"
            );
        }

        let outcome = reconcile_dns_zone_group(
            client,
            &resource.resource_group,
            &resource.resource_name,
            group_id,
            &target.zone_resource_id,
            &self.zone_group_name,
            &self.policy,
        )
        .await;

        match outcome {
            ZoneGroupOutcome::Applied => GroupStatus::Configured {
                zone_name: target.zone_name.clone(),
                provisioned,
            },
            ZoneGroupOutcome::Warning(reason) => GroupStatus::Failed { reason },
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod orchestrator_tests;
