// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Link a private endpoint's connection group to its private DNS zone.
//!
//! The zone group is written as a single-entry configuration
//! `{ name: group_id, privateDnsZoneId: zone_resource_id }` under one
//! container name. The remote call is create-or-replace, so repeating it with
//! the same inputs leaves the same final state.
//!
//! Failures never propagate: they are logged as warnings and reported as
//! [`ZoneGroupOutcome::Warning`] so sibling group IDs keep processing.

use super::retry::{execute, RetryOutcome, RetryPolicy};
use crate::client::{ResourceClient, ZoneGroupConfig};
use tracing::{info, warn};

/// Result of one zone group reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneGroupOutcome {
    /// The zone group now holds exactly the requested entry
    Applied,
    /// Reconciliation failed; the reason is the rendered error
    Warning(String),
}

/// Create or overwrite `zone_group_name` on the resource so it links
/// `group_id` to `zone_resource_id`.
pub async fn reconcile_dns_zone_group<C>(
    client: &C,
    resource_group: &str,
    resource_name: &str,
    group_id: &str,
    zone_resource_id: &str,
    zone_group_name: &str,
    policy: &RetryPolicy,
) -> ZoneGroupOutcome
where
    C: ResourceClient + ?Sized,
{
    let configs = [ZoneGroupConfig {
        name: group_id.to_string(),
        private_dns_zone_id: zone_resource_id.to_string(),
    }];
    let configs = &configs;
    let operation_name = format!("configure DNS zone group {zone_group_name} on {resource_name}");

    let outcome = execute(policy, &operation_name, || async move {
        client
            .create_or_replace_dns_zone_group(resource_group, resource_name, zone_group_name, configs)
            .await
    })
    .await;

    match outcome {
        Ok(RetryOutcome::Completed(())) => {
            info!(
                resource_group = resource_group,
                resource_name = resource_name,
                group_id = group_id,
                zone_group = zone_group_name,
                private_dns_zone_id = zone_resource_id,
                "DNS zone group configured"
            );
            ZoneGroupOutcome::Applied
        }
        Ok(RetryOutcome::Exhausted {
            attempts,
            last_error,
        }) => {
            let reason = format!("gave up after {attempts} attempts: {last_error}");
            warn!(
                resource_group = resource_group,
                resource_name = resource_name,
                group_id = group_id,
                reason = %reason,
                "Failed to configure DNS zone group"
            );
            ZoneGroupOutcome::Warning(reason)
        }
        Err(e) => {
            warn!(
                resource_group = resource_group,
                resource_name = resource_name,
                group_id = group_id,
                error = %e,
                "Failed to configure DNS zone group"
            );
            ZoneGroupOutcome::Warning(e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "dns_zone_group_tests.rs"]
mod dns_zone_group_tests;
