// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wait for a resource to finish provisioning.
//!
//! Polls `get_resource` with the policy's backoff until the state is terminal:
//!
//! - `Succeeded` returns `Ok(true)`
//! - `Failed` / `Canceled` returns [`ProcessingError::ProvisioningFailed`]
//!   immediately, never retried
//! - still pending after `max_retries` polls returns `Ok(false)`
//!
//! Poll errors matching the retryable pattern share the same attempt counter
//! and backoff as pending states; any other poll error is propagated.

use super::retry::RetryPolicy;
use crate::client::{ProvisioningState, ResourceClient};
use crate::errors::ProcessingError;
use tracing::{debug, error, info, warn};

/// Poll until the resource reaches a terminal provisioning state.
///
/// # Returns
///
/// `Ok(true)` once `Succeeded` is observed, `Ok(false)` if the poll budget
/// ran out first. `false` means "proceed with caution", not failure.
///
/// # Errors
///
/// - [`ProcessingError::ProvisioningFailed`] on `Failed` or `Canceled`
/// - [`ProcessingError::Api`] on a non-retryable poll error
pub async fn wait_for_provisioning<C>(
    client: &C,
    resource_group: &str,
    name: &str,
    policy: &RetryPolicy,
) -> Result<bool, ProcessingError>
where
    C: ResourceClient + ?Sized,
{
    let mut backoff = policy.backoff();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match client.get_resource(resource_group, name).await {
            Ok(resource) => match resource.provisioning_state {
                ProvisioningState::Succeeded => {
                    info!(
                        resource_group = resource_group,
                        resource_name = name,
                        attempt = attempt,
                        "Resource provisioning succeeded"
                    );
                    return Ok(true);
                }
                state @ (ProvisioningState::Failed | ProvisioningState::Canceled) => {
                    error!(
                        resource_group = resource_group,
                        resource_name = name,
                        state = %state,
                        "Resource provisioning reached a terminal failure state"
                    );
                    return Err(ProcessingError::ProvisioningFailed {
                        resource: name.to_string(),
                        state: state.to_string(),
                    });
                }
                ProvisioningState::Pending => {
                    debug!(
                        resource_group = resource_group,
                        resource_name = name,
                        attempt = attempt,
                        "Resource still provisioning"
                    );
                }
            },
            Err(e) => {
                if !policy.is_retryable(&e) {
                    error!(
                        resource_group = resource_group,
                        resource_name = name,
                        error = %e,
                        "Non-retryable error polling provisioning state"
                    );
                    return Err(e.into());
                }
                warn!(
                    resource_group = resource_group,
                    resource_name = name,
                    attempt = attempt,
                    error = %e,
                    "Retryable error polling provisioning state"
                );
            }
        }

        if attempt >= policy.max_retries() {
            warn!(
                resource_group = resource_group,
                resource_name = name,
                attempts = attempt,
                "Resource not provisioned within poll budget"
            );
            return Ok(false);
        }

        let wait = backoff.next_backoff();
        debug!(
            resource_group = resource_group,
            resource_name = name,
            retry_after = ?wait,
            "Waiting before next provisioning poll"
        );
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
#[path = "provisioning_tests.rs"]
mod provisioning_tests;
