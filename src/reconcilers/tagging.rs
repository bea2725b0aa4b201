// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Mark a resource as having passed through this pipeline.
//!
//! Sets `hidden-pe-state=provisioned` while keeping every other tag. The
//! read and the conditional write run as one retried unit, so a duplicate
//! delivery that finds the tag already present performs no write.

use super::retry::{execute, RetryOutcome, RetryPolicy};
use crate::client::ResourceClient;
use crate::constants::{PROVISIONED_STATE_TAG_KEY, PROVISIONED_STATE_TAG_VALUE};
use crate::errors::ApiError;
use serde::Serialize;
use tracing::{info, warn};

/// What the tagger did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum TagOutcome {
    /// The tag was written
    Applied,
    /// The tag was already present; nothing written
    AlreadyPresent,
    /// Retry budget ran out on retryable errors; the resource may be untagged
    Exhausted { attempts: u32 },
}

/// Ensure the provisioned-state tag is present on the resource.
///
/// # Errors
///
/// Returns the first non-retryable [`ApiError`]. Exhaustion is reported as
/// [`TagOutcome::Exhausted`], not as an error.
pub async fn ensure_provisioned_tag<C>(
    client: &C,
    resource_group: &str,
    name: &str,
    policy: &RetryPolicy,
) -> Result<TagOutcome, ApiError>
where
    C: ResourceClient + ?Sized,
{
    let operation_name = format!("tag {resource_group}/{name}");

    let outcome = execute(policy, &operation_name, || async move {
        let resource = client.get_resource(resource_group, name).await?;

        if resource
            .tags
            .get(PROVISIONED_STATE_TAG_KEY)
            .is_some_and(|value| value == PROVISIONED_STATE_TAG_VALUE)
        {
            return Ok(TagOutcome::AlreadyPresent);
        }

        let mut tags = resource.tags;
        tags.insert(
            PROVISIONED_STATE_TAG_KEY.to_string(),
            PROVISIONED_STATE_TAG_VALUE.to_string(),
        );
        client.set_resource_tags(resource_group, name, &tags).await?;
        Ok(TagOutcome::Applied)
    })
    .await?;

    match outcome {
        RetryOutcome::Completed(result) => {
            info!(
                resource_group = resource_group,
                resource_name = name,
                result = ?result,
                "Provisioned-state tag ensured"
            );
            Ok(result)
        }
        RetryOutcome::Exhausted {
            attempts,
            last_error,
        } => {
            warn!(
                resource_group = resource_group,
                resource_name = name,
                attempts = attempts,
                error = %last_error,
                "Could not tag resource, continuing without the provisioned-state tag"
            );
            Ok(TagOutcome::Exhausted { attempts })
        }
    }
}

#[cfg(test)]
#[path = "tagging_tests.rs"]
mod tagging_tests;
