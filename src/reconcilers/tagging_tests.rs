// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `tagging.rs`

#[cfg(test)]
mod tests {
    use super::super::{ensure_provisioned_tag, TagOutcome};
    use crate::client::memory::{InMemoryResourceClient, Operation};
    use crate::client::ProvisioningState;
    use crate::errors::ApiError;
    use crate::reconcilers::retry::RetryPolicy;
    use std::collections::BTreeMap;

    const RG: &str = "rg-network";
    const PE: &str = "pe-storage";

    fn client_with_tags(tags: &[(&str, &str)]) -> InMemoryResourceClient {
        let client = InMemoryResourceClient::new();
        client.insert_resource(
            RG,
            PE,
            ProvisioningState::Succeeded,
            tags.iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        );
        client
    }

    #[tokio::test]
    async fn test_tag_added_and_existing_tags_preserved() {
        let client = client_with_tags(&[("env", "prod"), ("owner", "network-team")]);

        let outcome = ensure_provisioned_tag(&client, RG, PE, &RetryPolicy::default())
            .await
            .unwrap();

        assert_eq!(outcome, TagOutcome::Applied);
        let tags = client.tags(RG, PE).unwrap();
        assert_eq!(tags.get("env").map(String::as_str), Some("prod"));
        assert_eq!(tags.get("owner").map(String::as_str), Some("network-team"));
        assert_eq!(
            tags.get("hidden-pe-state").map(String::as_str),
            Some("provisioned")
        );
    }

    #[tokio::test]
    async fn test_tagging_twice_is_idempotent() {
        let client = client_with_tags(&[("env", "prod")]);
        let policy = RetryPolicy::default();

        ensure_provisioned_tag(&client, RG, PE, &policy).await.unwrap();
        let after_first = client.tags(RG, PE);
        let second = ensure_provisioned_tag(&client, RG, PE, &policy).await.unwrap();

        assert_eq!(second, TagOutcome::AlreadyPresent);
        assert_eq!(client.tags(RG, PE), after_first);
        assert_eq!(client.calls(Operation::SetResourceTags), 1);
    }

    #[tokio::test]
    async fn test_stale_tag_value_is_overwritten() {
        let client = client_with_tags(&[("hidden-pe-state", "pending")]);

        let outcome = ensure_provisioned_tag(&client, RG, PE, &RetryPolicy::default())
            .await
            .unwrap();

        assert_eq!(outcome, TagOutcome::Applied);
        let mut expected = BTreeMap::new();
        expected.insert("hidden-pe-state".to_string(), "provisioned".to_string());
        assert_eq!(client.tags(RG, PE), Some(expected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_does_not_fail() {
        let client = client_with_tags(&[]);
        client.fail_always(
            Operation::SetResourceTags,
            ApiError::Conflict {
                code: "RetryableError".to_string(),
                message: "Concurrent update".to_string(),
            },
        );
        let policy = RetryPolicy::new(3, 1, 1, "RetryableError").unwrap();

        let outcome = ensure_provisioned_tag(&client, RG, PE, &policy).await.unwrap();

        assert_eq!(outcome, TagOutcome::Exhausted { attempts: 3 });
        assert_eq!(client.calls(Operation::GetResource), 3);
    }

    #[tokio::test]
    async fn test_missing_resource_is_fatal() {
        let client = InMemoryResourceClient::new();

        let err = ensure_provisioned_tag(&client, RG, PE, &RetryPolicy::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound { .. }));
    }
}
