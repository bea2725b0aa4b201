// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP contract tests for the Resource Manager client against a mock server.
//!
//! Run with: cargo test --test arm_client

mod common;

use common::{endpoint_id, event_payload, storage_mapping, ENDPOINT, RESOURCE_GROUP, SUBSCRIPTION};
use pe_dns_manager::client::arm::ArmConnection;
use pe_dns_manager::client::{ClientFactory, ProvisioningState, ResourceClient, ZoneGroupConfig};
use pe_dns_manager::errors::ApiError;
use pe_dns_manager::orchestrator::{EventProcessor, GroupStatus};
use pe_dns_manager::reconcilers::retry::RetryPolicy;
use pe_dns_manager::reconcilers::TagOutcome;
use serde_json::json;
use std::collections::BTreeMap;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn endpoint_path() -> String {
    format!(
        "/subscriptions/{SUBSCRIPTION}/resourceGroups/{RESOURCE_GROUP}/providers/Microsoft.Network/privateEndpoints/{ENDPOINT}"
    )
}

fn connection(server: &MockServer) -> ArmConnection {
    ArmConnection::new(&server.uri(), Some(TOKEN.to_string())).unwrap()
}

#[tokio::test]
async fn test_get_resource_reads_state_and_tags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoint_path()))
        .and(query_param("api-version", "2023-09-01"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": endpoint_id(),
            "name": ENDPOINT,
            "tags": { "env": "prod" },
            "properties": { "provisioningState": "Updating" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = connection(&server).client_for(SUBSCRIPTION);
    let resource = client.get_resource(RESOURCE_GROUP, ENDPOINT).await.unwrap();

    assert_eq!(resource.provisioning_state, ProvisioningState::Pending);
    assert_eq!(resource.tags.get("env").map(String::as_str), Some("prod"));
}

#[tokio::test]
async fn test_get_resource_without_tags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoint_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tags": null,
            "properties": { "provisioningState": "Succeeded" }
        })))
        .mount(&server)
        .await;

    let client = connection(&server).client_for(SUBSCRIPTION);
    let resource = client.get_resource(RESOURCE_GROUP, ENDPOINT).await.unwrap();

    assert_eq!(resource.provisioning_state, ProvisioningState::Succeeded);
    assert!(resource.tags.is_empty());
}

#[tokio::test]
async fn test_get_resource_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoint_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": "ResourceNotFound", "message": "not found" }
        })))
        .mount(&server)
        .await;

    let client = connection(&server).client_for(SUBSCRIPTION);
    let err = client.get_resource(RESOURCE_GROUP, ENDPOINT).await.unwrap_err();

    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[tokio::test]
async fn test_server_error_carries_arm_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoint_path()))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": "RetryableError", "message": "try again" }
        })))
        .mount(&server)
        .await;

    let client = connection(&server).client_for(SUBSCRIPTION);
    let err = client.get_resource(RESOURCE_GROUP, ENDPOINT).await.unwrap_err();

    assert!(RetryPolicy::default().is_retryable(&err));
}

#[tokio::test]
async fn test_set_tags_merges_at_resource_scope() {
    let server = MockServer::start().await;
    let mut tags = BTreeMap::new();
    tags.insert("env".to_string(), "prod".to_string());
    tags.insert("hidden-pe-state".to_string(), "provisioned".to_string());

    Mock::given(method("PATCH"))
        .and(path(format!(
            "{}/providers/Microsoft.Resources/tags/default",
            endpoint_path()
        )))
        .and(query_param("api-version", "2021-04-01"))
        .and(body_json(json!({
            "operation": "Merge",
            "properties": { "tags": { "env": "prod", "hidden-pe-state": "provisioned" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = connection(&server).client_for(SUBSCRIPTION);
    client
        .set_resource_tags(RESOURCE_GROUP, ENDPOINT, &tags)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_put_zone_group_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!(
            "{}/privateDnsZoneGroups/private-endpoint-manager",
            endpoint_path()
        )))
        .and(query_param("api-version", "2023-09-01"))
        .and(body_json(json!({
            "properties": { "privateDnsZoneConfigs": [
                { "name": "blob", "properties": { "privateDnsZoneId": "/zones/blob" } }
            ]}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = connection(&server).client_for(SUBSCRIPTION);
    client
        .create_or_replace_dns_zone_group(
            RESOURCE_GROUP,
            ENDPOINT,
            "private-endpoint-manager",
            &[ZoneGroupConfig {
                name: "blob".to_string(),
                private_dns_zone_id: "/zones/blob".to_string(),
            }],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_put_zone_group_400_is_invalid_argument() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": "InvalidPrivateDnsZoneIds", "message": "bad id" }
        })))
        .mount(&server)
        .await;

    let client = connection(&server).client_for(SUBSCRIPTION);
    let err = client
        .create_or_replace_dns_zone_group(RESOURCE_GROUP, ENDPOINT, "g", &[])
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::InvalidArgument {
            code: "InvalidPrivateDnsZoneIds".to_string(),
            message: "bad id".to_string(),
        }
    );
}

#[tokio::test]
async fn test_event_processed_end_to_end_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoint_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tags": {},
            "properties": { "provisioningState": "Succeeded" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let processor = EventProcessor::new(
        connection(&server),
        storage_mapping(),
        RetryPolicy::default(),
    );
    let report = processor
        .process_payload(event_payload(&[&["blob", "unknown"]]))
        .await
        .unwrap();

    assert_eq!(report.tagging, TagOutcome::Applied);
    assert!(matches!(
        report.groups[0].status,
        GroupStatus::Configured {
            provisioned: true,
            ..
        }
    ));
    assert_eq!(report.groups[1].status, GroupStatus::Skipped);
}
