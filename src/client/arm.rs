// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Azure Resource Manager implementation of [`ResourceClient`].
//!
//! Requests carry a pre-issued bearer token; acquiring it is the caller's job.
//! Non-success responses are mapped onto [`ApiError`] kinds using the HTTP
//! status and the ARM error body (`{"error": {"code", "message"}}`):
//!
//! | HTTP Code | Kind |
//! |-----------|------|
//! | 404 | `NotFound` |
//! | 409 | `Conflict` |
//! | 429, 5xx | `Transient` |
//! | other 4xx | `InvalidArgument` |

use super::{ClientFactory, ProvisioningState, RemoteResource, ResourceClient, ZoneGroupConfig};
use crate::constants::{
    ARM_REQUEST_TIMEOUT_SECS, NETWORK_API_VERSION, NETWORK_PROVIDER_NAMESPACE,
    PRIVATE_DNS_ZONE_GROUPS_TYPE, PRIVATE_ENDPOINTS_TYPE, TAGS_API_VERSION,
};
use crate::errors::ApiError;
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Shared HTTP client, endpoint and credentials for every subscription.
#[derive(Clone, Debug)]
pub struct ArmConnection {
    http: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl ArmConnection {
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the endpoint is not an absolute
    /// base URL or the HTTP client cannot be built.
    pub fn new(endpoint: &str, token: Option<String>) -> Result<Self, ApiError> {
        let endpoint_url = Url::parse(endpoint).map_err(|e| ApiError::Transport {
            url: endpoint.to_string(),
            reason: format!("invalid endpoint: {e}"),
        })?;
        if endpoint_url.cannot_be_a_base() {
            return Err(ApiError::Transport {
                url: endpoint.to_string(),
                reason: "endpoint cannot be a base URL".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(ARM_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Transport {
                url: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint: endpoint_url,
            token,
        })
    }
}

impl ClientFactory for ArmConnection {
    type Client = ArmClient;

    fn client_for(&self, subscription_id: &str) -> ArmClient {
        ArmClient {
            connection: self.clone(),
            subscription_id: subscription_id.to_string(),
        }
    }
}

/// Resource Manager client bound to one subscription.
#[derive(Clone, Debug)]
pub struct ArmClient {
    connection: ArmConnection,
    subscription_id: String,
}

#[derive(Deserialize)]
struct ArmResource {
    #[serde(default)]
    properties: ArmResourceProperties,
    #[serde(default)]
    tags: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ArmResourceProperties {
    #[serde(default)]
    provisioning_state: Option<String>,
}

#[derive(Deserialize, Default)]
struct ArmErrorEnvelope {
    #[serde(default)]
    error: ArmErrorBody,
}

#[derive(Deserialize, Default)]
struct ArmErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ZoneGroupBody<'a> {
    properties: ZoneGroupProperties<'a>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct ZoneGroupProperties<'a> {
    private_dns_zone_configs: Vec<ZoneConfigEntry<'a>>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct ZoneConfigEntry<'a> {
    name: &'a str,
    properties: ZoneConfigProperties<'a>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct ZoneConfigProperties<'a> {
    private_dns_zone_id: &'a str,
}

impl<'a> ZoneGroupBody<'a> {
    pub(crate) fn new(configs: &'a [ZoneGroupConfig]) -> Self {
        Self {
            properties: ZoneGroupProperties {
                private_dns_zone_configs: configs
                    .iter()
                    .map(|c| ZoneConfigEntry {
                        name: &c.name,
                        properties: ZoneConfigProperties {
                            private_dns_zone_id: &c.private_dns_zone_id,
                        },
                    })
                    .collect(),
            },
        }
    }
}

impl ArmClient {
    /// Segments of `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/privateEndpoints/{name}`.
    fn endpoint_segments<'a>(&'a self, resource_group: &'a str, name: &'a str) -> Vec<&'a str> {
        vec![
            "subscriptions",
            self.subscription_id.as_str(),
            "resourceGroups",
            resource_group,
            "providers",
            NETWORK_PROVIDER_NAMESPACE,
            PRIVATE_ENDPOINTS_TYPE,
            name,
        ]
    }

    fn build_url(&self, segments: &[&str], api_version: &str) -> Result<Url, ApiError> {
        let mut url = self.connection.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Transport {
                url: self.connection.endpoint.to_string(),
                reason: "endpoint cannot be a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &Url,
        resource_group: &str,
        name: &str,
    ) -> Result<reqwest::Response, ApiError> {
        debug!(method = %method, url = %url, "Resource Manager request");

        let request = match &self.connection.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(
            method = %method,
            url = %url,
            status = %status,
            body = %body,
            "Resource Manager request failed"
        );
        Err(map_error_response(status, &body, resource_group, name))
    }
}

/// Map a non-success ARM response onto an [`ApiError`] kind.
pub(crate) fn map_error_response(
    status: StatusCode,
    body: &str,
    resource_group: &str,
    name: &str,
) -> ApiError {
    let envelope: ArmErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let code = if envelope.error.code.is_empty() {
        status.canonical_reason().unwrap_or("Unknown").replace(' ', "")
    } else {
        envelope.error.code
    };
    let message = if envelope.error.message.is_empty() {
        format!("HTTP {status}")
    } else {
        envelope.error.message
    };

    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound {
            resource_group: resource_group.to_string(),
            name: name.to_string(),
        },
        StatusCode::CONFLICT => ApiError::Conflict { code, message },
        s if s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error() => {
            ApiError::Transient { code, message }
        }
        _ => ApiError::InvalidArgument { code, message },
    }
}

#[async_trait::async_trait]
impl ResourceClient for ArmClient {
    async fn get_resource(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<RemoteResource, ApiError> {
        let url = self.build_url(
            &self.endpoint_segments(resource_group, name),
            NETWORK_API_VERSION,
        )?;
        let request = self.connection.http.get(url.clone());
        let response = self
            .send(request, "GET", &url, resource_group, name)
            .await?;

        let resource: ArmResource = response.json().await.map_err(|e| ApiError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(RemoteResource {
            provisioning_state: resource
                .properties
                .provisioning_state
                .as_deref()
                .map_or(ProvisioningState::Pending, ProvisioningState::from_remote),
            tags: resource.tags.unwrap_or_default(),
        })
    }

    async fn set_resource_tags(
        &self,
        resource_group: &str,
        name: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), ApiError> {
        let mut segments = self.endpoint_segments(resource_group, name);
        segments.extend(["providers", "Microsoft.Resources", "tags", "default"]);
        let url = self.build_url(&segments, TAGS_API_VERSION)?;

        let body = json!({
            "operation": "Merge",
            "properties": { "tags": tags },
        });
        let request = self.connection.http.patch(url.clone()).json(&body);
        self.send(request, "PATCH", &url, resource_group, name)
            .await?;
        Ok(())
    }

    async fn create_or_replace_dns_zone_group(
        &self,
        resource_group: &str,
        resource_name: &str,
        zone_group_name: &str,
        configs: &[ZoneGroupConfig],
    ) -> Result<(), ApiError> {
        let mut segments = self.endpoint_segments(resource_group, resource_name);
        segments.extend([PRIVATE_DNS_ZONE_GROUPS_TYPE, zone_group_name]);
        let url = self.build_url(&segments, NETWORK_API_VERSION)?;

        let request = self
            .connection
            .http
            .put(url.clone())
            .json(&ZoneGroupBody::new(configs));
        self.send(request, "PUT", &url, resource_group, resource_name)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "arm_tests.rs"]
mod arm_tests;
