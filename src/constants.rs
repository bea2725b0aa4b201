// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the private endpoint DNS manager.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Event Constants
// ============================================================================

/// Event type emitted when a private endpoint is created or updated
pub const EVENT_TYPE_PRIVATE_ENDPOINT_WRITE: &str = "Microsoft.Network/privateEndpoints/write";

// ============================================================================
// Resource Tagging Constants
// ============================================================================

/// Tag key marking a resource as handled by this pipeline
pub const PROVISIONED_STATE_TAG_KEY: &str = "hidden-pe-state";

/// Tag value written under [`PROVISIONED_STATE_TAG_KEY`]
pub const PROVISIONED_STATE_TAG_VALUE: &str = "provisioned";

// ============================================================================
// DNS Zone Group Constants
// ============================================================================

/// Zone group container name; overwritten on every reconciliation
pub const DEFAULT_ZONE_GROUP_NAME: &str = "private-endpoint-manager";

// ============================================================================
// Retry Constants
// ============================================================================

/// Maximum attempts for any retried remote operation
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Wait before the first retry (2 seconds)
pub const DEFAULT_INITIAL_WAIT_SECS: u64 = 2;

/// Cap on the wait between retries (15 seconds)
pub const DEFAULT_MAX_WAIT_SECS: u64 = 15;

/// Backoff multiplier (exponential growth factor)
pub const BACKOFF_MULTIPLIER: u32 = 2;

/// Error messages matching this pattern are treated as transient
pub const DEFAULT_RETRYABLE_ERROR_PATTERN: &str = "RetryableError|ReferencedResourceNotProvisioned";

// ============================================================================
// Azure Resource Manager Constants
// ============================================================================

/// Public cloud Resource Manager endpoint
pub const DEFAULT_ARM_ENDPOINT: &str = "https://management.azure.com";

/// API version for `Microsoft.Network` private endpoint operations
pub const NETWORK_API_VERSION: &str = "2023-09-01";

/// Resource provider namespace for private endpoints
pub const NETWORK_PROVIDER_NAMESPACE: &str = "Microsoft.Network";

/// Resource type segment for private endpoints
pub const PRIVATE_ENDPOINTS_TYPE: &str = "privateEndpoints";

/// Child resource type segment for DNS zone groups
pub const PRIVATE_DNS_ZONE_GROUPS_TYPE: &str = "privateDnsZoneGroups";

/// API version for the `Microsoft.Resources` tags-at-scope API
pub const TAGS_API_VERSION: &str = "2021-04-01";

/// Timeout applied to every Resource Manager HTTP request (30 seconds)
pub const ARM_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding a pre-issued Resource Manager access token
pub const ARM_ACCESS_TOKEN_ENV: &str = "ARM_ACCESS_TOKEN";
