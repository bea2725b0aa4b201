// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pipeline steps applied to each private endpoint.
//!
//! Each step talks to the remote API through a [`crate::client::ResourceClient`]
//! and takes its [`retry::RetryPolicy`] explicitly.
//!
//! # Available Steps
//!
//! - [`ensure_provisioned_tag`] - Marks the resource as handled (idempotent)
//! - [`wait_for_provisioning`] - Polls until the resource leaves a pending state
//! - [`reconcile_dns_zone_group`] - Links a group ID to its private DNS zone
//!
//! # Example: Running the Steps by Hand
//!
//! ```rust,no_run
//! use pe_dns_manager::client::memory::InMemoryResourceClient;
//! use pe_dns_manager::reconcilers::{
//!     ensure_provisioned_tag, reconcile_dns_zone_group, retry::RetryPolicy, wait_for_provisioning,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = InMemoryResourceClient::new();
//! let policy = RetryPolicy::default();
//!
//! ensure_provisioned_tag(&client, "rg-network", "pe-storage", &policy).await?;
//! if wait_for_provisioning(&client, "rg-network", "pe-storage", &policy).await? {
//!     reconcile_dns_zone_group(
//!         &client,
//!         "rg-network",
//!         "pe-storage",
//!         "blob",
//!         "/subscriptions/H/resourceGroups/rg-dns/providers/Microsoft.Network/privateDnsZones/privatelink.blob.core.windows.net",
//!         "private-endpoint-manager",
//!         &policy,
//!     )
//!     .await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod dns_zone_group;
pub mod provisioning;
pub mod retry;
pub mod tagging;

pub use dns_zone_group::{reconcile_dns_zone_group, ZoneGroupOutcome};
pub use provisioning::wait_for_provisioning;
pub use tagging::{ensure_provisioned_tag, TagOutcome};
