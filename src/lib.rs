// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # pe-dns-manager - Private Endpoint DNS Zone Automation
//!
//! Reacts to "private endpoint created" events and links each endpoint to the
//! centrally managed private DNS zone for its connection group IDs.
//!
//! ## Overview
//!
//! For every event the pipeline:
//!
//! - Parses the endpoint's resource identifier
//! - Tags the endpoint `hidden-pe-state=provisioned`
//! - Extracts the group IDs of its private link connections
//! - For each mapped group ID, waits for provisioning and writes the DNS zone group
//!
//! Every remote call runs under an explicit [`reconcilers::retry::RetryPolicy`].
//!
//! ## Modules
//!
//! - [`orchestrator`] - Per-event sequencing and the [`orchestrator::EventReport`]
//! - [`reconcilers`] - Tagging, provisioning wait, DNS zone group steps and retry
//! - [`client`] - Remote resource client trait, ARM and in-memory implementations
//! - [`event`] - Inbound event decoding and group ID extraction
//! - [`resource_id`] - Positional resource identifier parsing
//! - [`zone_mapping`] - Static group ID to DNS zone table
//! - [`settings`] - YAML runtime settings
//!
//! ## Example
//!
//! ```rust,no_run
//! use pe_dns_manager::client::memory::InMemoryResourceClient;
//! use pe_dns_manager::orchestrator::EventProcessor;
//! use pe_dns_manager::reconcilers::retry::RetryPolicy;
//! use pe_dns_manager::zone_mapping::DnsZoneMapping;
//!
//! # async fn example(payload: serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
//! let mapping = DnsZoneMapping::from_path("zone-mappings.json")?;
//! let processor = EventProcessor::new(InMemoryResourceClient::new(), mapping, RetryPolicy::default());
//!
//! let report = processor.process_payload(payload).await?;
//! assert!(!report.has_failures());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod constants;
pub mod errors;
pub mod event;
pub mod orchestrator;
pub mod reconcilers;
pub mod resource_id;
pub mod settings;
pub mod zone_mapping;
