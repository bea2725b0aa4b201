// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the private endpoint DNS pipeline.
//!
//! This module provides specialized error types for:
//! - Remote resource API failures (not found, transient, conflict, bad input)
//! - Event-level processing failures that abort a single event
//! - Settings and zone mapping file loading
//!
//! Retry classification is done on the rendered message of an [`ApiError`]
//! against the configured retryable pattern, so every variant renders the
//! remote error code as part of its message.

use thiserror::Error;

/// Errors returned by a [`crate::client::ResourceClient`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Resource does not exist (HTTP 404)
    #[error("ResourceNotFound: resource '{name}' not found in resource group '{resource_group}'")]
    NotFound {
        /// Resource group that was searched
        resource_group: String,
        /// Resource name that was not found
        name: String,
    },

    /// Transient remote condition (throttling, server error, resource still provisioning)
    #[error("{code}: {message}")]
    Transient {
        /// Remote error code (e.g. `RetryableError`)
        code: String,
        /// Remote error message
        message: String,
    },

    /// Concurrent modification rejected by the remote API (HTTP 409)
    #[error("Conflict ({code}): {message}")]
    Conflict {
        /// Remote error code
        code: String,
        /// Remote error message
        message: String,
    },

    /// Request rejected as malformed (HTTP 400)
    #[error("InvalidArgument ({code}): {message}")]
    InvalidArgument {
        /// Remote error code
        code: String,
        /// Remote error message
        message: String,
    },

    /// The request never produced an API answer (connection refused, timeout)
    #[error("Transport error calling {url}: {reason}")]
    Transport {
        /// URL being called
        url: String,
        /// Underlying client error
        reason: String,
    },

    /// The remote answer could not be decoded
    #[error("Failed to decode response from {url}: {reason}")]
    Decode {
        /// URL being called
        url: String,
        /// Decoder error
        reason: String,
    },
}

/// Errors that abort processing of a single event.
///
/// These are returned to the caller (the transport layer) so it can apply its
/// own redelivery policy.
#[derive(Error, Debug, Clone)]
pub enum ProcessingError {
    /// The resource identifier does not have the positional shape this pipeline reads
    #[error("Unparsable resource identifier '{id}': {reason}")]
    UnparsableResourceId {
        /// The raw identifier
        id: String,
        /// What was missing
        reason: String,
    },

    /// The inbound payload could not be decoded into an event
    #[error("Invalid private endpoint event: {reason}")]
    InvalidEvent {
        /// Decoder error
        reason: String,
    },

    /// The resource reached a terminal failure provisioning state
    #[error("Resource '{resource}' provisioning ended in state {state}")]
    ProvisioningFailed {
        /// Resource name
        resource: String,
        /// Terminal state reported by the remote API
        state: String,
    },

    /// A non-retryable remote API failure
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A retryable error persisted past the retry budget
    #[error("Operation '{operation}' exhausted {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Human-readable operation name
        operation: String,
        /// Number of attempts made
        attempts: u32,
        /// Last retryable error observed
        last_error: ApiError,
    },

    /// Retry policy values out of range or pattern not compilable
    #[error("Invalid retry policy: {reason}")]
    InvalidRetryPolicy {
        /// What is invalid
        reason: String,
    },
}

/// Errors loading settings or the zone mapping document.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path being read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// YAML settings document is malformed
    #[error("Invalid settings document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON zone mapping document is malformed
    #[error("Invalid zone mapping document: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings parsed but describe an invalid retry policy
    #[error(transparent)]
    Policy(#[from] ProcessingError),
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
