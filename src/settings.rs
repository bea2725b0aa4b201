// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Runtime settings loaded from an optional YAML file.
//!
//! ```yaml
//! retry:
//!   maxRetries: 10
//!   initialWaitSeconds: 2
//!   maxWaitSeconds: 15
//!   retryableErrorPattern: "RetryableError|ReferencedResourceNotProvisioned"
//! zoneGroupName: private-endpoint-manager
//! armEndpoint: https://management.azure.com
//! ```
//!
//! Every key is optional; missing keys fall back to the values in
//! [`crate::constants`].

use crate::constants::{
    DEFAULT_ARM_ENDPOINT, DEFAULT_INITIAL_WAIT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_MAX_WAIT_SECS,
    DEFAULT_RETRYABLE_ERROR_PATTERN, DEFAULT_ZONE_GROUP_NAME,
};
use crate::errors::SettingsError;
use crate::reconcilers::retry::RetryPolicy;
use serde::Deserialize;
use std::path::Path;

/// Retry block of the settings document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub initial_wait_seconds: u64,
    pub max_wait_seconds: u64,
    pub retryable_error_pattern: String,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_wait_seconds: DEFAULT_INITIAL_WAIT_SECS,
            max_wait_seconds: DEFAULT_MAX_WAIT_SECS,
            retryable_error_pattern: DEFAULT_RETRYABLE_ERROR_PATTERN.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Settings {
    pub retry: RetrySettings,
    pub zone_group_name: String,
    pub arm_endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            retry: RetrySettings::default(),
            zone_group_name: DEFAULT_ZONE_GROUP_NAME.to_string(),
            arm_endpoint: DEFAULT_ARM_ENDPOINT.to_string(),
        }
    }
}

impl Settings {
    /// # Errors
    ///
    /// Returns [`SettingsError::Yaml`] if the document is malformed or has
    /// unknown keys.
    pub fn from_yaml_str(text: &str) -> Result<Self, SettingsError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file cannot be read, or
    /// [`SettingsError::Yaml`] if it is malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Compile and validate the retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Policy`] if the values are out of range or the
    /// pattern does not compile.
    pub fn retry_policy(&self) -> Result<RetryPolicy, SettingsError> {
        Ok(RetryPolicy::new(
            self.retry.max_retries,
            self.retry.initial_wait_seconds,
            self.retry.max_wait_seconds,
            &self.retry.retryable_error_pattern,
        )?)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod settings_tests;
