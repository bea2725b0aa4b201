// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory [`ResourceClient`] for tests and local dry runs.
//!
//! Resources live in a shared map, so clones of the client (and every client
//! handed out through [`ClientFactory`]) observe the same state. Provisioning
//! states can be scripted as a sequence consumed one per `get_resource` call;
//! the last scripted state sticks. Failures can be queued per operation or
//! made permanent.

use super::{ClientFactory, ProvisioningState, RemoteResource, ResourceClient, ZoneGroupConfig};
use crate::errors::ApiError;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Remote operation selector for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetResource,
    SetResourceTags,
    CreateOrReplaceDnsZoneGroup,
}

#[derive(Debug, Default)]
struct StoredResource {
    current_state: Option<ProvisioningState>,
    scripted_states: VecDeque<ProvisioningState>,
    tags: BTreeMap<String, String>,
    zone_groups: BTreeMap<String, Vec<ZoneGroupConfig>>,
}

#[derive(Debug, Default)]
struct State {
    resources: HashMap<(String, String), StoredResource>,
    queued_failures: HashMap<Operation, VecDeque<ApiError>>,
    permanent_failures: HashMap<Operation, ApiError>,
    calls: HashMap<Operation, u32>,
    subscriptions: Vec<String>,
}

impl State {
    fn record_call(&mut self, operation: Operation) -> Result<(), ApiError> {
        *self.calls.entry(operation).or_default() += 1;

        if let Some(err) = self
            .queued_failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            return Err(err);
        }
        if let Some(err) = self.permanent_failures.get(&operation) {
            return Err(err.clone());
        }
        Ok(())
    }

    fn resource_mut(
        &mut self,
        resource_group: &str,
        name: &str,
    ) -> Result<&mut StoredResource, ApiError> {
        self.resources
            .get_mut(&(resource_group.to_string(), name.to_string()))
            .ok_or_else(|| ApiError::NotFound {
                resource_group: resource_group.to_string(),
                name: name.to_string(),
            })
    }
}

/// Shared in-memory resource store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceClient {
    state: Arc<Mutex<State>>,
}

impl InMemoryResourceClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a resource with a fixed provisioning state and initial tags.
    pub fn insert_resource(
        &self,
        resource_group: &str,
        name: &str,
        state: ProvisioningState,
        tags: BTreeMap<String, String>,
    ) {
        self.lock().resources.insert(
            (resource_group.to_string(), name.to_string()),
            StoredResource {
                current_state: Some(state),
                tags,
                ..StoredResource::default()
            },
        );
    }

    /// Queue provisioning states returned by successive `get_resource` calls.
    ///
    /// Registers the resource if it does not exist yet.
    pub fn script_provisioning_states(
        &self,
        resource_group: &str,
        name: &str,
        states: impl IntoIterator<Item = ProvisioningState>,
    ) {
        let mut state = self.lock();
        let resource = state
            .resources
            .entry((resource_group.to_string(), name.to_string()))
            .or_default();
        resource.scripted_states.extend(states);
    }

    /// Fail the next call of `operation` with `err`. Queued failures are
    /// consumed in order before permanent ones apply.
    pub fn fail_next(&self, operation: Operation, err: ApiError) {
        self.lock()
            .queued_failures
            .entry(operation)
            .or_default()
            .push_back(err);
    }

    /// Fail every call of `operation` with `err`.
    pub fn fail_always(&self, operation: Operation, err: ApiError) {
        self.lock().permanent_failures.insert(operation, err);
    }

    /// Number of calls made to `operation`, failed ones included.
    #[must_use]
    pub fn calls(&self, operation: Operation) -> u32 {
        self.lock().calls.get(&operation).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn tags(&self, resource_group: &str, name: &str) -> Option<BTreeMap<String, String>> {
        self.lock()
            .resources
            .get(&(resource_group.to_string(), name.to_string()))
            .map(|r| r.tags.clone())
    }

    #[must_use]
    pub fn zone_groups(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Option<BTreeMap<String, Vec<ZoneGroupConfig>>> {
        self.lock()
            .resources
            .get(&(resource_group.to_string(), name.to_string()))
            .map(|r| r.zone_groups.clone())
    }

    /// Subscriptions clients were requested for, in order.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        self.lock().subscriptions.clone()
    }
}

impl ClientFactory for InMemoryResourceClient {
    type Client = Self;

    fn client_for(&self, subscription_id: &str) -> Self {
        self.lock().subscriptions.push(subscription_id.to_string());
        self.clone()
    }
}

#[async_trait::async_trait]
impl ResourceClient for InMemoryResourceClient {
    async fn get_resource(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<RemoteResource, ApiError> {
        let mut state = self.lock();
        state.record_call(Operation::GetResource)?;
        let resource = state.resource_mut(resource_group, name)?;

        if let Some(next) = resource.scripted_states.pop_front() {
            resource.current_state = Some(next);
        }

        Ok(RemoteResource {
            provisioning_state: resource
                .current_state
                .unwrap_or(ProvisioningState::Pending),
            tags: resource.tags.clone(),
        })
    }

    async fn set_resource_tags(
        &self,
        resource_group: &str,
        name: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), ApiError> {
        let mut state = self.lock();
        state.record_call(Operation::SetResourceTags)?;
        state.resource_mut(resource_group, name)?.tags = tags.clone();
        Ok(())
    }

    async fn create_or_replace_dns_zone_group(
        &self,
        resource_group: &str,
        resource_name: &str,
        zone_group_name: &str,
        configs: &[ZoneGroupConfig],
    ) -> Result<(), ApiError> {
        let mut state = self.lock();
        state.record_call(Operation::CreateOrReplaceDnsZoneGroup)?;
        state
            .resource_mut(resource_group, resource_name)?
            .zone_groups
            .insert(zone_group_name.to_string(), configs.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod memory_tests;
