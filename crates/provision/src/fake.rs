// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory, scriptable [`Provisioner`] for the engine crate's own
//! tests — the same `Arc<Mutex<State>>` + call-recording shape as the job
//! engine's `FakeSessionAdapter`.

use crate::provisioner::{InstanceId, ProvisionError, Provisioner};
use async_trait::async_trait;
use cloudflock_core::{HostEndpoint, ProvisionRequest};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionCall {
    CreateInstance,
    WaitUntilReady(InstanceId),
    WaitUntilManagedAutomationDone(InstanceId),
    RescueMode(InstanceId),
    Destroy(InstanceId),
}

struct FakeState {
    calls: Vec<ProvisionCall>,
    next_id: u64,
    endpoint_for_next: Option<HostEndpoint>,
    known_instances: HashMap<InstanceId, ()>,
    rescue_password: String,
    fail_create: bool,
}

/// Scriptable fake used by the engine's own tests to drive the
/// Orchestrator's provisioning step without a real cloud account.
#[derive(Clone)]
pub struct FakeProvisioner {
    state: Arc<Mutex<FakeState>>,
}

impl Default for FakeProvisioner {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                calls: Vec::new(),
                next_id: 1,
                endpoint_for_next: None,
                known_instances: HashMap::new(),
                rescue_password: "rescue-secret".to_string(),
                fail_create: false,
            })),
        }
    }
}

impl FakeProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ProvisionCall> {
        self.state.lock().calls.clone()
    }

    /// Override the endpoint returned by the next `create_instance` call.
    pub fn set_next_endpoint(&self, endpoint: HostEndpoint) {
        self.state.lock().endpoint_for_next = Some(endpoint);
    }

    pub fn set_rescue_password(&self, password: impl Into<String>) {
        self.state.lock().rescue_password = password.into();
    }

    pub fn fail_next_create(&self) {
        self.state.lock().fail_create = true;
    }
}

#[async_trait]
impl Provisioner for FakeProvisioner {
    async fn create_instance(&self, request: &ProvisionRequest) -> Result<(InstanceId, HostEndpoint), ProvisionError> {
        let mut state = self.state.lock();
        state.calls.push(ProvisionCall::CreateInstance);
        if state.fail_create {
            state.fail_create = false;
            return Err(ProvisionError::Backend("fake backend rejected create_instance".into()));
        }

        let id = format!("fake-{}", state.next_id);
        state.next_id += 1;
        state.known_instances.insert(id.clone(), ());

        let endpoint = state.endpoint_for_next.take().unwrap_or_else(|| {
            cloudflock_core::HostEndpoint::new(
                format!("{}.invalid", request.display_name),
                "root",
                cloudflock_core::LoginSecret::Password("fake".into()),
            )
        });
        Ok((id, endpoint))
    }

    async fn wait_until_ready(&self, id: &InstanceId) -> Result<(), ProvisionError> {
        let mut state = self.state.lock();
        state.calls.push(ProvisionCall::WaitUntilReady(id.clone()));
        if !state.known_instances.contains_key(id) {
            return Err(ProvisionError::UnknownInstance(id.clone()));
        }
        Ok(())
    }

    async fn wait_until_managed_automation_done(&self, id: &InstanceId) -> Result<(), ProvisionError> {
        self.state.lock().calls.push(ProvisionCall::WaitUntilManagedAutomationDone(id.clone()));
        Ok(())
    }

    async fn rescue_mode(&self, id: &InstanceId) -> Result<String, ProvisionError> {
        let mut state = self.state.lock();
        state.calls.push(ProvisionCall::RescueMode(id.clone()));
        if !state.known_instances.contains_key(id) {
            return Err(ProvisionError::UnknownInstance(id.clone()));
        }
        Ok(state.rescue_password.clone())
    }

    async fn destroy(&self, id: &InstanceId) -> Result<(), ProvisionError> {
        let mut state = self.state.lock();
        state.calls.push(ProvisionCall::Destroy(id.clone()));
        if state.known_instances.remove(id).is_none() {
            return Err(ProvisionError::UnknownInstance(id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
