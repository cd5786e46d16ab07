// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The external cloud-compute provisioner collaborator (C11): the
//! Orchestrator's only dependency outside C1..C9.

use async_trait::async_trait;
use cloudflock_core::{HostEndpoint, ProvisionRequest};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("provisioning is disabled for this run (resume mode)")]
    Disabled,
    #[error("instance {0} never reached ready state")]
    NeverReady(String),
    #[error("unknown instance id: {0}")]
    UnknownInstance(String),
    #[error("provisioner backend error: {0}")]
    Backend(String),
}

/// An instance identifier assigned by the provisioner backend.
pub type InstanceId = String;

#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Create a new instance from `request`, returning its login endpoint.
    async fn create_instance(&self, request: &ProvisionRequest) -> Result<(InstanceId, HostEndpoint), ProvisionError>;

    /// Block until the instance is reachable over SSH.
    async fn wait_until_ready(&self, id: &InstanceId) -> Result<(), ProvisionError>;

    /// Block until any backend-side managed automation (initial
    /// configuration management, etc.) has finished. Optional: backends
    /// with no such concept return immediately.
    async fn wait_until_managed_automation_done(&self, id: &InstanceId) -> Result<(), ProvisionError> {
        let _ = id;
        Ok(())
    }

    /// Boot the instance into rescue mode, returning the one-time rescue
    /// password.
    async fn rescue_mode(&self, id: &InstanceId) -> Result<String, ProvisionError>;

    /// Tear down the instance.
    async fn destroy(&self, id: &InstanceId) -> Result<(), ProvisionError>;
}

#[cfg(test)]
#[path = "provisioner_tests.rs"]
mod tests;
