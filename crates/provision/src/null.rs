// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The provisioner used when `resume` mode skips provisioning entirely:
//! every call fails with [`ProvisionError::Disabled`].

use crate::provisioner::{InstanceId, ProvisionError, Provisioner};
use async_trait::async_trait;
use cloudflock_core::{HostEndpoint, ProvisionRequest};

#[derive(Debug, Clone, Copy, Default)]
pub struct NullProvisioner;

#[async_trait]
impl Provisioner for NullProvisioner {
    async fn create_instance(&self, _request: &ProvisionRequest) -> Result<(InstanceId, HostEndpoint), ProvisionError> {
        Err(ProvisionError::Disabled)
    }

    async fn wait_until_ready(&self, _id: &InstanceId) -> Result<(), ProvisionError> {
        Err(ProvisionError::Disabled)
    }

    async fn rescue_mode(&self, _id: &InstanceId) -> Result<String, ProvisionError> {
        Err(ProvisionError::Disabled)
    }

    async fn destroy(&self, _id: &InstanceId) -> Result<(), ProvisionError> {
        Err(ProvisionError::Disabled)
    }
}

#[cfg(test)]
#[path = "null_tests.rs"]
mod tests;
