// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::NullProvisioner;
use crate::provisioner::{ProvisionError, Provisioner};
use cloudflock_core::ProvisionRequest;

#[tokio::test]
async fn create_instance_always_fails_with_disabled() {
    let provisioner = NullProvisioner;
    let request = ProvisionRequest::new("img-1", "flavor-1", "host-1", "us-east");
    let err = provisioner.create_instance(&request).await.unwrap_err();
    assert!(matches!(err, ProvisionError::Disabled));
}

#[tokio::test]
async fn every_other_call_also_fails_with_disabled() {
    let provisioner = NullProvisioner;
    let id = "i-1".to_string();
    assert!(matches!(provisioner.wait_until_ready(&id).await, Err(ProvisionError::Disabled)));
    assert!(matches!(provisioner.rescue_mode(&id).await, Err(ProvisionError::Disabled)));
    assert!(matches!(provisioner.destroy(&id).await, Err(ProvisionError::Disabled)));
}
