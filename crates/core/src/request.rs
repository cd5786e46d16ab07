// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed configuration carriers handed to the engine by an external CLI.
//! The engine never talks to an operator directly; these structs are the
//! boundary (§6, §9).

use crate::endpoint::HostEndpoint;
use serde::{Deserialize, Serialize};

/// Everything the Orchestrator (C10) needs to run one migration, already
/// reconciled by the CLI from operator input and/or prior catalog lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationRequest {
    pub source: HostEndpoint,
    /// `None` when `provision` is set: the destination is created by C11
    /// instead of being supplied up front.
    pub destination: Option<HostEndpoint>,
    pub provision: Option<ProvisionRequest>,
    /// Skip provisioning and resume against an already-provisioned
    /// destination (§4, "resume" mode). Requires `destination` to be set.
    pub resume: bool,
    /// Overrides for the IP remediation target list (C9); empty means
    /// "derive from the profiled source addresses".
    pub remediation_targets: Vec<String>,
}

impl MigrationRequest {
    pub fn new(source: HostEndpoint) -> Self {
        Self {
            source,
            destination: None,
            provision: None,
            resume: false,
            remediation_targets: Vec::new(),
        }
    }

    pub fn with_destination(mut self, destination: HostEndpoint) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_provision(mut self, provision: ProvisionRequest) -> Self {
        self.provision = Some(provision);
        self
    }

    pub fn resuming(mut self) -> Self {
        self.resume = true;
        self
    }
}

/// Image/flavor hints the CLI has already resolved via the platform
/// catalog (C2), handed to the provisioner (C11) to create a destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionRequest {
    pub image_id: String,
    pub flavor_id: String,
    pub display_name: String,
    pub region: String,
}

impl ProvisionRequest {
    pub fn new(
        image_id: impl Into<String>,
        flavor_id: impl Into<String>,
        display_name: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            image_id: image_id.into(),
            flavor_id: flavor_id.into(),
            display_name: display_name.into(),
            region: region.into(),
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
