// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared value types for the platform catalog (C2). Lookup logic lives in
//! `cloudflock-catalog`; this crate only owns the data shapes so other
//! crates (e.g. the engine, when recording a recommendation) don't need to
//! depend on the catalog crate itself.

use crate::cpe::PlatformKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry in a flavor catalog: a named capacity tier.
///
/// The flavor list is kept in ascending capacity order by its owner; this
/// type makes no ordering guarantee of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorSpec {
    pub id: String,
    pub memory_mib: u64,
    pub disk_gb: u64,
}

impl FlavorSpec {
    pub fn new(id: impl Into<String>, memory_mib: u64, disk_gb: u64) -> Self {
        Self {
            id: id.into(),
            memory_mib,
            disk_gb,
        }
    }
}

/// Which axis of a [`FlavorSpec`] recommendation forced the final choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlavorAxis {
    Memory,
    Disk,
}

/// The result of `flavorFor`: the chosen spec plus which axis drove it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorRecommendation {
    pub flavor: FlavorSpec,
    pub forced_by: FlavorAxis,
}

/// `PlatformKey -> image id`, split into managed/unmanaged maps by the
/// catalog crate. Exact version match wins over the `"*"` wildcard within
/// the same vendor; an unknown vendor yields `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageMap {
    entries: HashMap<String, HashMap<String, String>>,
}

impl ImageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, vendor: impl Into<String>, version: impl Into<String>, image_id: impl Into<String>) -> &mut Self {
        self.entries
            .entry(vendor.into().to_lowercase())
            .or_default()
            .insert(version.into(), image_id.into());
        self
    }

    pub fn lookup(&self, key: &PlatformKey) -> Option<&str> {
        let versions = self.entries.get(&key.vendor)?;
        versions
            .get(&key.version)
            .or_else(|| versions.get(PlatformKey::WILDCARD))
            .map(|s| s.as_str())
    }
}

#[cfg(test)]
#[path = "catalog_types_tests.rs"]
mod tests;
