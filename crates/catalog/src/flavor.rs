// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `flavorFor`: pick the smallest catalog flavor that satisfies a demand.

use cloudflock_core::{FlavorAxis, FlavorRecommendation, FlavorSpec};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no flavor satisfies the requested memory/disk demand")]
pub struct NoFlavor;

/// An ordered (ascending capacity) list of [`FlavorSpec`] values. Both
/// `memory_mib` and `disk_gb` are expected to increase monotonically
/// through the list; `flavorFor` relies on that to guarantee the spec it
/// returns satisfies both axes at once.
#[derive(Debug, Clone)]
pub struct FlavorCatalog {
    flavors: Vec<FlavorSpec>,
}

impl FlavorCatalog {
    pub fn new(flavors: Vec<FlavorSpec>) -> Self {
        Self { flavors }
    }

    pub fn flavors(&self) -> &[FlavorSpec] {
        &self.flavors
    }

    /// Scan the flavor list in ascending capacity; the memory-driven index
    /// is the first spec with `mem > mem_mib`, the disk-driven index is
    /// the first with `disk > disk_gb`. If `swapping` is true, the
    /// memory-driven index is bumped by one (saturating at the last
    /// index) before comparison. The final pick is whichever of the two
    /// candidates is larger-capacity (later in the list); that candidate's
    /// axis is recorded as the one that forced the choice.
    pub fn flavor_for(&self, mem_mib: u64, disk_gb: u64, swapping: bool) -> Result<FlavorRecommendation, NoFlavor> {
        let mem_idx = self.flavors.iter().position(|f| f.memory_mib > mem_mib).ok_or(NoFlavor)?;
        let disk_idx = self.flavors.iter().position(|f| f.disk_gb > disk_gb).ok_or(NoFlavor)?;

        let bumped_mem_idx = if swapping {
            (mem_idx + 1).min(self.flavors.len() - 1)
        } else {
            mem_idx
        };

        let (chosen_idx, forced_by) = if bumped_mem_idx >= disk_idx {
            (bumped_mem_idx, FlavorAxis::Memory)
        } else {
            (disk_idx, FlavorAxis::Disk)
        };

        Ok(FlavorRecommendation {
            flavor: self.flavors[chosen_idx].clone(),
            forced_by,
        })
    }
}

#[cfg(test)]
#[path = "flavor_tests.rs"]
mod tests;
