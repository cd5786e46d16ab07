// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The exclusion builder (C4) and cleanup builder (C5): both walk the same
//! prefix-ascending key sequence over a [`LayerSource`], concatenating
//! whatever payloads they find.

use crate::data;
use crate::keys::layer_keys;
use crate::source::{LayerSource, LayeredSource, OverrideDir, StaticTable};
use cloudflock_core::{Cpe, CleanupPhase, CleanupPlan, ExclusionList};

fn lines_of(payload: &str) -> impl Iterator<Item = &str> {
    payload.lines().filter(|l| !l.is_empty())
}

/// Build the rsync exclusion list for `cpe` against `source`, one layer
/// per prefix in `["unix", "unix/vendor", "unix/vendor/product+version"]`,
/// skipping any prefix with no registered payload.
pub fn build_exclusions(cpe: &Cpe, source: &dyn LayerSource) -> ExclusionList {
    let mut list = ExclusionList::new();
    for key in layer_keys(cpe) {
        if let Some(payload) = source.load(&key) {
            list.extend_layer(lines_of(&payload));
        }
    }
    list
}

/// Build the three-phase cleanup plan for `cpe`, pulling each phase from
/// its own [`LayerSource`] (pre/chroot/post each have an independent
/// layer table).
pub fn build_cleanup_plan(
    cpe: &Cpe,
    pre: &dyn LayerSource,
    chroot: &dyn LayerSource,
    post: &dyn LayerSource,
) -> CleanupPlan {
    let mut plan = CleanupPlan::new();
    let keys = layer_keys(cpe);
    for (phase, source) in [
        (CleanupPhase::Pre, pre),
        (CleanupPhase::Chroot, chroot),
        (CleanupPhase::Post, post),
    ] {
        for key in &keys {
            if let Some(payload) = source.load(key) {
                plan.extend_layer(phase, lines_of(&payload));
            }
        }
    }
    plan
}

/// The compiled-in default exclusion and cleanup tables, optionally
/// overridden by files under `override_root`.
pub struct Policy {
    override_root: Option<OverrideDir>,
}

impl Policy {
    pub fn new() -> Self {
        Self { override_root: None }
    }

    pub fn with_override_dir(override_root: impl Into<std::path::PathBuf>) -> Self {
        Self { override_root: Some(OverrideDir::new(override_root.into())) }
    }

    fn layered<'a>(&'a self, table: &'a StaticTable) -> LayeredSource<'a> {
        LayeredSource { overrides: self.override_root.as_ref(), table }
    }

    pub fn exclusions_for(&self, cpe: &Cpe) -> ExclusionList {
        build_exclusions(cpe, &self.layered(&data::EXCLUSIONS))
    }

    pub fn cleanup_plan_for(&self, cpe: &Cpe) -> CleanupPlan {
        build_cleanup_plan(
            cpe,
            &self.layered(&data::CLEANUP_PRE),
            &self.layered(&data::CLEANUP_CHROOT),
            &self.layered(&data::CLEANUP_POST),
        )
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
