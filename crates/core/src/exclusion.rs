// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The rsync exclusion list built by the policy crate's layered
//! `PlatformAction` strategy (C4).

use serde::{Deserialize, Serialize};

/// An ordered sequence of path patterns fed to rsync's `--exclude`.
///
/// Built by successively extending from a base (platform-agnostic) layer,
/// a vendor layer, and a vendor+version layer, each appended in that
/// order. A layer with nothing to contribute is a no-op, never an error
/// (§3, §8-invariant).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionList {
    patterns: Vec<String>,
}

impl ExclusionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend_layer<I, S>(&mut self, layer: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns.extend(layer.into_iter().map(Into::into));
        self
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Render as a sequence of `--exclude=PATTERN` rsync arguments.
    pub fn as_rsync_args(&self) -> Vec<String> {
        self.patterns
            .iter()
            .map(|p| format!("--exclude={p}"))
            .collect()
    }
}

#[cfg(test)]
#[path = "exclusion_tests.rs"]
mod tests;
