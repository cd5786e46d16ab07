// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layer payload storage: a compiled-in static table, with an optional
//! on-disk override directory scanned at lookup time — the same relationship
//! the job engine's runbook loader has between its built-in libraries and a
//! directory of operator-supplied files.

use std::fs;
use std::path::PathBuf;

/// Something that can answer "what payload, if any, is registered under
/// this key" for a given kind of layer data (exclusions, or one cleanup
/// phase).
pub trait LayerSource {
    fn load(&self, key: &str) -> Option<String>;
}

/// A plain linear-scanned slice of `(key, payload)` pairs, compiled into
/// the binary. Small enough ("the scale of this data") that a `phf` map
/// would be overkill — matches the static-list pattern used elsewhere in
/// this workspace.
pub struct StaticTable(pub &'static [(&'static str, &'static str)]);

impl LayerSource for StaticTable {
    fn load(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, payload)| payload.to_string())
    }
}

/// An on-disk override directory: `root/unix`, `root/unix/centos`,
/// `root/unix/centos/centos7`, one file per key with `/` replaced by `_`.
/// Missing files are not an error — every layer is optional.
pub struct OverrideDir {
    pub root: PathBuf,
}

impl OverrideDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key.replace('/', "_"))
    }
}

impl LayerSource for OverrideDir {
    fn load(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }
}

/// Checks the override directory first, falling back to the compiled
/// table — operator-supplied data always wins over the built-in default
/// for the same key.
pub struct LayeredSource<'a> {
    pub overrides: Option<&'a OverrideDir>,
    pub table: &'a StaticTable,
}

impl LayerSource for LayeredSource<'_> {
    fn load(&self, key: &str) -> Option<String> {
        self.overrides
            .and_then(|dir| dir.load(key))
            .or_else(|| self.table.load(key))
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
