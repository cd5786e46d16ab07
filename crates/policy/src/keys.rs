// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three-prefix key sequence ("unix", "unix/{vendor}",
//! "unix/{vendor}/{product}{version}") shared by the exclusion and
//! cleanup builders.

use cloudflock_core::Cpe;

/// Build the prefix-ascending key sequence for `cpe`. Unknown/unresolved
/// CPEs still yield the base `"unix"` key — only the later, more specific
/// keys are affected by a missing vendor or product.
pub fn layer_keys(cpe: &Cpe) -> Vec<String> {
    let mut keys = vec!["unix".to_string()];
    if cpe.vendor.is_empty() {
        return keys;
    }
    keys.push(format!("unix/{}", cpe.vendor));
    if !cpe.product.is_empty() || !cpe.version.is_empty() {
        keys.push(format!("unix/{}/{}{}", cpe.vendor, cpe.product, cpe.version));
    }
    keys
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;
