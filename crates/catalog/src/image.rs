// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `imageFor`: resolve a platform to a provisionable image id.

use cloudflock_core::{Cpe, ImageMap};

/// Managed/unmanaged image maps for one catalog version.
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    pub managed: ImageMap,
    pub unmanaged: ImageMap,
}

impl ImageCatalog {
    /// Exact version match first, then the `"*"` fallback within the
    /// vendor; `None` if the vendor is unknown to the selected map.
    pub fn image_for(&self, cpe: &Cpe, managed: bool) -> Option<&str> {
        let map = if managed { &self.managed } else { &self.unmanaged };
        map.lookup(&cpe.platform_key())
    }
}

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
