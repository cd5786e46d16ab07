// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The legacy (V1) platform catalog, kept for hosts provisioned before the
//! V2 flavor/image split.

use crate::flavor::FlavorCatalog;
use crate::image::ImageCatalog;
use cloudflock_core::FlavorSpec;

pub fn flavors() -> FlavorCatalog {
    FlavorCatalog::new(vec![
        FlavorSpec::new("1", 512, 20),
        FlavorSpec::new("2", 1024, 40),
        FlavorSpec::new("3", 2048, 80),
        FlavorSpec::new("4", 4096, 160),
    ])
}

pub fn images() -> ImageCatalog {
    let mut managed = cloudflock_core::ImageMap::new();
    managed
        .insert("centos", "6", "11111111-2222-4333-8444-555555555555")
        .insert("centos", "*", "22222222-3333-4444-8555-666666666666")
        .insert("ubuntu", "*", "33333333-4444-4555-8666-777777777777");
    let mut unmanaged = cloudflock_core::ImageMap::new();
    unmanaged
        .insert("centos", "6", "44444444-5555-4666-8777-888888888888")
        .insert("centos", "*", "55555555-6666-4777-8888-999999999999")
        .insert("ubuntu", "*", "66666666-7777-4888-8999-aaaaaaaaaaaa");

    ImageCatalog { managed, unmanaged }
}

#[cfg(test)]
#[path = "v1_tests.rs"]
mod tests;
