// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The current (V2) platform catalog.

use crate::flavor::FlavorCatalog;
use crate::image::ImageCatalog;
use cloudflock_core::FlavorSpec;

pub fn flavors() -> FlavorCatalog {
    FlavorCatalog::new(vec![
        FlavorSpec::new("1", 256, 10),
        FlavorSpec::new("2", 512, 20),
        FlavorSpec::new("3", 1024, 40),
        FlavorSpec::new("4", 2048, 80),
        FlavorSpec::new("5", 4096, 160),
        FlavorSpec::new("6", 8192, 320),
        FlavorSpec::new("7", 16384, 640),
    ])
}

pub fn images() -> ImageCatalog {
    let mut managed = cloudflock_core::ImageMap::new();
    managed
        .insert("centos", "7", "d8c2e9c1-4b8a-4e4a-9c2b-1f3a7e5d6b90")
        .insert("centos", "*", "5a6b7c8d-9e0f-4a1b-8c2d-3e4f5a6b7c8d")
        .insert("debian", "10", "f1e2d3c4-b5a6-4978-8c9d-0e1f2a3b4c5d")
        .insert("debian", "*", "1a2b3c4d-5e6f-4708-9a0b-1c2d3e4f5a6b")
        .insert("ubuntu", "20.04", "9c8b7a6f-5e4d-4c3b-a2b1-0c9d8e7f6a5b")
        .insert("ubuntu", "*", "2b3c4d5e-6f70-4819-a2b3-4c5d6e7f8a9b")
        .insert("amazon", "*", "c4a2f9e1-6d3b-4a7c-9e2f-8b1d5c3a7e9f")
        .insert("redhat", "*", "7e8f9a0b-1c2d-4e3f-a4b5-6c7d8e9f0a1b");
    let mut unmanaged = cloudflock_core::ImageMap::new();
    unmanaged
        .insert("centos", "7", "b2c3d4e5-f607-4819-a2b3-c4d5e6f708a9")
        .insert("centos", "*", "e5f60718-2930-4a4b-8c5d-6e7f8091a2b3")
        .insert("debian", "10", "a1b2c3d4-e5f6-4708-9a0b-1c2d3e4f5a6b")
        .insert("debian", "*", "3c4d5e6f-7081-49a2-b3c4-d5e6f708192a")
        .insert("ubuntu", "20.04", "4d5e6f70-8192-4a2b-93c4-d5e6f7081920")
        .insert("ubuntu", "*", "5e6f7081-92a3-4b4c-a4d5-e6f708192a3b")
        .insert("amazon", "*", "a3a2c42f-575f-4381-9c6d-fcd3b7d07d17")
        .insert("redhat", "*", "6f708192-a3b4-4c5d-b5e6-f708192a3b4c");

    ImageCatalog { managed, unmanaged }
}
