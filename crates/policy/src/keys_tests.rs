// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::layer_keys;
use cloudflock_core::Cpe;

#[test]
fn full_cpe_yields_all_three_layers() {
    let cpe = Cpe::new("o", "centos", "centos", "7");
    assert_eq!(layer_keys(&cpe), vec!["unix", "unix/centos", "unix/centos/centos7"]);
}

#[test]
fn unresolved_cpe_yields_only_the_base_layer() {
    let cpe = Cpe::default();
    assert_eq!(layer_keys(&cpe), vec!["unix"]);
}

#[test]
fn vendor_with_no_product_or_version_yields_two_layers() {
    let cpe = Cpe::new("o", "gnu/linux", "", "");
    assert_eq!(layer_keys(&cpe), vec!["unix", "unix/gnu/linux"]);
}
