// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::ImageMap;
use crate::cpe::PlatformKey;

#[test]
fn exact_version_wins_over_wildcard() {
    let mut map = ImageMap::new();
    map.insert("centos", "*", "generic-centos")
        .insert("centos", "7", "centos-7-exact");

    let id = map.lookup(&PlatformKey::new("centos", "7"));
    assert_eq!(id, Some("centos-7-exact"));
}

#[test]
fn falls_back_to_wildcard_when_no_exact_match() {
    let mut map = ImageMap::new();
    map.insert("debian", "*", "generic-debian");

    let id = map.lookup(&PlatformKey::new("debian", "11"));
    assert_eq!(id, Some("generic-debian"));
}

#[test]
fn unknown_vendor_yields_none() {
    let map = ImageMap::new();
    assert_eq!(map.lookup(&PlatformKey::new("gentoo", "2")), None);
}
