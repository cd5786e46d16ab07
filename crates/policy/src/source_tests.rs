// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{LayerSource, LayeredSource, OverrideDir, StaticTable};
use std::fs;

const TABLE: StaticTable = StaticTable(&[("unix", "*.log\n"), ("unix/centos", "/etc/yum.repos.d/*\n")]);

#[test]
fn static_table_returns_the_registered_payload() {
    assert_eq!(TABLE.load("unix"), Some("*.log\n".to_string()));
    assert_eq!(TABLE.load("unix/debian"), None);
}

#[test]
fn override_dir_reads_a_file_named_after_the_key_with_slashes_replaced() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("unix_centos"), "/var/log/extra\n").unwrap();
    let overrides = OverrideDir::new(dir.path());

    assert_eq!(overrides.load("unix/centos"), Some("/var/log/extra\n".to_string()));
    assert_eq!(overrides.load("unix/debian"), None);
}

#[test]
fn layered_source_prefers_the_override_over_the_compiled_table() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("unix"), "operator override\n").unwrap();
    let overrides = OverrideDir::new(dir.path());
    let layered = LayeredSource { overrides: Some(&overrides), table: &TABLE };

    assert_eq!(layered.load("unix"), Some("operator override\n".to_string()));
    // Falls back to the table for a key the override directory doesn't have.
    assert_eq!(layered.load("unix/centos"), Some("/etc/yum.repos.d/*\n".to_string()));
}

#[test]
fn layered_source_without_an_override_dir_just_uses_the_table() {
    let layered = LayeredSource { overrides: None, table: &TABLE };
    assert_eq!(layered.load("unix"), Some("*.log\n".to_string()));
}
