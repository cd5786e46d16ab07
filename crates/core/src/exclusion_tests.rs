// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::ExclusionList;

#[test]
fn layers_append_in_order() {
    let mut list = ExclusionList::new();
    list.extend_layer(["/proc", "/sys"])
        .extend_layer(["/var/lib/plesk"])
        .extend_layer(Vec::<String>::new());

    assert_eq!(
        list.patterns(),
        &["/proc".to_string(), "/sys".to_string(), "/var/lib/plesk".to_string()]
    );
}

#[test]
fn empty_layer_is_a_no_op() {
    let mut list = ExclusionList::new();
    list.extend_layer(Vec::<String>::new());
    assert!(list.is_empty());
}

#[test]
fn as_rsync_args_formats_each_pattern() {
    let mut list = ExclusionList::new();
    list.extend_layer(["/proc", "/sys"]);
    assert_eq!(
        list.as_rsync_args(),
        vec!["--exclude=/proc".to_string(), "--exclude=/sys".to_string()]
    );
}
