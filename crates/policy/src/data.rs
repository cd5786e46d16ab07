// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiled-in defaults for the exclusion and cleanup layer tables.
//! Deliberately small: this is reference data a real deployment would tune
//! via the override directory, not an attempt at an exhaustive catalog.

use crate::source::StaticTable;

pub const EXCLUSIONS: StaticTable = StaticTable(&[
    ("unix", "/proc/*\n/sys/*\n/dev/*\n/tmp/*\n/run/*\n"),
    ("unix/centos", "/etc/yum.repos.d/*.rpmnew\n"),
    ("unix/centos/centos6", "/etc/udev/rules.d/70-persistent-net.rules\n"),
    ("unix/debian", "/var/cache/apt/archives/*.deb\n"),
    ("unix/ubuntu", "/var/cache/apt/archives/*.deb\n/var/lib/cloud/*\n"),
]);

pub const CLEANUP_PRE: StaticTable = StaticTable(&[("unix", "sync\n")]);

pub const CLEANUP_CHROOT: StaticTable = StaticTable(&[
    ("unix", "rm -f /etc/udev/rules.d/70-persistent-net.rules\n"),
    ("unix/centos", "yum clean all\n"),
    ("unix/debian", "apt-get clean\n"),
    ("unix/ubuntu", "apt-get clean\ncloud-init clean\n"),
]);

pub const CLEANUP_POST: StaticTable = StaticTable(&[("unix", "sync\n")]);
