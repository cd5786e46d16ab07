// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem layout the engine owns exclusively on both hosts during a
//! run (§6).

pub const DATA_DIR: &str = "/root/.cloudflock";
pub const EXCLUSIONS: &str = "/root/.cloudflock/migration_exclusions";
pub const PRIVATE_KEY: &str = "/root/.cloudflock/migration_id_rsa";
pub const PUBLIC_KEY: &str = "/root/.cloudflock/migration_id_rsa.pub";
pub const MOUNT_POINT: &str = "/mnt/migration_target";
pub const DEFAULT_BLOCK_DEVICE: &str = "/dev/xvdb1";

pub fn pre_script() -> String {
    format!("{DATA_DIR}/pre.sh")
}

/// Path to the chroot script as seen from the host (for writing it).
pub fn chroot_script() -> String {
    format!("{MOUNT_POINT}{DATA_DIR}/chroot.sh")
}

/// Path to the chroot script as seen from *inside* the chroot (for
/// executing it with `chroot ${MOUNT_POINT} /bin/sh -C ...`).
pub fn chroot_script_relative() -> String {
    format!("{DATA_DIR}/chroot.sh")
}

pub fn post_script() -> String {
    format!("{DATA_DIR}/post.sh")
}
