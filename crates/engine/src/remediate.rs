// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The IP Remediator (C9): rewrites references to source IPs in
//! destination config files, pairing each source address with an
//! RFC1918-compatible destination address.

use crate::paths::MOUNT_POINT;
use cloudflock_core::Profile;
use cloudflock_shell::{Session, Transport};
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_TARGET_DIRS: &[&str] = &["/etc"];

fn is_rfc1918(ip: &str) -> bool {
    let octets: Vec<u8> = ip.split('.').filter_map(|o| o.parse().ok()).collect();
    match octets[..] {
        [10, ..] => true,
        [172, second, ..] => (16..=31).contains(&second),
        [192, 168, ..] => true,
        _ => false,
    }
}

fn addresses(profile: &Profile, entry_name: &str) -> Vec<String> {
    profile
        .get_section("Network")
        .map(|section| section.entries.iter().filter(|e| e.name == entry_name).map(|e| e.value.clone()).collect())
        .unwrap_or_default()
}

/// Pair each source address (public addresses first, then private, per
/// §4.8) with a destination address of matching RFC1918-ness, falling
/// back to the destination's first address. Pairs are deduplicated on
/// the source address.
pub fn build_replacement_pairs(source: &Profile, destination: &Profile) -> Vec<(String, String)> {
    let mut source_addrs = addresses(source, "public_ip");
    source_addrs.extend(addresses(source, "private_ip"));

    let dest_addrs: Vec<String> = {
        let mut v = addresses(destination, "public_ip");
        v.extend(addresses(destination, "private_ip"));
        v
    };

    let mut pairs = Vec::new();
    for src in source_addrs {
        let replacement = dest_addrs
            .iter()
            .find(|d| is_rfc1918(d) == is_rfc1918(&src))
            .or_else(|| dest_addrs.first())
            .cloned();
        if let Some(dst) = replacement {
            pairs.push((src, dst));
        }
    }
    pairs
}

/// Rewrite every file under `target_dirs` (relative to
/// `${MOUNT_POINT}`) replacing each source address with its paired
/// destination address. Best-effort: a `sed` failure for one directory
/// doesn't stop remediation of the others (§4.9, "Remediate is
/// best-effort").
pub async fn run<T: Transport>(destination: &Session<T>, pairs: &[(String, String)], target_dirs: &[String]) {
    let target_dirs: Vec<String> = if target_dirs.is_empty() {
        DEFAULT_TARGET_DIRS.iter().map(|s| s.to_string()).collect()
    } else {
        target_dirs.to_vec()
    };

    for dir in &target_dirs {
        for (src, dst) in pairs {
            let cmd = format!("find {MOUNT_POINT}{dir} -type f -exec sed -i 's/{src}/{dst}/g' {{}} \\;");
            if let Err(err) = destination.as_root(&cmd, PROBE_TIMEOUT, true).await {
                tracing::warn!(dir, src, dst, error = %err, "ip remediation step failed, continuing");
            }
        }
    }
}

#[cfg(test)]
#[path = "remediate_tests.rs"]
mod tests;
