// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The probe table: an explicit, ordered, compile-time sequence of probe
//! functions, one per profile section. Not discovered by naming
//! convention or reflection — each probe is called by name, in the fixed
//! order below, the same way the effect executor this was grounded on
//! dispatches over a closed set of cases instead of by method name.

use cloudflock_core::Profile;
use cloudflock_shell::{Session, Transport};
use regex::Regex;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Run every probe, in fixed order, against `profile`. Two runs over the
/// same recorded command outputs produce byte-identical profiles modulo
/// transient values (load, uptime) — callers relying on that determinism
/// must not reorder these calls.
pub async fn run_all<T: Transport>(session: &Session<T>, profile: &mut Profile) {
    system(session, profile).await;
    cpu(session, profile).await;
    memory(session, profile).await;
    load(session, profile).await;
    storage(session, profile).await;
    network(session, profile).await;
    libraries(session, profile).await;
    services(session, profile).await;
}

async fn system<T: Transport>(session: &Session<T>, profile: &mut Profile) {
    let hostname = session.query("hostname", PROBE_TIMEOUT, true).await.unwrap_or_default();
    let uptime = session.query("uptime", PROBE_TIMEOUT, true).await.unwrap_or_default();

    profile
        .section("System")
        .push("hostname", hostname.trim())
        .push("uptime", uptime.trim());
}

async fn cpu<T: Transport>(session: &Session<T>, profile: &mut Profile) {
    let count = session
        .query("grep -c ^processor /proc/cpuinfo", PROBE_TIMEOUT, true)
        .await
        .unwrap_or_default();
    let model = session
        .query(
            "grep -m1 'model name' /proc/cpuinfo | cut -d: -f2",
            PROBE_TIMEOUT,
            true,
        )
        .await
        .unwrap_or_default();

    profile
        .section("CPU")
        .push("count", count.trim())
        .push("model", model.trim());
}

/// `free -m`: total, used = total - free - buffers - cache. Warns when
/// any swap is in use, or when a row can't be parsed — every entry the
/// probe names is still pushed, empty, in that case (spec invariant:
/// absent data is an empty value, never an omitted entry). Also folds in
/// the optional `sar`-backed historical usage probe.
async fn memory<T: Transport>(session: &Session<T>, profile: &mut Profile) {
    let output = session.query("free -m", PROBE_TIMEOUT, true).await.unwrap_or_default();

    let mem_cols: Vec<u64> = output
        .lines()
        .find(|l| l.starts_with("Mem:"))
        .map(|line| line.split_whitespace().skip(1).filter_map(|c| c.parse().ok()).collect())
        .unwrap_or_default();
    if let [total, _used, free, _shared, buffers, cache, ..] = mem_cols[..] {
        let used = total.saturating_sub(free).saturating_sub(buffers).saturating_sub(cache);
        profile
            .section("Memory")
            .push("total_mib", total.to_string())
            .push("used_mib", used.to_string());
    } else {
        profile.section("Memory").push("total_mib", "").push("used_mib", "");
        profile.warn("could not parse memory usage from `free -m`");
    }

    let swap_cols: Vec<u64> = output
        .lines()
        .find(|l| l.starts_with("Swap:"))
        .map(|line| line.split_whitespace().skip(1).filter_map(|c| c.parse().ok()).collect())
        .unwrap_or_default();
    if let [total, used, ..] = swap_cols[..] {
        profile
            .section("Memory")
            .push("swap_total_mib", total.to_string())
            .push("swap_used_mib", used.to_string());
        if used > 0 {
            profile.warn("swap is in use");
        }
    } else {
        profile.section("Memory").push("swap_total_mib", "").push("swap_used_mib", "");
        profile.warn("could not parse swap usage from `free -m`");
    }

    match historical_used_pct(session).await {
        Some(pct) => {
            profile.section("Memory").push("historical_used_pct", format!("{pct:.2}"));
        }
        None => {
            profile.section("Memory").push("historical_used_pct", "");
        }
    }
}

/// Optional: if `sar` is present, averages `%memused` over whatever
/// `sa??` history files `sysstat` has accumulated. Absent `sar` (or no
/// files, or unparseable output) yields `None` rather than an error —
/// this probe is informational, not load-bearing.
async fn historical_used_pct<T: Transport>(session: &Session<T>) -> Option<f64> {
    let which = session.query("which sar", PROBE_TIMEOUT, true).await.unwrap_or_default();
    if which.trim().is_empty() {
        return None;
    }

    let output = session
        .query(
            "sar -r $(ls /var/log/sa/sa?? 2>/dev/null) 2>/dev/null | awk '/^Average/ {print $5}'",
            PROBE_TIMEOUT,
            true,
        )
        .await
        .unwrap_or_default();

    let values: Vec<f64> = output.lines().filter_map(|l| l.trim().parse().ok()).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

async fn load<T: Transport>(session: &Session<T>, profile: &mut Profile) {
    let output = session
        .query("cat /proc/loadavg", PROBE_TIMEOUT, true)
        .await
        .unwrap_or_default();
    let fields: Vec<&str> = output.split_whitespace().collect();

    let section = profile.section("Load");
    section.push("one_min", fields.first().copied().unwrap_or(""));
    section.push("five_min", fields.get(1).copied().unwrap_or(""));
    section.push("fifteen_min", fields.get(2).copied().unwrap_or(""));
    if fields.len() < 3 {
        profile.warn("could not parse `/proc/loadavg`");
    }

    if let Some(one) = fields.first().and_then(|v| v.parse::<f64>().ok()) {
        if one > 10.0 {
            profile.warn("heavy load");
        }
    }

    let iowait = session
        .query(
            "vmstat 1 2 | tail -1 | awk '{print $16}'",
            PROBE_TIMEOUT,
            true,
        )
        .await
        .unwrap_or_default();
    match iowait.trim().parse::<f64>() {
        Ok(iowait_pct) => {
            profile.section("Load").push("iowait_pct", iowait_pct.to_string());
            if iowait_pct > 10.0 {
                profile.warn("IO wait high");
            }
        }
        Err(_) => {
            profile.section("Load").push("iowait_pct", "");
            profile.warn("could not parse iowait from `vmstat`");
        }
    }
}

/// Sums the "Used" column of `df` rows mounted under `/dev/*`, or whose
/// block count exceeds 10,000,000, converting KiB to GB (÷10^6).
async fn storage<T: Transport>(session: &Session<T>, profile: &mut Profile) {
    let output = session.query("df -k", PROBE_TIMEOUT, true).await.unwrap_or_default();

    let mut total_used_kib: u64 = 0;
    for line in output.lines().skip(1) {
        let cols: Vec<&str> = line.split_whitespace().collect();
        let [device, blocks_str, used_str, ..] = cols[..] else { continue };
        let Ok(blocks) = blocks_str.parse::<u64>() else { continue };
        let Ok(used) = used_str.parse::<u64>() else { continue };

        if device.starts_with("/dev/") || blocks > 10_000_000 {
            total_used_kib += used;
        }
    }

    let used_gb = total_used_kib as f64 / 1_000_000.0;
    profile.section("Storage").push("used_gb", format!("{used_gb:.2}"));
}

/// Lists non-loopback IPv4 addresses from `ifconfig`, partitioned into
/// RFC1918 and public.
async fn network<T: Transport>(session: &Session<T>, profile: &mut Profile) {
    let output = session.query("ifconfig -a", PROBE_TIMEOUT, true).await.unwrap_or_default();

    let section = profile.section("Network");
    for ip in extract_inet_addresses(&output) {
        if is_rfc1918(&ip) {
            section.push("private_ip", ip);
        } else {
            section.push("public_ip", ip);
        }
    }
}

/// Pulls every non-loopback IPv4 address off an `inet`/`inet addr:` line of
/// `ifconfig` output. Anchored on the `inet` label so netmask/broadcast
/// tokens on the same line (e.g. `netmask 255.255.255.0`) are never mistaken
/// for host addresses. Shared with the Migration Engine's target-address
/// selection (C7), which parses the same `ifconfig -a` output.
pub fn extract_inet_addresses(ifconfig_output: &str) -> Vec<String> {
    // Allow expect here as the regex is compile-time verified to be valid
    #[allow(clippy::expect_used)]
    let addr_re = Regex::new(r"inet (?:addr:)?(\d+\.\d+\.\d+\.\d+)").expect("constant regex pattern is valid");

    addr_re
        .captures_iter(ifconfig_output)
        .map(|caps| caps[1].to_string())
        .filter(|ip| ip != "127.0.0.1")
        .collect()
}

fn is_rfc1918(ip: &str) -> bool {
    let octets: Vec<u8> = ip.split('.').filter_map(|o| o.parse().ok()).collect();
    match octets[..] {
        [10, ..] => true,
        [172, second, ..] => (16..=31).contains(&second),
        [192, 168, ..] => true,
        _ => false,
    }
}

async fn libraries<T: Transport>(session: &Session<T>, profile: &mut Profile) {
    let output = session
        .query("ldconfig -p | head -50", PROBE_TIMEOUT, true)
        .await
        .unwrap_or_default();

    let section = profile.section("Libraries");
    for line in output.lines() {
        if let Some(name) = line.split_whitespace().next() {
            section.push("library", name);
        }
    }
}

/// Lists unique listening (tcp/udp) `(address, port, process)` triples.
async fn services<T: Transport>(session: &Session<T>, profile: &mut Profile) {
    let output = session
        .query("netstat -tulnp 2>/dev/null", PROBE_TIMEOUT, true)
        .await
        .unwrap_or_default();

    let mut seen = std::collections::HashSet::new();
    let section = profile.section("Services");
    for line in output.lines() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 4 || !(cols[0].starts_with("tcp") || cols[0].starts_with("udp")) {
            continue;
        }
        let local_addr = cols[3];
        let process = cols.last().copied().unwrap_or("-");
        let key = format!("{local_addr} {process}");
        if seen.insert(key.clone()) {
            section.push("listener", key);
        }
    }

    if output.to_lowercase().contains("psa") {
        profile.warn("likely Plesk");
    }
    if output.to_lowercase().contains("cpanel") {
        profile.warn("likely cPanel");
    }
}

#[cfg(test)]
#[path = "probes_tests.rs"]
mod tests;
