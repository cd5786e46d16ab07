// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three canonical watchdogs the Migration Engine supervises every
//! sync pass with.

use crate::watchdog::Watchdog;
use cloudflock_shell::{Session, Transport};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_ALARM: &str = "default";

/// Polls `df -k`, reports `used/total` summed across `/dev/*`-mounted
/// rows. Default alarm trips above 95% utilization.
pub fn used_space<T: Transport>(session: Arc<Session<T>>, interval: Duration) -> Watchdog<T> {
    let watchdog = Watchdog::create("used_space", session, "df -k", interval, used_space_ratio);
    watchdog.add_alarm(DEFAULT_ALARM, |ratio| ratio > 0.95);
    watchdog
}

fn used_space_ratio(output: &str) -> f64 {
    let (mut used, mut total) = (0u64, 0u64);
    for line in output.lines().skip(1) {
        let cols: Vec<&str> = line.split_whitespace().collect();
        let [device, blocks_str, used_str, ..] = cols[..] else { continue };
        let Ok(blocks) = blocks_str.parse::<u64>() else { continue };
        let Ok(used_kib) = used_str.parse::<u64>() else { continue };
        if device.starts_with("/dev/") {
            used += used_kib;
            total += blocks;
        }
    }
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64
    }
}

/// Polls `uptime`, reports the 15-minute load average. Default alarm
/// trips above 10.
pub fn system_load<T: Transport>(session: Arc<Session<T>>, interval: Duration) -> Watchdog<T> {
    let watchdog = Watchdog::create("system_load", session, "uptime", interval, fifteen_min_load);
    watchdog.add_alarm(DEFAULT_ALARM, |load| load > 10.0);
    watchdog
}

fn fifteen_min_load(output: &str) -> f64 {
    output
        .rsplit("load average:")
        .next()
        .and_then(|rest| rest.split(',').nth(2))
        .and_then(|field| field.trim().parse().ok())
        .unwrap_or(0.0)
}

/// Polls `free -m`, reports `swap_used/swap_total` as a ratio. Default
/// alarm trips above 25%.
pub fn utilized_memory<T: Transport>(session: Arc<Session<T>>, interval: Duration) -> Watchdog<T> {
    let watchdog = Watchdog::create("utilized_memory", session, "free -m", interval, swap_ratio);
    watchdog.add_alarm(DEFAULT_ALARM, |ratio| ratio > 0.25);
    watchdog
}

fn swap_ratio(output: &str) -> f64 {
    let Some(line) = output.lines().find(|l| l.starts_with("Swap:")) else { return 0.0 };
    let cols: Vec<u64> = line.split_whitespace().skip(1).filter_map(|c| c.parse().ok()).collect();
    match cols[..] {
        [total, used, ..] if total > 0 => used as f64 / total as f64,
        _ => 0.0,
    }
}

#[cfg(test)]
#[path = "canonical_tests.rs"]
mod tests;
