// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Migration Engine (C7): the eight-step two-pass rsync protocol
//! between two already-connected, already-elevated sessions.

use crate::error::EngineError;
use crate::paths::{DEFAULT_BLOCK_DEVICE, EXCLUSIONS, MOUNT_POINT, PRIVATE_KEY, PUBLIC_KEY};
use cloudflock_core::ExclusionList;
use cloudflock_shell::{Session, SessionError, Transport};
use std::sync::Arc;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);
const PACKAGE_INSTALL_TIMEOUT: Duration = Duration::from_secs(300);
const KEYGEN_TIMEOUT: Duration = Duration::from_secs(3600);
const RSYNC_PASS_TIMEOUT: Duration = Duration::from_secs(7200);
const MAX_RSYNC_RETRIES: u32 = 3;
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Step 1: generate the migration keypair on `source` (idempotent — a
/// pre-existing keypair from a resumed run is reused), returning the
/// public key material.
pub async fn provision_keypair<T: Transport>(source: &Session<T>) -> Result<String, EngineError> {
    source.as_root(&format!("mkdir -p {}", crate::paths::DATA_DIR), PROBE_TIMEOUT, true).await?;
    source
        .as_root(
            &format!("test -f {PRIVATE_KEY} || ssh-keygen -t rsa -b 4096 -N '' -f {PRIVATE_KEY}"),
            KEYGEN_TIMEOUT,
            true,
        )
        .await?;
    let key = source.as_root(&format!("cat {PUBLIC_KEY}"), PROBE_TIMEOUT, true).await?;
    Ok(key.trim().to_string())
}

/// Step 2: mount the destination root device, back up its identity
/// files, ensure `rsync`, and install the source public key.
pub async fn prepare_destination<T: Transport>(
    destination: &Session<T>,
    public_key: &str,
    block_device: &str,
) -> Result<(), EngineError> {
    destination.as_root(&format!("mkdir -p {MOUNT_POINT}"), PROBE_TIMEOUT, true).await?;
    destination
        .as_root(&format!("mount -o acl {block_device} {MOUNT_POINT}"), PROBE_TIMEOUT, true)
        .await?;

    destination
        .as_root(
            &format!(
                "for f in passwd shadow group; do [ -f {MOUNT_POINT}/etc/$f.migration ] || cp {MOUNT_POINT}/etc/$f {MOUNT_POINT}/etc/$f.migration; done"
            ),
            PROBE_TIMEOUT,
            true,
        )
        .await?;

    ensure_rsync_installed(destination).await?;

    destination.as_root("mkdir -p -m 0700 $HOME/.ssh", PROBE_TIMEOUT, true).await?;
    destination
        .as_root(&format!("echo '{public_key}' >> $HOME/.ssh/authorized_keys"), PROBE_TIMEOUT, true)
        .await?;
    Ok(())
}

async fn ensure_rsync_installed<T: Transport>(session: &Session<T>) -> Result<(), EngineError> {
    let present = session.as_root("which rsync", PROBE_TIMEOUT, true).await.unwrap_or_default();
    if !present.trim().is_empty() {
        return Ok(());
    }

    let manager = session.as_root("which yum apt-get 2>/dev/null | head -1", PROBE_TIMEOUT, true).await?;
    if manager.contains("yum") {
        session.as_root("yum install -y rsync", PACKAGE_INSTALL_TIMEOUT, true).await?;
    } else if manager.contains("apt-get") {
        session.as_root("apt-get install -y rsync", PACKAGE_INSTALL_TIMEOUT, true).await?;
    } else {
        return Err(EngineError::NoRsync);
    }

    let present = session.as_root("which rsync", PROBE_TIMEOUT, true).await?;
    if present.trim().is_empty() {
        return Err(EngineError::NoRsync);
    }
    Ok(())
}

/// Step 3: write the exclusions file on `source`; fetch `rsync` from the
/// destination via `scp` if the source doesn't already have it.
pub async fn prepare_source<T: Transport>(
    source: &Session<T>,
    destination: &Session<T>,
    exclusions: &ExclusionList,
) -> Result<(), EngineError> {
    let body = exclusions.patterns().join("\n");
    source
        .as_root(&format!("cat > {EXCLUSIONS} <<'CLOUDFLOCK_EXCLUSIONS'\n{body}\nCLOUDFLOCK_EXCLUSIONS"), PROBE_TIMEOUT, true)
        .await?;

    let present = source.as_root("which rsync", PROBE_TIMEOUT, true).await.unwrap_or_default();
    if present.trim().is_empty() {
        let host = destination.hostname();
        source
            .as_root(
                &format!("scp -o UserKnownHostsFile=/dev/null -o StrictHostKeyChecking=no root@{host}:$(which rsync) {}/rsync", crate::paths::DATA_DIR),
                PACKAGE_INSTALL_TIMEOUT,
                true,
            )
            .await?;
    }
    Ok(())
}

fn extract_fingerprint(ssh_keygen_output: &str) -> Option<&str> {
    ssh_keygen_output.split_whitespace().find(|tok| tok.contains(':'))
}

/// Step 4: pick the destination address whose observed host-key
/// fingerprint (from the source's perspective) matches the destination's
/// own fingerprint. The *last* matching address wins; falls back to the
/// destination's hostname if none match.
pub async fn select_target_address<T: Transport>(
    source: &Session<T>,
    destination: &Session<T>,
) -> Result<String, EngineError> {
    let fingerprint_output = destination
        .as_root("ssh-keygen -l -f /etc/ssh/ssh_host_rsa_key.pub", PROBE_TIMEOUT, true)
        .await?;
    let own_fingerprint = extract_fingerprint(&fingerprint_output).unwrap_or_default().to_string();

    let ifconfig = destination.query("ifconfig -a", PROBE_TIMEOUT, true).await?;
    let addresses = cloudflock_profiler::extract_inet_addresses(&ifconfig);

    let mut selected = None;
    for addr in &addresses {
        let probe = source
            .query(
                &format!(
                    "ssh-keyscan -t rsa {addr} 2>/dev/null | ssh-keygen -lf - 2>/dev/null"
                ),
                PROBE_TIMEOUT,
                true,
            )
            .await
            .unwrap_or_default();
        if extract_fingerprint(&probe) == Some(own_fingerprint.as_str()) {
            selected = Some(addr.clone());
        }
    }

    Ok(selected.unwrap_or_else(|| destination.hostname().to_string()))
}

/// The sed edit applied between pass 1 and pass 2 (§4.6 step 6,
/// scenario S5): every occurrence of `/var/log` is removed, not just
/// whole-line matches, matching `sed -i 's|/var/log||g'`.
pub fn apply_between_pass_edit(exclusions_text: &str) -> String {
    exclusions_text.replace("/var/log", "")
}

fn rsync_command(target_addr: &str) -> String {
    format!(
        "rsync -azP -e 'ssh -o UserKnownHostsFile=/dev/null -o StrictHostKeyChecking=no -i {PRIVATE_KEY}' --exclude-from={EXCLUSIONS} / root@{target_addr}:{MOUNT_POINT}"
    )
}

async fn run_rsync_pass<T: Transport>(source: &Session<T>, target_addr: &str) -> Result<(), EngineError> {
    let cmd = rsync_command(target_addr);
    let mut attempts = 0;
    loop {
        attempts += 1;
        match source.as_root(&cmd, RSYNC_PASS_TIMEOUT, true).await {
            Ok(_) => return Ok(()),
            Err(SessionError::DeadlineExceeded(reason)) => {
                if attempts >= MAX_RSYNC_RETRIES {
                    return Err(EngineError::RsyncFailed { attempts, reason });
                }
                tracing::warn!(attempts, "rsync pass timed out, retrying");
            }
            Err(other) => return Err(other.into()),
        }
    }
}

async fn run_two_passes<T: Transport>(source: Arc<Session<T>>, target_addr: String) -> Result<(), EngineError> {
    run_rsync_pass(&source, &target_addr).await?;
    source
        .as_root(&format!("sed -i 's|/var/log||g' {EXCLUSIONS}"), PROBE_TIMEOUT, true)
        .await?;
    run_rsync_pass(&source, &target_addr).await?;
    Ok(())
}

async fn wait_until_healthy<T: Transport>(watchdogs: &[cloudflock_watchdog::Watchdog<T>]) {
    loop {
        if watchdogs.iter().all(|w| w.triggered().is_empty()) {
            return;
        }
        tokio::time::sleep(HEALTH_POLL_INTERVAL).await;
    }
}

/// Steps 5-8: health-gated, cancellable two-pass sync. On a watchdog
/// alarm the worker task is aborted and the engine restarts from the
/// health-check gate (rsync's own `-P` semantics resume the transfer).
pub async fn sync<T: Transport>(
    source: Arc<Session<T>>,
    destination: Arc<Session<T>>,
    target_addr: &str,
) -> Result<(), EngineError> {
    loop {
        let mut watchdogs = vec![
            cloudflock_watchdog::system_load(Arc::clone(&source), HEALTH_POLL_INTERVAL),
            cloudflock_watchdog::utilized_memory(Arc::clone(&source), HEALTH_POLL_INTERVAL),
            cloudflock_watchdog::system_load(Arc::clone(&destination), HEALTH_POLL_INTERVAL),
            cloudflock_watchdog::utilized_memory(Arc::clone(&destination), HEALTH_POLL_INTERVAL),
            cloudflock_watchdog::used_space(Arc::clone(&destination), HEALTH_POLL_INTERVAL),
        ];
        wait_until_healthy(&watchdogs).await;

        let worker_source = Arc::clone(&source);
        let worker_target = target_addr.to_string();
        let handle = tokio::spawn(async move { run_two_passes(worker_source, worker_target).await });
        let abort_handle = handle.abort_handle();
        for watchdog in &watchdogs {
            let ah = abort_handle.clone();
            watchdog.on_alarm("default", move || ah.abort());
        }

        let result = handle.await;
        for watchdog in &mut watchdogs {
            watchdog.stop();
        }

        match result {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(err)) => return Err(err),
            Err(join_err) if join_err.is_cancelled() => {
                tracing::info!("migration worker cancelled by watchdog alarm, restarting from health check");
                continue;
            }
            Err(join_err) => {
                return Err(EngineError::Phase { phase: "migrate", reason: join_err.to_string() });
            }
        }
    }
}

/// The full C7 protocol: keypair, destination prep, source prep, target
/// selection, then the health-gated two-pass sync.
pub async fn run<T: Transport>(
    source: Arc<Session<T>>,
    destination: Arc<Session<T>>,
    exclusions: &ExclusionList,
) -> Result<(), EngineError> {
    let public_key = provision_keypair(&source).await?;
    prepare_destination(&destination, &public_key, DEFAULT_BLOCK_DEVICE).await?;
    prepare_source(&source, &destination, exclusions).await?;
    let target_addr = select_target_address(&source, &destination).await?;
    sync(source, destination, &target_addr).await
}

#[cfg(test)]
#[path = "migrate_tests.rs"]
mod tests;
