// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Cleanup Runner (C8): writes the three phase scripts onto the
//! destination and executes them in strict order, then restores
//! auxiliary users from the backed-up identity files.

use crate::error::EngineError;
use crate::paths::{chroot_script, post_script, pre_script, MOUNT_POINT};
use cloudflock_core::{CleanupPhase, CleanupPlan};
use cloudflock_shell::Session;
use cloudflock_shell::Transport;
use std::time::Duration;

/// "0 (unlimited)" per §5: cleanup phases include long-running chroot
/// tasks, so they get a day-scale ceiling instead of a real deadline.
const NO_DEADLINE: Duration = Duration::from_secs(86_400);

const AUXILIARY_USERS: &[&str] = &["rack", "rackconnect"];

fn pre_body() -> String {
    format!(
        "mount -o bind /proc {MOUNT_POINT}/proc\nmount -o bind /dev {MOUNT_POINT}/dev\nmount -o bind /sys {MOUNT_POINT}/sys\nrm -rf {MOUNT_POINT}/var/run/*\n"
    )
}

fn post_body() -> String {
    format!("umount {MOUNT_POINT}/sys\numount {MOUNT_POINT}/dev\numount {MOUNT_POINT}/proc\n")
}

/// Build and run the three cleanup phases against `destination`, then
/// restore auxiliary users. `destination` must already be root.
pub async fn run<T: Transport>(destination: &Session<T>, plan: &CleanupPlan) -> Result<(), EngineError> {
    write_phase(destination, &pre_script(), &pre_body(), plan.commands(CleanupPhase::Pre)).await?;
    destination.as_root(&format!("/bin/sh {}", pre_script()), NO_DEADLINE, true).await?;

    write_phase(
        destination,
        &chroot_script(),
        "rm -f /etc/udev/rules.d/70-persistent-net.rules\n",
        plan.commands(CleanupPhase::Chroot),
    )
    .await?;
    destination
        .as_root(
            &format!("chroot {MOUNT_POINT} /bin/sh -C {}", crate::paths::chroot_script_relative()),
            NO_DEADLINE,
            true,
        )
        .await?;

    write_phase(destination, &post_script(), &post_body(), plan.commands(CleanupPhase::Post)).await?;
    destination.as_root(&format!("/bin/sh {}", post_script()), NO_DEADLINE, true).await?;

    restore_auxiliary_users(destination).await?;
    Ok(())
}

async fn write_phase<T: Transport>(
    session: &Session<T>,
    path: &str,
    ambient_body: &str,
    platform_commands: &[String],
) -> Result<(), EngineError> {
    let mut body = String::from(ambient_body);
    for command in platform_commands {
        body.push_str(command);
        body.push('\n');
    }
    session
        .as_root(
            &format!("cat > {path} <<'CLOUDFLOCK_SCRIPT'\n{body}CLOUDFLOCK_SCRIPT"),
            NO_DEADLINE,
            true,
        )
        .await?;
    Ok(())
}

/// Restores `rack`/`rackconnect` accounts from the `*.migration` backups
/// if present, granting them passwordless sudo.
async fn restore_auxiliary_users<T: Transport>(destination: &Session<T>) -> Result<(), EngineError> {
    for user in AUXILIARY_USERS {
        let present = destination
            .as_root(
                &format!("grep -q '^{user}:' {MOUNT_POINT}/etc/passwd.migration 2>/dev/null && echo yes || echo no"),
                NO_DEADLINE,
                true,
            )
            .await?;
        if present.trim() != "yes" {
            continue;
        }

        destination
            .as_root(
                &format!(
                    "grep '^{user}:' {MOUNT_POINT}/etc/passwd.migration >> {MOUNT_POINT}/etc/passwd; \
                     grep '^{user}:' {MOUNT_POINT}/etc/shadow.migration >> {MOUNT_POINT}/etc/shadow; \
                     home=$(grep '^{user}:' {MOUNT_POINT}/etc/passwd.migration | cut -d: -f6); \
                     chroot {MOUNT_POINT} chown -R {user}:{user} \"$home\"; \
                     echo '{user} ALL=(ALL) NOPASSWD:ALL' >> {MOUNT_POINT}/etc/sudoers"
                ),
                NO_DEADLINE,
                true,
            )
            .await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "cleanup_runner_tests.rs"]
mod tests;
