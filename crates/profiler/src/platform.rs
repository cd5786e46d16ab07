// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CPE derivation: an ordered fallback chain, stopping at first success.

use cloudflock_core::{normalize_version, Cpe};
use cloudflock_shell::{Session, Transport};
use regex::Regex;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

const KNOWN_DISTROS: &[&str] = &[
    "Arch", "CentOS", "Debian", "Gentoo", "Scientific", "SUSE", "Ubuntu", "RedHat",
];

/// Run the four-step CPE derivation fallback chain against `session`.
/// Stops at the first step that yields a resolved (non-empty-vendor) CPE.
/// Returns an unresolved [`Cpe`] (empty vendor) if every step fails.
pub async fn derive_cpe<T: Transport>(session: &Session<T>) -> Cpe {
    if let Some(cpe) = from_system_release_cpe(session).await {
        return cpe;
    }
    if let Some(cpe) = from_etc_issue(session).await {
        return cpe;
    }
    if let Some(cpe) = from_release_files(session).await {
        return cpe;
    }
    from_uname(session).await
}

async fn from_system_release_cpe<T: Transport>(session: &Session<T>) -> Option<Cpe> {
    let output = session
        .query("cat /etc/system-release-cpe 2>/dev/null", PROBE_TIMEOUT, true)
        .await
        .ok()?;
    let cpe = Cpe::parse_uri(output.trim())?;
    (!cpe.is_unresolved()).then_some(cpe)
}

async fn from_etc_issue<T: Transport>(session: &Session<T>) -> Option<Cpe> {
    let output = session
        .query("cat /etc/issue 2>/dev/null", PROBE_TIMEOUT, true)
        .await
        .ok()?;

    let distro = KNOWN_DISTROS.iter().find(|d| output.to_lowercase().contains(&d.to_lowercase()))?;
    let version = normalize_version(&output);
    if version.is_empty() {
        return None;
    }

    Some(Cpe::new("o", *distro, *distro, version))
}

async fn from_release_files<T: Transport>(session: &Session<T>) -> Option<Cpe> {
    let output = session
        .query(
            "cat /etc/*[_-]release /etc/*version 2>/dev/null",
            PROBE_TIMEOUT,
            true,
        )
        .await
        .ok()?;

    let id_line_re = Regex::new(r#"(?m)^ID="?([A-Za-z0-9_.-]+)"?"#).ok()?;
    let version_re = Regex::new(r#"(?m)^VERSION_ID="?([0-9][0-9A-Za-z.]*)"?"#).ok();

    let vendor = id_line_re.captures(&output)?.get(1)?.as_str().to_string();
    let version = version_re
        .and_then(|re| re.captures(&output))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Some(Cpe::new("o", &vendor, &vendor, version))
}

async fn from_uname<T: Transport>(session: &Session<T>) -> Cpe {
    let vendor = session
        .query("uname -o", PROBE_TIMEOUT, true)
        .await
        .unwrap_or_default();
    let version = session
        .query("uname -r", PROBE_TIMEOUT, true)
        .await
        .unwrap_or_default();

    Cpe::new("o", vendor.trim(), vendor.trim(), version.trim())
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
