// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cloudflock-profiler: the Host Profiler (C3) — CPE derivation and the
//! fixed probe table that builds a `Profile`.

pub mod platform;
pub mod probes;

pub use platform::derive_cpe;
pub use probes::extract_inet_addresses;

use cloudflock_core::Profile;
use cloudflock_shell::{Session, Transport};

/// Run CPE derivation and every probe, in fixed order, building a
/// complete [`Profile`] for `session`. An unresolved CPE (empty vendor)
/// raises the "Unable to determine platform" warning.
pub async fn profile_host<T: Transport>(session: &Session<T>) -> Profile {
    let cpe = platform::derive_cpe(session).await;
    let mut profile = Profile::new(cpe);
    if profile.cpe.is_unresolved() {
        profile.warn("Unable to determine platform");
    }
    probes::run_all(session, &mut profile).await;
    profile
}
