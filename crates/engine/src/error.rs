// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single error-kind enumeration for the engine crate, per the
//! "cyclic module references" redesign flag: one enum, context-carrying
//! variants, no per-component error types threading back and forth.

use cloudflock_catalog::NoFlavor;
use cloudflock_provision::ProvisionError;
use cloudflock_shell::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("no rsync available and no package manager found to install it")]
    NoRsync,

    #[error("destination does not expose a matching host key fingerprint on any address")]
    NoMatchingFingerprint,

    #[error("rsync pass failed after {attempts} attempt(s): {reason}")]
    RsyncFailed { attempts: u32, reason: String },

    #[error("migration cancelled by watchdog alarm: {alarm}")]
    Cancelled { alarm: String },

    #[error("no platform flavor satisfies the requested resources: {0}")]
    NoFlavor(#[from] NoFlavor),

    #[error("no catalog image for platform {vendor}/{product}/{version}")]
    NoImage { vendor: String, product: String, version: String },

    #[error("provisioning failed: {0}")]
    Provision(#[from] ProvisionError),

    #[error("resume mode requires a destination endpoint to already be set")]
    ResumeWithoutDestination,

    #[error("{phase} step failed: {reason}")]
    Phase { phase: &'static str, reason: String },
}
