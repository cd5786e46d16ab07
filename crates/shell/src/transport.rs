// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Transport` trait: one production implementation that shells out to
//! a real `ssh` binary, plus fakes for the rest of the workspace's tests.
//! Mirrors the codebase's own `SessionAdapter` split between one real
//! adapter and a `Fake`/`NoOp` pair gated behind `test-support`.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors a [`Transport`] can raise. `SessionError` (in [`crate::session`])
/// wraps these with the higher-level state-machine context.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("hostname did not resolve: {0}")]
    InvalidHostname(String),
    #[error("authentication failed after {attempts} attempt(s)")]
    LoginFailed { attempts: u32 },
    #[error("connection lost")]
    ConnectionLost,
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("io error: {0}")]
    Io(String),
}

/// A raw PTY-backed connection to one host. `Session` layers the sentinel
/// framing, elevation state machine, and retry policy described in the
/// remote shell component on top of this.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Open the connection and authenticate as the login user. Called once
    /// per session; reconnect is modeled as dropping and recreating the
    /// transport.
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Write one line (already sentinel-wrapped) to the remote shell's
    /// stdin.
    async fn write_line(&mut self, line: &str) -> Result<(), TransportError>;

    /// Read from the remote shell until `deadline` elapses or the
    /// predicate (applied to the buffer accumulated so far) returns
    /// `true`. Returns whatever was read, including a partial read on
    /// timeout.
    async fn read_until(
        &mut self,
        deadline: Duration,
        is_complete: &(dyn for<'a> Fn(&'a str) -> bool + Send + Sync),
    ) -> Result<String, TransportError>;

    /// Whether the underlying connection still looks alive.
    async fn is_connected(&self) -> bool;

    /// Tear the connection down. Idempotent.
    async fn close(&mut self);
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
