// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport that does nothing, mirroring the codebase's own
//! `NoOpSessionAdapter`. Used in minimal deployments and as a safe default
//! for watchdogs/engines constructed without a live host.

use async_trait::async_trait;
use cloudflock_shell::{Transport, TransportError};
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTransport;

impl NoopTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for NoopTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn write_line(&mut self, _line: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn read_until(
        &mut self,
        _deadline: Duration,
        _is_complete: &(dyn for<'a> Fn(&'a str) -> bool + Send + Sync),
    ) -> Result<String, TransportError> {
        Ok(String::new())
    }

    async fn is_connected(&self) -> bool {
        false
    }

    async fn close(&mut self) {}
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
