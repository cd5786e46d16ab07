// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced transport wrapper for consistent observability, mirroring the
//! codebase's own `TracedSession`/`TracedAgent` wrappers.

use async_trait::async_trait;
use cloudflock_shell::{Transport, TransportError};
use std::time::Duration;
use tracing::Instrument;

/// Wraps any `Transport` with tracing spans around connect/write/read.
#[derive(Clone)]
pub struct TracedTransport<T> {
    inner: T,
}

impl<T> TracedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for TracedTransport<T> {
    async fn connect(&mut self) -> Result<(), TransportError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.connect().await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "connected"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "connect failed"),
            }
            result
        }
        .instrument(tracing::info_span!("transport.connect"))
        .await
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        tracing::trace!(len = line.len(), "write_line");
        let result = self.inner.write_line(line).await;
        if let Err(ref e) = result {
            tracing::error!(error = %e, "write_line failed");
        }
        result
    }

    async fn read_until(
        &mut self,
        deadline: Duration,
        is_complete: &(dyn for<'a> Fn(&'a str) -> bool + Send + Sync),
    ) -> Result<String, TransportError> {
        let result = self.inner.read_until(deadline, is_complete).await;
        match &result {
            Ok(buf) => tracing::trace!(len = buf.len(), "read_until"),
            Err(e) => tracing::error!(error = %e, "read_until failed"),
        }
        result
    }

    async fn is_connected(&self) -> bool {
        self.inner.is_connected().await
    }

    async fn close(&mut self) {
        tracing::info_span!("transport.close").in_scope(|| tracing::info!("closing"));
        self.inner.close().await;
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
