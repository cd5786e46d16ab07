// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing, mirroring the codebase's own
//! `FakeSessionAdapter`: records every call and lets the test script
//! canned replies and connection drops.

use async_trait::async_trait;
use cloudflock_shell::{Transport, TransportError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// One recorded interaction with a [`FakeTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Connect,
    WriteLine(String),
    ReadUntil,
    Close,
}

struct FakeState {
    connected: bool,
    calls: Vec<TransportCall>,
    reads: VecDeque<String>,
    fail_connects_remaining: u32,
    drop_connection_on_next_read: bool,
}

/// A scriptable [`Transport`] for exercising `Session` without a real
/// host. Cheap to clone: all state lives behind an `Arc<Mutex<_>>`, so a
/// test can hold a handle to assert on calls after handing a clone to the
/// session under test.
#[derive(Clone)]
pub struct FakeTransport {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                connected: false,
                calls: Vec::new(),
                reads: VecDeque::new(),
                fail_connects_remaining: 0,
                drop_connection_on_next_read: false,
            })),
        }
    }
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a buffer to be returned by the next [`Transport::read_until`]
    /// call (or as much of it as satisfies the predicate/deadline).
    pub fn queue_read(&self, buffer: impl Into<String>) -> &Self {
        self.inner.lock().reads.push_back(buffer.into());
        self
    }

    pub fn fail_connects(&self, times: u32) -> &Self {
        self.inner.lock().fail_connects_remaining = times;
        self
    }

    pub fn drop_on_next_read(&self) -> &Self {
        self.inner.lock().drop_connection_on_next_read = true;
        self
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        let mut state = self.inner.lock();
        state.calls.push(TransportCall::Connect);
        if state.fail_connects_remaining > 0 {
            state.fail_connects_remaining -= 1;
            return Err(TransportError::ConnectionLost);
        }
        state.connected = true;
        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        let mut state = self.inner.lock();
        if !state.connected {
            return Err(TransportError::ConnectionLost);
        }
        state.calls.push(TransportCall::WriteLine(line.to_string()));
        Ok(())
    }

    async fn read_until(
        &mut self,
        _deadline: Duration,
        _is_complete: &(dyn for<'a> Fn(&'a str) -> bool + Send + Sync),
    ) -> Result<String, TransportError> {
        let mut state = self.inner.lock();
        state.calls.push(TransportCall::ReadUntil);
        if state.drop_connection_on_next_read {
            state.drop_connection_on_next_read = false;
            state.connected = false;
            return Err(TransportError::ConnectionLost);
        }
        Ok(state.reads.pop_front().unwrap_or_default())
    }

    async fn is_connected(&self) -> bool {
        self.inner.lock().connected
    }

    async fn close(&mut self) {
        let mut state = self.inner.lock();
        state.calls.push(TransportCall::Close);
        state.connected = false;
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
