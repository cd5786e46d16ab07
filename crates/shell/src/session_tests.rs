// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{Session, SessionError, SessionState};
use crate::transport::{Transport, TransportError};
use async_trait::async_trait;
use cloudflock_core::{EscalationPolicy, HostEndpoint, LoginSecret};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

fn endpoint() -> HostEndpoint {
    HostEndpoint::new("example.com", "root", LoginSecret::Password("x".into()))
        .with_escalation(EscalationPolicy::Su, Some("rootpw".into()))
}

/// A `Transport` that answers every `write_line` sentinel frame with a
/// canned reply, queued in order. Good enough to drive `Session`'s
/// protocol logic without a real PTY.
#[derive(Clone, Default)]
struct MockTransport {
    connected: Arc<Mutex<bool>>,
    connect_failures: Arc<Mutex<u32>>,
    replies: Arc<Mutex<VecDeque<String>>>,
    fail_next_read: Arc<Mutex<bool>>,
}

impl MockTransport {
    fn with_replies(replies: Vec<&str>) -> Self {
        let me = Self::default();
        *me.replies.lock() = replies.into_iter().map(String::from).collect();
        me
    }

    fn fail_connect_times(self, n: u32) -> Self {
        *self.connect_failures.lock() = n;
        self
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        let mut failures = self.connect_failures.lock();
        if *failures > 0 {
            *failures -= 1;
            return Err(TransportError::ConnectionLost);
        }
        *self.connected.lock() = true;
        Ok(())
    }

    async fn write_line(&mut self, _line: &str) -> Result<(), TransportError> {
        if !*self.connected.lock() {
            return Err(TransportError::ConnectionLost);
        }
        Ok(())
    }

    async fn read_until(
        &mut self,
        _deadline: Duration,
        _is_complete: &(dyn for<'a> Fn(&'a str) -> bool + Send + Sync),
    ) -> Result<String, TransportError> {
        if *self.fail_next_read.lock() {
            *self.fail_next_read.lock() = false;
            return Err(TransportError::ConnectionLost);
        }
        match self.replies.lock().pop_front() {
            Some(reply) => Ok(reply),
            None => Ok(String::new()),
        }
    }

    async fn is_connected(&self) -> bool {
        *self.connected.lock()
    }

    async fn close(&mut self) {
        *self.connected.lock() = false;
    }
}

/// Replays whatever was written back as a fake PTY echo, substituting a
/// canned exit status — good enough to exercise sentinel extraction
/// without a real shell on the other end.
struct EchoTransport {
    connected: bool,
    last_written: Option<String>,
}

#[async_trait]
impl Transport for EchoTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        self.connected = true;
        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.last_written = Some(line.to_string());
        Ok(())
    }

    async fn read_until(
        &mut self,
        _deadline: Duration,
        _is_complete: &(dyn for<'a> Fn(&'a str) -> bool + Send + Sync),
    ) -> Result<String, TransportError> {
        // Turn "echo BEGIN; <cmd>; echo END-$?" into a plausible PTY echo
        // by replaying the framed line back with a fixed exit status.
        let written = self.last_written.clone().unwrap_or_default();
        let parts: Vec<&str> = written.splitn(3, "; ").collect();
        if parts.len() < 3 {
            return Ok(String::new());
        }
        let begin_marker = parts[0].trim_start_matches("echo ").to_string();
        let end_part = parts[2];
        let end_marker = end_part
            .trim_start_matches("echo ")
            .trim_end_matches("-$?")
            .to_string();
        Ok(format!("{begin_marker}\nok\n{end_marker}-0\n"))
    }

    async fn is_connected(&self) -> bool {
        self.connected
    }

    async fn close(&mut self) {
        self.connected = false;
    }
}

#[tokio::test]
async fn open_fails_on_empty_hostname() {
    let mut bad = endpoint();
    bad.hostname = "   ".to_string();
    let result = Session::open(bad, EchoTransport { connected: false, last_written: None }).await;
    assert!(matches!(result, Err(SessionError::InvalidHostname(_))));
}

#[tokio::test]
async fn open_retries_until_max_attempts_then_fails() {
    let transport = MockTransport::with_replies(vec![]).fail_connect_times(10);
    let result = Session::open(endpoint(), transport).await;
    assert!(matches!(result, Err(SessionError::LoginFailed { attempts: 5 })));
}

#[tokio::test]
async fn open_succeeds_and_reports_connected_state() {
    let transport = MockTransport::with_replies(vec![]);
    let mut session = Session::open(endpoint(), transport).await.unwrap();
    assert_eq!(session.state().await, SessionState::Connected);
    assert_eq!(session.hostname(), "example.com");
    session.close().await;
}

#[tokio::test]
async fn query_extracts_output_between_sentinels() {
    let transport = EchoTransport { connected: false, last_written: None };
    let mut session = Session::open(endpoint(), transport).await.unwrap();
    let out = session.query("whoami", Duration::from_secs(1), false).await.unwrap();
    assert_eq!(out, "ok");
    session.close().await;
}

#[tokio::test]
async fn query_reconnects_once_on_transport_loss_then_propagates_the_retrys_own_error() {
    let transport = MockTransport::with_replies(vec![]);
    let fail_next_read = Arc::clone(&transport.fail_next_read);
    let mut session = Session::open(endpoint(), transport).await.unwrap();

    // The first read hits a transport loss, driving the reconnect branch.
    // The reconnect itself succeeds, but the retried command finds no
    // scripted reply, so its own `read_until` never sees the sentinels and
    // the command fails with DeadlineExceeded rather than SessionLost.
    *fail_next_read.lock() = true;
    let result = session.query("whoami", Duration::from_secs(1), false).await;
    assert!(matches!(result, Err(SessionError::DeadlineExceeded(_))), "got {result:?}");

    session.close().await;
}

#[tokio::test]
async fn close_is_idempotent() {
    let transport = MockTransport::with_replies(vec![]);
    let mut session = Session::open(endpoint(), transport).await.unwrap();
    session.close().await;
    session.close().await;
    assert_eq!(session.state().await, SessionState::Closed);
}
