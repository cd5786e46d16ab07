// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Remote Shell (C1): sentinel-framed command execution over a
//! [`Transport`], with su/sudo elevation, mid-command reconnect, and a
//! background keep-alive.

use crate::sentinel;
use crate::transport::{Transport, TransportError};
use cloudflock_core::{EscalationPolicy, HostEndpoint};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(10);
const MAX_LOGIN_ATTEMPTS: u32 = 5;
const LOGIN_BACKOFF_CAP: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("hostname did not resolve: {0}")]
    InvalidHostname(String),
    #[error("authentication failed after {attempts} attempt(s)")]
    LoginFailed { attempts: u32 },
    #[error("command exceeded its deadline: {0}")]
    DeadlineExceeded(String),
    #[error("session lost and reconnect failed")]
    SessionLost,
    #[error("asRoot did not reach uid 0")]
    NotSuperuser,
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// The session's position in `{Disconnected -> Authenticating -> Connected
/// -> Elevated -> Connected -> Closed}`. A single elevation is sticky
/// until an explicit [`Session::close`] or a cross-privilege command
/// boundary re-drops to `Connected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Authenticating,
    Connected,
    Elevated,
    Closed,
}

struct Inner<T: Transport> {
    transport: T,
    state: SessionState,
}

/// A sentinel-framed command session against one host, generic over the
/// underlying [`Transport`] so production code drives real `ssh` and tests
/// drive a `FakeTransport`.
pub struct Session<T: Transport> {
    inner: Arc<Mutex<Inner<T>>>,
    endpoint: HostEndpoint,
    keepalive: Option<KeepAliveHandle>,
}

struct KeepAliveHandle {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl<T: Transport> Session<T> {
    /// Open the session: connect the transport and authenticate. On
    /// success, starts the background keep-alive and moves to `Connected`.
    pub async fn open(endpoint: HostEndpoint, transport: T) -> Result<Self, SessionError> {
        if endpoint.hostname.trim().is_empty() {
            return Err(SessionError::InvalidHostname(endpoint.hostname.clone()));
        }

        let mut transport = transport;
        let mut attempts = 0u32;
        let mut backoff = Duration::from_millis(500);

        loop {
            attempts += 1;
            match transport.connect().await {
                Ok(()) => break,
                Err(err) if attempts >= MAX_LOGIN_ATTEMPTS => {
                    tracing::warn!(hostname = %endpoint.hostname, attempts, error = %err, "login exhausted");
                    return Err(SessionError::LoginFailed { attempts });
                }
                Err(err) => {
                    tracing::debug!(hostname = %endpoint.hostname, attempts, error = %err, "login attempt failed, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(LOGIN_BACKOFF_CAP);
                }
            }
        }

        let inner = Arc::new(Mutex::new(Inner {
            transport,
            state: SessionState::Connected,
        }));

        let keepalive = spawn_keepalive(Arc::clone(&inner));

        Ok(Self {
            inner,
            endpoint,
            keepalive: Some(keepalive),
        })
    }

    /// The hostname this session was opened against.
    pub fn hostname(&self) -> &str {
        &self.endpoint.hostname
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    /// Execute one command and return its captured stdout+stderr, trimmed.
    /// On transport loss mid-command: reconnect once, then retry; a
    /// second loss fails with [`SessionError::SessionLost`].
    pub async fn query(
        &self,
        command: &str,
        timeout: Duration,
        recoverable: bool,
    ) -> Result<String, SessionError> {
        match self.run_once(command, timeout, recoverable).await {
            Ok(output) => Ok(output),
            Err(SessionError::Transport(TransportError::ConnectionLost)) => {
                tracing::warn!(hostname = %self.endpoint.hostname, "transport lost mid-command, reconnecting");
                self.reconnect().await?;
                self.run_once(command, timeout, recoverable).await.map_err(|err| match err {
                    SessionError::Transport(TransportError::ConnectionLost) => SessionError::SessionLost,
                    other => other,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Run `command` as root. Idempotent with respect to identity: if the
    /// session is already root, delegates straight to [`Session::query`];
    /// otherwise wraps the command in `su -` (or `sudo su -`), supplies
    /// the stored root secret at the password challenge, and returns only
    /// the command's own output with the elevation preamble stripped.
    pub async fn as_root(
        &self,
        command: &str,
        timeout: Duration,
        recoverable: bool,
    ) -> Result<String, SessionError> {
        if matches!(self.endpoint.escalation, EscalationPolicy::AlreadyRoot) {
            return self.query(command, timeout, recoverable).await;
        }

        self.elevate().await?;

        let check = self.query("id -u", timeout, false).await?;
        if check.trim() != "0" {
            return Err(SessionError::NotSuperuser);
        }

        self.query(command, timeout, recoverable).await
    }

    /// Tear the connection down. Idempotent: safe to call more than once.
    pub async fn close(&mut self) {
        if let Some(keepalive) = self.keepalive.take() {
            let _ = keepalive.shutdown.send(());
            keepalive.handle.abort();
        }
        let mut guard = self.inner.lock().await;
        guard.transport.close().await;
        guard.state = SessionState::Closed;
    }

    async fn elevate(&self) -> Result<(), SessionError> {
        let mut guard = self.inner.lock().await;
        if guard.state == SessionState::Elevated {
            return Ok(());
        }

        let elevate_cmd = match self.endpoint.escalation {
            EscalationPolicy::AlreadyRoot => return Ok(()),
            EscalationPolicy::Su => "su -".to_string(),
            EscalationPolicy::Sudo => "sudo su -".to_string(),
        };

        guard.transport.write_line(&elevate_cmd).await?;
        if let Some(ref secret) = self.endpoint.root_secret {
            guard.transport.write_line(secret).await?;
        }
        guard.state = SessionState::Elevated;
        Ok(())
    }

    async fn run_once(
        &self,
        command: &str,
        timeout: Duration,
        recoverable: bool,
    ) -> Result<String, SessionError> {
        let begin = sentinel::generate();
        let end = sentinel::generate();
        let framed = sentinel::frame(command, &begin, &end);

        let mut guard = self.inner.lock().await;
        guard.transport.write_line(&framed).await?;

        let read = guard
            .transport
            .read_until(timeout, &|buf| sentinel::extract(buf, &begin, &end).is_some())
            .await;

        match read {
            Ok(buffer) => match sentinel::extract(&buffer, &begin, &end) {
                Some((output, _status)) => Ok(output),
                None if recoverable => Ok(buffer.trim().to_string()),
                None => Err(SessionError::DeadlineExceeded(command.to_string())),
            },
            Err(TransportError::ConnectionLost) => Err(SessionError::Transport(TransportError::ConnectionLost)),
            Err(err) => Err(SessionError::Transport(err)),
        }
    }

    async fn reconnect(&self) -> Result<(), SessionError> {
        let mut guard = self.inner.lock().await;
        guard.transport.close().await;
        guard
            .transport
            .connect()
            .await
            .map_err(|_| SessionError::SessionLost)?;
        guard.state = SessionState::Connected;
        Ok(())
    }
}

/// Background task that pings the transport roughly every 10 seconds to
/// keep an idle session alive. Cancelled via the returned shutdown sender
/// (or implicitly, by aborting its `JoinHandle`) when the session closes.
fn spawn_keepalive<T: Transport>(inner: Arc<Mutex<Inner<T>>>) -> KeepAliveHandle {
    let (shutdown, mut shutdown_rx) = oneshot::channel();

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(KEEPALIVE_INTERVAL);
        interval.tick().await; // first tick fires immediately; skip it
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let mut guard = inner.lock().await;
                    if guard.state == SessionState::Closed {
                        return;
                    }
                    let _ = guard.transport.write_line("").await;
                }
                _ = &mut shutdown_rx => return,
            }
        }
    });

    KeepAliveHandle { shutdown, handle }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
