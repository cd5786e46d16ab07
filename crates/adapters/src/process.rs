// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The production `Transport`: drives `ssh -tt` as a long-lived child
//! process with piped stdin/stdout, the same shape the codebase's own
//! `TmuxAdapter` uses for driving `tmux` — except this session stays open
//! across calls instead of being invoked fresh per command.

use async_trait::async_trait;
use cloudflock_core::{HostEndpoint, LoginSecret};
use cloudflock_shell::{Transport, TransportError};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, ChildStdout};

/// SSH options applied to every outgoing `ssh`/`scp` invocation (§6).
pub const SSH_OPTIONS: &[&str] = &[
    "-o",
    "UserKnownHostsFile=/dev/null",
    "-o",
    "StrictHostKeyChecking=no",
    "-o",
    "NumberOfPasswordPrompts=1",
    "-o",
    "ConnectTimeout=15",
    "-o",
    "ServerAliveInterval=30",
];

/// Drives one real `ssh -tt` child process. Authentication for password
/// logins is handled by wrapping the invocation in `sshpass`; key-based
/// logins pass the key directly to `ssh -i`.
pub struct ProcessTransport {
    endpoint: HostEndpoint,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<ChildStdout>,
    buffer: String,
}

impl ProcessTransport {
    pub fn new(endpoint: HostEndpoint) -> Self {
        Self {
            endpoint,
            child: None,
            stdin: None,
            stdout: None,
            buffer: String::new(),
        }
    }

    fn build_command(&self) -> tokio::process::Command {
        let target = format!("{}@{}", self.endpoint.user, self.endpoint.hostname);
        let port = self.endpoint.port.to_string();

        let mut cmd = match &self.endpoint.secret {
            LoginSecret::Password(password) => {
                let mut c = tokio::process::Command::new("sshpass");
                c.arg("-p").arg(password).arg("ssh");
                c
            }
            LoginSecret::PrivateKey { .. } => tokio::process::Command::new("ssh"),
        };

        cmd.arg("-tt").arg("-p").arg(&port).args(SSH_OPTIONS);

        if let LoginSecret::PrivateKey { key, .. } = &self.endpoint.secret {
            // The key is written to a temp file by the caller and its path
            // passed as the secret's `key` field in that case; production
            // wiring of that handoff lives in the provisioner/engine layer.
            cmd.arg("-i").arg(key);
        }

        cmd.arg(target);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        cmd
    }
}

#[async_trait]
impl Transport for ProcessTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        let mut cmd = self.build_command();
        let mut child = cmd
            .spawn()
            .map_err(|e| TransportError::SpawnFailed(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::SpawnFailed("no stdin pipe".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::SpawnFailed("no stdout pipe".into()))?;

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout = Some(stdout);
        self.buffer.clear();
        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        let stdin = self.stdin.as_mut().ok_or(TransportError::ConnectionLost)?;
        stdin
            .write_all(format!("{line}\n").as_bytes())
            .await
            .map_err(|_| TransportError::ConnectionLost)?;
        stdin.flush().await.map_err(|_| TransportError::ConnectionLost)
    }

    async fn read_until(
        &mut self,
        deadline: Duration,
        is_complete: &(dyn for<'a> Fn(&'a str) -> bool + Send + Sync),
    ) -> Result<String, TransportError> {
        let start = tokio::time::Instant::now();
        let mut chunk = [0u8; 4096];

        loop {
            if is_complete(&self.buffer) {
                return Ok(std::mem::take(&mut self.buffer));
            }
            let remaining = deadline.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                return Ok(std::mem::take(&mut self.buffer));
            }

            let stdout = self.stdout.as_mut().ok_or(TransportError::ConnectionLost)?;
            match tokio::time::timeout(remaining, stdout.read(&mut chunk)).await {
                Ok(Ok(0)) => return Err(TransportError::ConnectionLost),
                Ok(Ok(n)) => {
                    self.buffer.push_str(&String::from_utf8_lossy(&chunk[..n]));
                }
                Ok(Err(e)) => return Err(TransportError::Io(e.to_string())),
                Err(_elapsed) => return Ok(std::mem::take(&mut self.buffer)),
            }
        }
    }

    async fn is_connected(&self) -> bool {
        self.child.is_some()
    }

    async fn close(&mut self) {
        self.stdin = None;
        self.stdout = None;
        if let Some(mut child) = self.child.take() {
            let _ = child.kill().await;
        }
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
