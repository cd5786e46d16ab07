// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A transport that answers `Session::query`/`as_root` calls by matching
//! the command text against a script of substring -> canned output pairs,
//! without the caller needing to know the sentinel markers `Session`
//! generates per call. Used by the profiler/policy/watchdog/engine
//! crates' tests, which care about command routing, not PTY framing.

use async_trait::async_trait;
use cloudflock_shell::{Transport, TransportError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct ScriptedState {
    connected: bool,
    script: Vec<(String, String)>,
    last_written: Option<String>,
    commands_seen: Vec<String>,
}

/// Matches each written sentinel frame against the scripted
/// substring->output pairs (first match wins) and echoes back a
/// sentinel-bracketed response built from that output, exit status 0.
#[derive(Clone)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<ScriptedState>>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScriptedState {
                connected: false,
                script: Vec::new(),
                last_written: None,
                commands_seen: Vec::new(),
            })),
        }
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to any command containing `needle` with `output`. Scripted
    /// in order; first match for a given command wins.
    pub fn on(&self, needle: impl Into<String>, output: impl Into<String>) -> &Self {
        self.inner.lock().script.push((needle.into(), output.into()));
        self
    }

    pub fn commands_seen(&self) -> Vec<String> {
        self.inner.lock().commands_seen.clone()
    }
}

fn extract_markers(written: &str) -> Option<(String, String)> {
    let begin = written.strip_prefix("echo ")?.split(';').next()?.trim().to_string();
    let end_part = written.rsplit("echo ").next()?;
    let end = end_part.trim_end_matches("-$?").trim().to_string();
    Some((begin, end))
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        self.inner.lock().connected = true;
        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        let mut state = self.inner.lock();
        if !state.connected {
            return Err(TransportError::ConnectionLost);
        }
        state.commands_seen.push(line.to_string());
        state.last_written = Some(line.to_string());
        Ok(())
    }

    async fn read_until(
        &mut self,
        _deadline: Duration,
        _is_complete: &(dyn for<'a> Fn(&'a str) -> bool + Send + Sync),
    ) -> Result<String, TransportError> {
        let state = self.inner.lock();
        let written = state.last_written.clone().unwrap_or_default();
        let Some((begin, end)) = extract_markers(&written) else {
            return Ok(String::new());
        };
        let output = state
            .script
            .iter()
            .find(|(needle, _)| written.contains(needle.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default();

        Ok(format!("{begin}\n{output}\n{end}-0\n"))
    }

    async fn is_connected(&self) -> bool {
        self.inner.lock().connected
    }

    async fn close(&mut self) {
        self.inner.lock().connected = false;
    }
}

#[cfg(test)]
#[path = "scripted_tests.rs"]
mod tests;
