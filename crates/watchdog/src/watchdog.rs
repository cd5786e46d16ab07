// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The generic poll-transform-alarm loop, grounded on the periodic
//! `tokio::time::interval` background task the usage metrics collector
//! spawns for itself.

use cloudflock_shell::{Session, Transport};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

type Predicate = Arc<dyn Fn(f64) -> bool + Send + Sync>;
type Reaction = Arc<dyn Fn() + Send + Sync>;
type Transform = Arc<dyn Fn(&str) -> f64 + Send + Sync>;

pub struct Alarm {
    name: String,
    predicate: Predicate,
    reaction: Option<Reaction>,
}

struct Shared {
    alarms: Vec<Alarm>,
    triggered: Vec<String>,
}

/// A periodic poll over a [`Session`]: every `interval`, issue `command`,
/// reduce its output to a scalar with `transform`, and invoke the
/// reaction of every alarm whose predicate trips on that scalar.
pub struct Watchdog<T: Transport> {
    session: Option<Arc<Session<T>>>,
    command: String,
    interval: Duration,
    shared: Arc<Mutex<Shared>>,
    task: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl<T: Transport> Watchdog<T> {
    /// Build a watchdog and start its polling task. `name` labels the
    /// tracing spans emitted for each poll cycle.
    pub fn create(
        name: impl Into<String>,
        session: Arc<Session<T>>,
        command: impl Into<String>,
        interval: Duration,
        transform: impl Fn(&str) -> f64 + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let command = command.into();
        let transform: Transform = Arc::new(transform);
        let shared = Arc::new(Mutex::new(Shared { alarms: Vec::new(), triggered: Vec::new() }));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let poll_session = Arc::clone(&session);
        let poll_shared = Arc::clone(&shared);
        let poll_command = command.clone();
        let poll_transform = Arc::clone(&transform);
        let poll_name = name.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately; skip it
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        poll_once(&poll_name, &poll_session, &poll_command, &poll_transform, &poll_shared).await;
                    }
                }
            }
        });

        Self {
            session: Some(session),
            command,
            interval,
            shared,
            task: Some(task),
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn add_alarm(&self, name: impl Into<String>, predicate: impl Fn(f64) -> bool + Send + Sync + 'static) {
        self.shared.lock().alarms.push(Alarm {
            name: name.into(),
            predicate: Arc::new(predicate),
            reaction: None,
        });
    }

    /// Register the reaction run inline whenever `name`'s predicate trips.
    /// A no-op if no alarm with that name was registered.
    pub fn on_alarm(&self, name: &str, reaction: impl Fn() + Send + Sync + 'static) {
        let mut shared = self.shared.lock();
        if let Some(alarm) = shared.alarms.iter_mut().find(|a| a.name == name) {
            alarm.reaction = Some(Arc::new(reaction));
        }
    }

    /// Names of alarms whose predicate tripped on the most recent poll.
    pub fn triggered(&self) -> Vec<String> {
        self.shared.lock().triggered.clone()
    }

    /// Stop the polling task and drop the session reference, without
    /// closing the session itself. Calling this more than once is a
    /// no-op after the first call.
    pub fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.session = None;
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl<T: Transport> Drop for Watchdog<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_once<T: Transport>(
    name: &str,
    session: &Session<T>,
    command: &str,
    transform: &Transform,
    shared: &Mutex<Shared>,
) {
    let output = match session.query(command, Duration::from_secs(30), true).await {
        Ok(output) => output,
        Err(err) => {
            tracing::warn!(watchdog = name, error = %err, "watchdog poll failed");
            return;
        }
    };

    let state = transform(&output);
    tracing::debug!(watchdog = name, state, "watchdog poll");

    let mut shared = shared.lock();
    let mut triggered = Vec::new();
    for alarm in &shared.alarms {
        if (alarm.predicate)(state) {
            triggered.push(alarm.name.clone());
            if let Some(reaction) = &alarm.reaction {
                reaction();
            }
        }
    }
    shared.triggered = triggered;
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
