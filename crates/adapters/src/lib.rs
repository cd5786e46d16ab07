// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cloudflock-adapters: concrete `Transport` implementations — the
//! production `ssh -tt` subprocess adapter, a tracing wrapper, and (gated
//! behind `test-support`) fakes for the rest of the workspace's tests.

pub mod noop;
pub mod process;
pub mod traced;

pub use noop::NoopTransport;
pub use process::{ProcessTransport, SSH_OPTIONS};
pub use traced::TracedTransport;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTransport, TransportCall};

#[cfg(any(test, feature = "test-support"))]
pub mod scripted;
#[cfg(any(test, feature = "test-support"))]
pub use scripted::ScriptedTransport;
