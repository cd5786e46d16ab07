// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::ScriptedTransport;
use cloudflock_core::{EscalationPolicy, HostEndpoint, LoginSecret};
use cloudflock_shell::Session;
use std::time::Duration;

fn endpoint() -> HostEndpoint {
    HostEndpoint::new("example.com", "root", LoginSecret::Password("x".into()))
        .with_escalation(EscalationPolicy::AlreadyRoot, None)
}

#[tokio::test]
async fn query_returns_the_scripted_output_for_a_matching_command() {
    let transport = ScriptedTransport::new();
    transport.on("uname -r", "5.15.0-generic");

    let mut session = Session::open(endpoint(), transport).await.unwrap();
    let out = session.query("uname -r", Duration::from_secs(1), false).await.unwrap();
    assert_eq!(out, "5.15.0-generic");
    session.close().await;
}

#[tokio::test]
async fn unscripted_commands_return_empty_output() {
    let transport = ScriptedTransport::new();
    let mut session = Session::open(endpoint(), transport).await.unwrap();
    let out = session.query("whoami", Duration::from_secs(1), false).await.unwrap();
    assert_eq!(out, "");
    session.close().await;
}

#[tokio::test]
async fn commands_seen_records_every_framed_write() {
    let transport = ScriptedTransport::new();
    let mut session = Session::open(endpoint(), transport.clone()).await.unwrap();
    session.query("echo hi", Duration::from_secs(1), false).await.unwrap();
    session.close().await;

    assert_eq!(transport.commands_seen().len(), 1);
    assert!(transport.commands_seen()[0].contains("echo hi"));
}
