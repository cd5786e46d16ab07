// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{apply_between_pass_edit, select_target_address};
use cloudflock_adapters::ScriptedTransport;
use cloudflock_core::{EscalationPolicy, HostEndpoint, LoginSecret};
use cloudflock_shell::Session;

fn endpoint(host: &str) -> HostEndpoint {
    HostEndpoint::new(host, "root", LoginSecret::Password("x".into()))
        .with_escalation(EscalationPolicy::AlreadyRoot, None)
}

#[test]
fn between_pass_edit_removes_every_occurrence_of_var_log() {
    let before = "/var/log\n/proc\n/tmp";
    let after = apply_between_pass_edit(before);
    assert_eq!(after, "\n/proc\n/tmp");
}

#[test]
fn between_pass_edit_strips_var_log_mid_line_too() {
    assert_eq!(apply_between_pass_edit("/srv/var/log/app"), "/srv/app");
}

#[tokio::test]
async fn target_address_selection_picks_the_address_with_a_matching_fingerprint() {
    // S4: destination reports fingerprint X on its host key; source sees
    // that same fingerprint only when probing 10.0.0.5.
    let dest_transport = ScriptedTransport::new();
    dest_transport.on("ssh-keygen -l -f /etc/ssh/ssh_host_rsa_key.pub", "2048 SHA256:XXXX root@dest (RSA)");
    dest_transport.on(
        "ifconfig -a",
        "eth0: flags=4163\n        inet 10.0.0.5  netmask 255.255.255.0\neth1: flags=4163\n        inet 192.0.2.7  netmask 255.255.255.0",
    );
    let destination = Session::open(endpoint("dest.example.com"), dest_transport).await.unwrap();

    let src_transport = ScriptedTransport::new();
    src_transport.on("10.0.0.5", "2048 SHA256:XXXX root@dest (RSA)");
    src_transport.on("192.0.2.7", "2048 SHA256:YYYY someoneelse (RSA)");
    let source = Session::open(endpoint("source.example.com"), src_transport).await.unwrap();

    let target = select_target_address(&source, &destination).await.unwrap();
    assert_eq!(target, "10.0.0.5");
}

#[tokio::test]
async fn target_address_selection_ignores_netmask_tokens_that_look_like_addresses() {
    // The netmask 255.255.255.255 sorts after the real address in the
    // ifconfig output and also happens to probe back a matching
    // fingerprint here; if netmask/broadcast tokens were extracted as
    // candidate addresses alongside `inet`-labeled ones, the loop's
    // last-match-wins rule would incorrectly pick it over the real address.
    let dest_transport = ScriptedTransport::new();
    dest_transport.on("ssh-keygen -l -f /etc/ssh/ssh_host_rsa_key.pub", "2048 SHA256:XXXX root@dest (RSA)");
    dest_transport.on(
        "ifconfig -a",
        "eth0: flags=4163\n        inet 10.0.0.5  netmask 255.255.255.255  broadcast 10.0.0.255",
    );
    let destination = Session::open(endpoint("dest.example.com"), dest_transport).await.unwrap();

    let src_transport = ScriptedTransport::new();
    src_transport.on("10.0.0.5", "2048 SHA256:XXXX root@dest (RSA)");
    src_transport.on("255.255.255.255", "2048 SHA256:XXXX root@dest (RSA)");
    let source = Session::open(endpoint("source.example.com"), src_transport).await.unwrap();

    let target = select_target_address(&source, &destination).await.unwrap();
    assert_eq!(target, "10.0.0.5");
}

#[tokio::test]
async fn target_address_selection_falls_back_to_hostname_when_nothing_matches() {
    let dest_transport = ScriptedTransport::new();
    dest_transport.on("ssh-keygen -l -f /etc/ssh/ssh_host_rsa_key.pub", "2048 SHA256:XXXX root@dest (RSA)");
    dest_transport.on("ifconfig -a", "eth0: flags=4163\n        inet 10.0.0.5  netmask 255.255.255.0");
    let destination = Session::open(endpoint("dest.example.com"), dest_transport).await.unwrap();

    let src_transport = ScriptedTransport::new();
    // no scripted reply for 10.0.0.5 -> empty output -> no fingerprint match
    let source = Session::open(endpoint("source.example.com"), src_transport).await.unwrap();

    let target = select_target_address(&source, &destination).await.unwrap();
    assert_eq!(target, "dest.example.com");
}
