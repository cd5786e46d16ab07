// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{build_replacement_pairs, run};
use cloudflock_adapters::ScriptedTransport;
use cloudflock_core::{Cpe, EscalationPolicy, HostEndpoint, LoginSecret, Profile};
use cloudflock_shell::Session;

fn profile_with(public: &[&str], private: &[&str]) -> Profile {
    let mut profile = Profile::new(Cpe::default());
    let section = profile.section("Network");
    for ip in public {
        section.push("public_ip", *ip);
    }
    for ip in private {
        section.push("private_ip", *ip);
    }
    profile
}

#[test]
fn prefers_a_destination_address_with_matching_rfc1918ness() {
    let source = profile_with(&["203.0.113.9"], &["10.0.0.5"]);
    let destination = profile_with(&["198.51.100.2"], &["172.16.0.9"]);

    let pairs = build_replacement_pairs(&source, &destination);
    assert_eq!(pairs, vec![
        ("203.0.113.9".to_string(), "198.51.100.2".to_string()),
        ("10.0.0.5".to_string(), "172.16.0.9".to_string()),
    ]);
}

#[test]
fn falls_back_to_the_first_destination_address_when_no_class_matches() {
    let source = profile_with(&[], &["10.0.0.5"]);
    let destination = profile_with(&["198.51.100.2"], &[]);

    let pairs = build_replacement_pairs(&source, &destination);
    assert_eq!(pairs, vec![("10.0.0.5".to_string(), "198.51.100.2".to_string())]);
}

#[test]
fn every_replacement_is_drawn_from_the_destination_profile() {
    // Invariant 7: remediation never proposes an IP absent from the
    // destination's profiled address set.
    let source = profile_with(&["203.0.113.9", "203.0.113.10"], &["10.0.0.5"]);
    let destination = profile_with(&["198.51.100.2"], &["172.16.0.9"]);
    let dest_addrs: Vec<String> = {
        let mut v = destination.get_section("Network").unwrap().entries.iter().map(|e| e.value.clone()).collect::<Vec<_>>();
        v.sort();
        v
    };

    for (_, replacement) in build_replacement_pairs(&source, &destination) {
        assert!(dest_addrs.contains(&replacement));
    }
}

#[tokio::test]
async fn run_issues_a_sed_command_per_pair_per_target_dir() {
    let transport = ScriptedTransport::new();
    let destination = Session::open(
        HostEndpoint::new("dest.example.com", "root", LoginSecret::Password("x".into()))
            .with_escalation(EscalationPolicy::AlreadyRoot, None),
        transport.clone(),
    )
    .await
    .unwrap();

    let pairs = vec![("203.0.113.9".to_string(), "198.51.100.2".to_string())];
    run(&destination, &pairs, &[]).await;

    let commands = transport.commands_seen();
    assert!(commands.iter().any(|c| c.contains("203.0.113.9") && c.contains("198.51.100.2") && c.contains("/etc")));
}
