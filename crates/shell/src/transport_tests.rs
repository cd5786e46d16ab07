// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::TransportError;

#[test]
fn login_failed_reports_attempt_count() {
    let err = TransportError::LoginFailed { attempts: 5 };
    assert_eq!(err.to_string(), "authentication failed after 5 attempt(s)");
}

#[test]
fn invalid_hostname_includes_the_hostname() {
    let err = TransportError::InvalidHostname("no-such-host.invalid".into());
    assert!(err.to_string().contains("no-such-host.invalid"));
}
