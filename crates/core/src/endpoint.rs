// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host endpoints: the immutable description of a machine a [`crate::Clock`]-driven
//! session will be opened against.

use serde::{Deserialize, Serialize};

/// How a session escalates from its login identity to root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscalationPolicy {
    /// The login user is already root; `asRoot` delegates to `query`.
    AlreadyRoot,
    /// Escalate via `su -`.
    Su,
    /// Escalate via `sudo su -` (or `sudo` directly, adapter-defined).
    Sudo,
}

/// Login credential material for a [`HostEndpoint`].
#[derive(Clone, Serialize, Deserialize)]
pub enum LoginSecret {
    Password(String),
    PrivateKey {
        key: String,
        passphrase: Option<String>,
    },
}

impl std::fmt::Debug for LoginSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginSecret::Password(_) => f.debug_tuple("Password").field(&"<redacted>").finish(),
            LoginSecret::PrivateKey { passphrase, .. } => f
                .debug_struct("PrivateKey")
                .field("key", &"<redacted>")
                .field("passphrase", &passphrase.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

/// Everything a [`crate::Clock`]-independent session needs to authenticate
/// against one host and, once connected, become root.
///
/// Built from operator input or a provisioner's response; immutable once a
/// session opens against it (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostEndpoint {
    pub hostname: String,
    pub port: u16,
    pub user: String,
    pub secret: LoginSecret,
    pub escalation: EscalationPolicy,
    /// Password supplied at the `su`/`sudo` challenge. Absent only when
    /// `escalation` is `AlreadyRoot`.
    pub root_secret: Option<String>,
}

impl HostEndpoint {
    pub fn new(hostname: impl Into<String>, user: impl Into<String>, secret: LoginSecret) -> Self {
        Self {
            hostname: hostname.into(),
            port: 22,
            user: user.into(),
            secret,
            escalation: EscalationPolicy::Su,
            root_secret: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_escalation(mut self, policy: EscalationPolicy, root_secret: Option<String>) -> Self {
        self.escalation = policy;
        self.root_secret = root_secret;
        self
    }
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
