// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CPE (Common Platform Enumeration) identifiers and the vendor/version key
//! derived from them.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A structured platform identifier: `(part, vendor, product, version)`.
///
/// Versions are normalized to `[0-9.]+` by every constructor on this type;
/// an empty vendor is a valid (if degenerate) CPE and should be treated as
/// "platform not resolved" by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpe {
    pub part: String,
    pub vendor: String,
    pub product: String,
    pub version: String,
}

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
fn version_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9.]+").expect("constant regex pattern is valid"))
}

/// Normalize a raw version string to its longest `[0-9.]+` run, or the
/// empty string if none is present.
pub fn normalize_version(raw: &str) -> String {
    version_pattern()
        .find_iter(raw)
        .max_by_key(|m| m.len())
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

impl Cpe {
    pub fn new(
        part: impl Into<String>,
        vendor: impl Into<String>,
        product: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            part: part.into(),
            vendor: vendor.into().to_lowercase(),
            product: product.into().to_lowercase(),
            version: normalize_version(&version.into()),
        }
    }

    /// Parse the CPE 2.2 URI form, e.g. `cpe:/o:centos:centos:7`. Falls
    /// back to an empty CPE if the string doesn't look like a CPE URI at
    /// all (no `cpe:/` prefix) — callers treat that as "try the next
    /// fallback" per the profiler's CPE derivation strategy.
    pub fn parse_uri(raw: &str) -> Option<Self> {
        let body = raw.trim().strip_prefix("cpe:/")?;
        let mut parts = body.split(':');
        let part = parts.next().unwrap_or_default().to_string();
        let vendor = parts.next().unwrap_or_default().to_string();
        let product = parts.next().unwrap_or_default().to_string();
        let version = parts.next().unwrap_or_default().to_string();
        Some(Cpe::new(part, vendor, product, version))
    }

    pub fn is_unresolved(&self) -> bool {
        self.vendor.is_empty()
    }

    pub fn platform_key(&self) -> PlatformKey {
        PlatformKey {
            vendor: self.vendor.clone(),
            version: if self.version.is_empty() {
                PlatformKey::WILDCARD.to_string()
            } else {
                self.version.clone()
            },
        }
    }
}

/// `(vendor, version)` derived from a [`Cpe`]: lowercase vendor, version
/// either exact or the wildcard `"*"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformKey {
    pub vendor: String,
    pub version: String,
}

impl PlatformKey {
    pub const WILDCARD: &'static str = "*";

    pub fn new(vendor: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into().to_lowercase(),
            version: version.into(),
        }
    }

    pub fn wildcard(vendor: impl Into<String>) -> Self {
        Self::new(vendor, Self::WILDCARD)
    }
}

#[cfg(test)]
#[path = "cpe_tests.rs"]
mod tests;
