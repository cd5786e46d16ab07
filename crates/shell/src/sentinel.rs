// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sentinel framing: the query protocol prints a unique marker before and
//! after a command's output so the output can be extracted unambiguously
//! from the PTY stream.

use rand::Rng;

const SENTINEL_LEN: usize = 24;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a fresh alphanumeric, escape-safe marker. Never reused within
/// a process: each call draws new randomness, so two commands in flight
/// (e.g. across reconnect) can never be confused for one another.
pub fn generate() -> String {
    let mut rng = rand::rng();
    (0..SENTINEL_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

/// Commands containing line terminators must be normalized to spaces
/// before being sent, so a multi-line command can't be mistaken for
/// multiple PTY lines by the framing scanner.
pub fn normalize_command(command: &str) -> String {
    command.replace(['\r', '\n'], " ")
}

/// Wrap a command so its output is bracketed by `begin`/`end` markers and
/// its exit status is captured. `begin`/`end` must each have come from
/// [`generate`].
pub fn frame(command: &str, begin: &str, end: &str) -> String {
    let normalized = normalize_command(command);
    format!("echo {begin}; {normalized}; echo {end}-$?")
}

/// Extract the output between `begin` and an `end-<status>` marker from an
/// accumulated PTY buffer. Returns `(output, exit_status)` once both
/// markers are present, `None` otherwise (framing still incomplete).
pub fn extract(buffer: &str, begin: &str, end: &str) -> Option<(String, i32)> {
    let start = buffer.find(begin)? + begin.len();
    let after_begin = &buffer[start..];
    let end_marker = format!("{end}-");
    let end_pos = after_begin.find(&end_marker)?;
    let output = after_begin[..end_pos].trim_matches(['\r', '\n']).to_string();

    let rest = &after_begin[end_pos + end_marker.len()..];
    let status_str: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let status = status_str.parse().ok()?;

    Some((output, status))
}

#[cfg(test)]
#[path = "sentinel_tests.rs"]
mod tests;
