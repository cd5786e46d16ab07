// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The profiler's output: a deterministic, section-structured snapshot of a
//! host plus whatever warnings were raised while collecting it.

use crate::cpe::Cpe;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single `name -> value` datum within a [`Section`]. Absent data is
/// represented by an empty `value`, never by omitting the entry (§3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub value: String,
}

impl Entry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An ordered group of [`Entry`] values, e.g. "Memory" or "Network".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.push(Entry::new(name, value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }
}

/// A full host profile: the companion CPE, an ordered list of sections, and
/// the warnings accumulated while probing.
///
/// Building is deterministic given identical probe outputs (§3, §8-invariant-3):
/// the profiler never reorders sections/entries and always emits every
/// entry the probe table names, even when the underlying command failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub cpe: Cpe,
    pub sections: Vec<Section>,
    pub warnings: Vec<String>,
}

impl Profile {
    pub fn new(cpe: Cpe) -> Self {
        Self {
            cpe,
            sections: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn section(&mut self, name: &str) -> &mut Section {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn get_section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Pull numeric-ish values out of the profile without the caller
    /// knowing the section layout: `sectionPattern`/`namePattern` are
    /// regexes matched against section and entry names respectively.
    pub fn select_entries(&self, section_pattern: &str, name_pattern: &str) -> Vec<String> {
        let section_re = match Regex::new(section_pattern) {
            Ok(re) => re,
            Err(_) => return Vec::new(),
        };
        let name_re = match Regex::new(name_pattern) {
            Ok(re) => re,
            Err(_) => return Vec::new(),
        };

        self.sections
            .iter()
            .filter(|s| section_re.is_match(&s.name))
            .flat_map(|s| s.entries.iter())
            .filter(|e| name_re.is_match(&e.name))
            .map(|e| e.value.clone())
            .collect()
    }

    /// Convenience over [`Profile::select_entries`] for the common case of
    /// a single numeric field, e.g. pulling `Memory`/`total_mib`.
    pub fn select_entry_f64(&self, section_pattern: &str, name_pattern: &str) -> Option<f64> {
        self.select_entries(section_pattern, name_pattern)
            .into_iter()
            .find_map(|v| v.parse::<f64>().ok())
    }
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
