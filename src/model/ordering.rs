//! Artifact ordering policy
//!
//! Controls which analysis sections of a document are shown publicly and in
//! what order. The policy is plain configuration: it is loaded from the YAML
//! config file (or defaults) and handed to the query operations, it is never
//! persisted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::DocumentArtifact;

pub const DEFAULT_POLICY_VERSION: u32 = 1;

/// Canonical section titles, in display order.
pub const DEFAULT_SECTIONS: [&str; 7] = [
    "ELI5",
    "Key Points",
    "Areas of Concern",
    "Constitutional Considerations",
    "Take Action",
    "Letter of Concern",
    "Final Summary",
];

/// What happens to artifacts whose title is not one of the policy sections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlistedArtifacts {
    /// Left out of the returned view (still stored)
    #[default]
    Omit,
    /// Placed after the listed sections, in store order
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactOrderingPolicy {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
    #[serde(default)]
    pub unlisted: UnlistedArtifacts,
}

fn default_version() -> u32 {
    DEFAULT_POLICY_VERSION
}

fn default_sections() -> Vec<String> {
    DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for ArtifactOrderingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLICY_VERSION, DEFAULT_SECTIONS)
    }
}

impl ArtifactOrderingPolicy {
    pub fn new<I, S>(version: u32, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version,
            sections: sections.into_iter().map(Into::into).collect(),
            unlisted: UnlistedArtifacts::Omit,
        }
    }

    #[cfg(test)]
    pub fn with_unlisted(mut self, unlisted: UnlistedArtifacts) -> Self {
        self.unlisted = unlisted;
        self
    }

    /// Exact, case-sensitive membership test
    pub fn contains(&self, title: &str) -> bool {
        self.sections.iter().any(|s| s == title)
    }

    /// Arrange `artifacts` for display.
    ///
    /// `artifacts` must be in store order (id ascending). Each section takes
    /// at most one artifact, the first whose title matches exactly; sections
    /// without a match are skipped. A section listed twice is only filled once.
    pub fn apply(&self, artifacts: Vec<DocumentArtifact>) -> Vec<DocumentArtifact> {
        let mut remaining: Vec<Option<DocumentArtifact>> =
            artifacts.into_iter().map(Some).collect();
        let mut ordered = Vec::with_capacity(remaining.len());
        let mut filled: HashSet<&str> = HashSet::new();

        for section in &self.sections {
            if !filled.insert(section.as_str()) {
                continue;
            }
            let slot = remaining
                .iter_mut()
                .find(|slot| matches!(slot, Some(a) if a.title == *section));
            if let Some(slot) = slot {
                ordered.extend(slot.take());
            }
        }

        if self.unlisted == UnlistedArtifacts::Append {
            ordered.extend(
                remaining
                    .into_iter()
                    .flatten()
                    .filter(|a| !self.contains(&a.title)),
            );
        }

        ordered
    }
}
