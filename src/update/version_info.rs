//! Release candidates offered by a registry
//!
//! A [`ReleaseCandidate`] is a published version with its (optional)
//! release date.

use crate::domain::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A published version that could be updated to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseCandidate {
    pub version: Version,
    /// Publication time, when the registry reports one
    #[serde(default)]
    pub released_at: Option<DateTime<Utc>>,
}

impl ReleaseCandidate {
    /// Create a candidate with a known release date
    pub fn new(version: Version, released_at: DateTime<Utc>) -> Self {
        Self {
            version,
            released_at: Some(released_at),
        }
    }

    /// Create a candidate whose release date is unknown
    pub fn undated(version: Version) -> Self {
        Self {
            version,
            released_at: None,
        }
    }
}

/// Ordered by version; equal versions fall back to the release date
impl Ord for ReleaseCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.released_at.cmp(&other.released_at))
    }
}

impl PartialOrd for ReleaseCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
