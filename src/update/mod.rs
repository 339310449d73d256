//! Version candidate selection
//!
//! This module provides:
//! - Cooldown options (per-bump waiting periods, include/exclude lists)
//! - Release candidates with optional release dates
//! - The candidate filter that applies ignore requirements and the cooldown

mod cooldown;
mod version_info;

pub use cooldown::CooldownOptions;
pub use version_info::ReleaseCandidate;

use crate::domain::{Requirement, Version};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Picks the best admissible version out of a list of release candidates
pub struct VersionCandidateFilter {
    /// Requirements whose matching versions are never offered
    ignored: Vec<Requirement>,
    /// Cooldown configuration, if any
    cooldown: Option<CooldownOptions>,
    /// Current time for age calculations
    now: DateTime<Utc>,
}

impl VersionCandidateFilter {
    /// Create a filter with no ignores and no cooldown
    pub fn new() -> Self {
        Self {
            ignored: Vec::new(),
            cooldown: None,
            now: Utc::now(),
        }
    }

    /// Create a filter with a custom current time (for testing)
    pub fn with_time(now: DateTime<Utc>) -> Self {
        Self {
            now,
            ..Self::new()
        }
    }

    /// Set the ignored version requirements
    pub fn with_ignored_versions(mut self, ignored: Vec<Requirement>) -> Self {
        self.ignored = ignored;
        self
    }

    /// Set the cooldown
    pub fn with_cooldown(mut self, cooldown: Option<CooldownOptions>) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Whether a version matches one of the ignore requirements
    pub fn is_ignored(&self, version: &Version) -> bool {
        self.ignored.iter().any(|r| r.satisfied_by(version))
    }

    /// Whether a candidate is still inside its cooldown window
    pub fn in_cooldown(&self, candidate: &ReleaseCandidate, installed: Option<&Version>) -> bool {
        let Some(cooldown) = self.cooldown.as_ref().filter(|c| c.is_enabled()) else {
            return false;
        };
        let Some(released_at) = candidate.released_at else {
            return false;
        };

        let bump = installed.map(|current| candidate.version.bump_from(current));
        let days = cooldown.days_for(bump);
        self.now.signed_duration_since(released_at) < Duration::days(i64::from(days))
    }

    /// Select the highest candidate that is neither ignored nor cooling down
    pub fn select<'a>(
        &self,
        candidates: &'a [ReleaseCandidate],
        installed: Option<&Version>,
    ) -> Option<&'a ReleaseCandidate> {
        let mut remaining: Vec<&ReleaseCandidate> = candidates
            .iter()
            .filter(|c| !self.is_ignored(&c.version))
            .collect();
        remaining.sort_by(|a, b| b.cmp(a));

        remaining.into_iter().find(|candidate| {
            let cooling = self.in_cooldown(candidate, installed);
            if cooling {
                debug!("skipping {} (in cooldown)", candidate.version);
            }
            !cooling
        })
    }
}

impl Default for VersionCandidateFilter {
    fn default() -> Self {
        Self::new()
    }
}
