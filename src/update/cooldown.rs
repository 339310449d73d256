//! Release cooldown configuration
//!
//! A cooldown holds back versions that were published too recently. The
//! waiting period can differ per semver bump and can be limited to a subset
//! of dependencies through include/exclude wildcards.

use crate::domain::pattern::NamePatterns;
use crate::domain::VersionBump;
use serde::{Deserialize, Serialize};

/// Cooldown configuration for version (non-security) updates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CooldownOptions {
    /// Days used when no tier-specific value applies
    pub default_days: u32,
    pub semver_major_days: u32,
    pub semver_minor_days: u32,
    pub semver_patch_days: u32,
    /// Dependency-name wildcards the cooldown applies to (empty = all)
    pub include: Vec<String>,
    /// Dependency-name wildcards exempt from the cooldown
    pub exclude: Vec<String>,
}

impl CooldownOptions {
    /// Create options with only a default period
    pub fn new(default_days: u32) -> Self {
        Self {
            default_days,
            ..Self::default()
        }
    }

    /// Set the major-bump period
    pub fn with_major_days(mut self, days: u32) -> Self {
        self.semver_major_days = days;
        self
    }

    /// Set the minor-bump period
    pub fn with_minor_days(mut self, days: u32) -> Self {
        self.semver_minor_days = days;
        self
    }

    /// Set the patch-bump period
    pub fn with_patch_days(mut self, days: u32) -> Self {
        self.semver_patch_days = days;
        self
    }

    /// Set the include wildcards
    pub fn with_include(mut self, include: Vec<String>) -> Self {
        self.include = include;
        self
    }

    /// Set the exclude wildcards
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// A cooldown with every period at zero does nothing
    pub fn is_enabled(&self) -> bool {
        self.default_days > 0
            || self.semver_major_days > 0
            || self.semver_minor_days > 0
            || self.semver_patch_days > 0
    }

    /// Whether the cooldown covers this dependency. Exclusion wins.
    pub fn applies_to(&self, dependency_name: &str) -> bool {
        if NamePatterns::new(&self.exclude).is_match(dependency_name) {
            return false;
        }
        let include = NamePatterns::new(&self.include);
        include.is_empty() || include.is_match(dependency_name)
    }

    /// Waiting period for a bump; `None` means the installed version is unknown
    pub fn days_for(&self, bump: Option<VersionBump>) -> u32 {
        let tier = match bump {
            Some(VersionBump::Major) => self.semver_major_days,
            Some(VersionBump::Minor) => self.semver_minor_days,
            Some(VersionBump::Patch) => self.semver_patch_days,
            None => 0,
        };
        if tier > 0 {
            tier
        } else {
            self.default_days
        }
    }
}
