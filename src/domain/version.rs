//! Ecosystem version numbers
//!
//! NuGet, pip and Terraform all publish versions that are "almost semver":
//! one to four numeric segments, an optional `v` prefix, and optional
//! pre-release and build suffixes. [`Version`] parses them leniently and
//! orders them with semver pre-release precedence.

use crate::error::VersionError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A parsed version that keeps its original spelling for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    raw: String,
    semver: semver::Version,
    /// Fourth numeric segment (NuGet revision), zero when absent
    revision: u64,
}

/// Which semver component changed between two versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl Version {
    /// Parse a version string
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let raw = input.trim();
        let body = raw
            .strip_prefix('v')
            .or_else(|| raw.strip_prefix('V'))
            .unwrap_or(raw);

        let (body, build) = match body.split_once('+') {
            Some((b, meta)) => (b, Some(meta)),
            None => (body, None),
        };
        let (numbers, pre) = match body.split_once('-') {
            Some((n, p)) => (n, Some(p)),
            None => (body, None),
        };

        let segments: Vec<&str> = numbers.split('.').collect();
        if segments.is_empty() || segments.len() > 4 {
            return Err(VersionError::invalid_version(raw));
        }
        let mut parts = [0u64; 4];
        for (slot, segment) in parts.iter_mut().zip(&segments) {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::invalid_version(raw));
            }
            *slot = segment
                .parse()
                .map_err(|_| VersionError::invalid_version(raw))?;
        }

        let mut semver = semver::Version::new(parts[0], parts[1], parts[2]);
        if let Some(pre) = pre {
            semver.pre =
                semver::Prerelease::new(pre).map_err(|_| VersionError::invalid_version(raw))?;
            if semver.pre.is_empty() {
                return Err(VersionError::invalid_version(raw));
            }
        }
        if let Some(build) = build {
            semver.build = semver::BuildMetadata::new(build)
                .map_err(|_| VersionError::invalid_version(raw))?;
        }

        Ok(Self {
            raw: raw.to_string(),
            semver,
            revision: parts[3],
        })
    }

    /// The version as originally written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn major(&self) -> u64 {
        self.semver.major
    }

    pub fn minor(&self) -> u64 {
        self.semver.minor
    }

    pub fn patch(&self) -> u64 {
        self.semver.patch
    }

    /// Whether this is a pre-release (alpha, beta, rc, ...)
    pub fn is_prerelease(&self) -> bool {
        !self.semver.pre.is_empty()
    }

    /// Classify the change from `installed` to `self`.
    ///
    /// Anything below the minor component (patch, revision, pre-release)
    /// counts as a patch bump.
    pub fn bump_from(&self, installed: &Version) -> VersionBump {
        if self.major() != installed.major() {
            VersionBump::Major
        } else if self.minor() != installed.minor() {
            VersionBump::Minor
        } else {
            VersionBump::Patch
        }
    }

    fn precedence(&self) -> (u64, u64, u64, u64) {
        (self.major(), self.minor(), self.patch(), self.revision)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Build metadata never participates in precedence
        self.precedence()
            .cmp(&other.precedence())
            .then_with(|| self.semver.pre.cmp(&other.semver.pre))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.precedence().hash(state);
        self.semver.pre.as_str().hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_segment_counts() {
        assert_eq!(v("1").major(), 1);
        assert_eq!(v("1.2").minor(), 2);
        assert_eq!(v("1.2.3").patch(), 3);
        assert!(v("1.2.3.4") > v("1.2.3"));
        assert!(Version::parse("1.2.3.4.5").is_err());
    }

    #[test]
    fn test_parse_keeps_original_spelling() {
        assert_eq!(v("v2.0").to_string(), "v2.0");
        assert_eq!(v(" 13.0.1 ").as_str(), "13.0.1");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("abc").is_err());
        assert!(Version::parse("1..2").is_err());
        assert!(Version::parse("1.0.0-").is_err());
    }

    #[test]
    fn test_padding_equality() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1.0.0.0"), v("1.0.0"));
        assert_eq!(v("1.0.0+build.5"), v("1.0.0"));
    }

    #[test]
    fn test_prerelease_ordering() {
        assert!(v("1.0.0-beta") < v("1.0.0"));
        assert!(v("1.0.0-alpha") < v("1.0.0-beta"));
        assert!(v("1.0.0-rc.1") < v("1.0.0-rc.2"));
        assert!(v("1.0.0-beta").is_prerelease());
        assert!(!v("1.0.0").is_prerelease());
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(v("0.128.0") > v("0.124.2"));
        assert!(v("10.0.0") > v("9.9.9"));
        assert!(v("2.0.1") > v("2.0.0"));
    }

    #[test]
    fn test_bump_from() {
        let installed = v("0.110.0");
        assert_eq!(v("1.0.0").bump_from(&installed), VersionBump::Major);
        assert_eq!(v("0.124.2").bump_from(&installed), VersionBump::Minor);
        assert_eq!(v("0.110.3").bump_from(&installed), VersionBump::Patch);
    }

    #[test]
    fn test_serde_as_string() {
        let parsed: Version = serde_json::from_str("\"13.0.1\"").unwrap();
        assert_eq!(parsed, v("13.0.1"));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"13.0.1\"");
        assert!(serde_json::from_str::<Version>("\"not-a-version\"").is_err());
    }
}
