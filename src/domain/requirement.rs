//! Version requirements used by advisories and ignore conditions
//!
//! Supported forms:
//! - comparator lists joined by `,` (all must hold): `>= 1.0, < 2.0`
//! - alternatives joined by `||` (any may hold): `< 1.0 || >= 3.0`
//! - operators `=`, `==`, `!=`, `>`, `>=`, `<`, `<=`, `~>` and `~=`
//! - bare versions (exact match) and trailing wildcards: `1.2.*`
//! - NuGet interval notation: `[1.0,2.0)`, `(,1.0]`, `[1.2.3]`

use crate::domain::Version;
use crate::error::VersionError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static COMPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(==|!=|>=|<=|~>|~=|=|>|<)?\s*([vV]?[0-9][0-9A-Za-z.+\-]*?)(\.\*)?\s*$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn matches(&self, version: &Version) -> bool {
        match self.op {
            Op::Eq => version == &self.version,
            Op::NotEq => version != &self.version,
            Op::Gt => version > &self.version,
            Op::Gte => version >= &self.version,
            Op::Lt => version < &self.version,
            Op::Lte => version <= &self.version,
        }
    }
}

/// A parsed version requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Requirement {
    raw: String,
    /// Disjunction of conjunctions
    alternatives: Vec<Vec<Comparator>>,
}

impl Requirement {
    /// Parse a requirement string
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(VersionError::invalid_requirement(input, "empty requirement"));
        }

        let alternatives = raw
            .split("||")
            .map(|alternative| {
                let alternative = alternative.trim();
                if alternative.starts_with('[') || alternative.starts_with('(') {
                    parse_interval(alternative)
                } else {
                    parse_comparators(alternative)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            alternatives,
        })
    }

    /// Whether `version` satisfies this requirement
    pub fn satisfied_by(&self, version: &Version) -> bool {
        self.alternatives
            .iter()
            .any(|all| all.iter().all(|c| c.matches(version)))
    }

    /// The requirement as originally written
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn parse_comparators(input: &str) -> Result<Vec<Comparator>, VersionError> {
    let mut comparators = Vec::new();
    for part in input.split(',') {
        let caps = COMPARATOR_RE
            .captures(part)
            .ok_or_else(|| VersionError::invalid_requirement(input, "unrecognized comparator"))?;
        let op = caps.get(1).map(|m| m.as_str()).unwrap_or("=");
        let version = Version::parse(&caps[2])?;
        let wildcard = caps.get(3).is_some();

        match (op, wildcard) {
            ("=" | "==", true) => comparators.extend(wildcard_range(&version, &caps[2])),
            (_, true) => {
                return Err(VersionError::invalid_requirement(
                    input,
                    "wildcards are only allowed with '='",
                ))
            }
            ("~>" | "~=", false) => comparators.extend(pessimistic_range(&version, &caps[2])),
            ("=" | "==", false) => comparators.push(Comparator { op: Op::Eq, version }),
            ("!=", false) => comparators.push(Comparator {
                op: Op::NotEq,
                version,
            }),
            (">", false) => comparators.push(Comparator { op: Op::Gt, version }),
            (">=", false) => comparators.push(Comparator {
                op: Op::Gte,
                version,
            }),
            ("<", false) => comparators.push(Comparator { op: Op::Lt, version }),
            ("<=", false) => comparators.push(Comparator {
                op: Op::Lte,
                version,
            }),
            (other, _) => {
                return Err(VersionError::invalid_requirement(
                    input,
                    format!("unknown operator '{}'", other),
                ))
            }
        }
    }
    Ok(comparators)
}

/// `1.2.*` means `>= 1.2.0, < 1.3.0`
fn wildcard_range(version: &Version, text: &str) -> [Comparator; 2] {
    let segments = text.split('.').count();
    let upper = match segments {
        1 => format!("{}.0.0", version.major() + 1),
        2 => format!("{}.{}.0", version.major(), version.minor() + 1),
        _ => format!(
            "{}.{}.{}",
            version.major(),
            version.minor(),
            version.patch() + 1
        ),
    };
    [
        Comparator {
            op: Op::Gte,
            version: version.clone(),
        },
        Comparator {
            op: Op::Lt,
            version: Version::parse(&upper).unwrap_or_else(|_| version.clone()),
        },
    ]
}

/// `~> 1.2` means `>= 1.2, < 2.0`; `~> 1.2.3` means `>= 1.2.3, < 1.3.0`
fn pessimistic_range(version: &Version, text: &str) -> [Comparator; 2] {
    let segments = text.split(['-', '+']).next().unwrap_or(text).split('.').count();
    let upper = if segments <= 2 {
        format!("{}.0.0", version.major() + 1)
    } else {
        format!("{}.{}.0", version.major(), version.minor() + 1)
    };
    [
        Comparator {
            op: Op::Gte,
            version: version.clone(),
        },
        Comparator {
            op: Op::Lt,
            version: Version::parse(&upper).unwrap_or_else(|_| version.clone()),
        },
    ]
}

fn parse_interval(input: &str) -> Result<Vec<Comparator>, VersionError> {
    let invalid = |message: &str| VersionError::invalid_requirement(input, message);

    let lower_inclusive = match input.chars().next() {
        Some('[') => true,
        Some('(') => false,
        _ => return Err(invalid("interval must start with '[' or '('")),
    };
    let upper_inclusive = match input.chars().last() {
        Some(']') => true,
        Some(')') => false,
        _ => return Err(invalid("interval must end with ']' or ')'")),
    };
    let inner = &input[1..input.len() - 1];

    let Some((lower, upper)) = inner.split_once(',') else {
        // [1.2.3] is an exact pin
        if !(lower_inclusive && upper_inclusive) {
            return Err(invalid("exact interval must use '[' and ']'"));
        }
        return Ok(vec![Comparator {
            op: Op::Eq,
            version: Version::parse(inner)?,
        }]);
    };

    let mut comparators = Vec::new();
    if !lower.trim().is_empty() {
        comparators.push(Comparator {
            op: if lower_inclusive { Op::Gte } else { Op::Gt },
            version: Version::parse(lower)?,
        });
    }
    if !upper.trim().is_empty() {
        comparators.push(Comparator {
            op: if upper_inclusive { Op::Lte } else { Op::Lt },
            version: Version::parse(upper)?,
        });
    }
    if comparators.is_empty() {
        return Err(invalid("interval has no bounds"));
    }
    Ok(comparators)
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Requirement {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Requirement {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Requirement> for String {
    fn from(value: Requirement) -> Self {
        value.raw
    }
}
