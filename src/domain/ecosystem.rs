//! Package ecosystems a job can target

use crate::error::JobError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// .NET projects (*.csproj, Directory.Packages.props, packages.config)
    #[default]
    NuGet,
    /// Python projects (requirements.txt, pyproject.toml)
    Pip,
    /// Terraform modules and providers (*.tf, .terraform.lock.hcl)
    Terraform,
}

impl Ecosystem {
    /// Returns the display name for this ecosystem
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::NuGet => "NuGet",
            Ecosystem::Pip => "pip",
            Ecosystem::Terraform => "Terraform",
        }
    }

    /// Returns the word used in PR titles for the version change
    pub fn bump_verb(&self) -> &'static str {
        match self {
            Ecosystem::NuGet | Ecosystem::Pip => "Bump",
            Ecosystem::Terraform => "Update",
        }
    }

    /// Returns all supported ecosystems
    pub fn all() -> &'static [Ecosystem] {
        &[Ecosystem::NuGet, Ecosystem::Pip, Ecosystem::Terraform]
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Ecosystem {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nuget" => Ok(Ecosystem::NuGet),
            "pip" | "python" => Ok(Ecosystem::Pip),
            "terraform" => Ok(Ecosystem::Terraform),
            _ => Err(JobError::UnsupportedPackageManager {
                value: s.to_string(),
            }),
        }
    }
}
