//! Analysis input and output for a single dependency

use crate::domain::job::{SecurityAdvisory, UpdateType};
use crate::domain::{Dependency, Requirement};
use crate::update::CooldownOptions;
use serde::{Deserialize, Serialize};

/// Everything the analyzer needs to know about one dependency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DependencyInfo {
    pub name: String,
    /// Installed version
    pub version: String,
    pub is_vulnerable: bool,
    #[serde(default)]
    pub ignored_versions: Vec<Requirement>,
    #[serde(default)]
    pub ignored_update_types: Vec<UpdateType>,
    #[serde(default)]
    pub vulnerabilities: Vec<SecurityAdvisory>,
    #[serde(default)]
    pub cooldown: Option<CooldownOptions>,
}

/// Outcome of analyzing one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AnalysisResult {
    pub can_update: bool,
    /// Version the analyzer settled on (the installed one when `can_update` is false)
    pub updated_version: String,
    #[serde(default)]
    pub updated_dependencies: Vec<Dependency>,
}

impl AnalysisResult {
    /// Analysis found an update
    pub fn update_to(version: impl Into<String>, updated_dependencies: Vec<Dependency>) -> Self {
        Self {
            can_update: true,
            updated_version: version.into(),
            updated_dependencies,
        }
    }

    /// Analysis found nothing to do
    pub fn no_update(current_version: impl Into<String>) -> Self {
        Self {
            can_update: false,
            updated_version: current_version.into(),
            updated_dependencies: Vec::new(),
        }
    }
}
