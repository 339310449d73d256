//! Events sent to the PR-management service

use crate::domain::DependencyType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metric emitted once per run when a handler starts working
pub const UPDATER_STARTED_METRIC: &str = "updater.started";

/// One event, in the order the service must observe them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ApiMessage {
    UpdatedDependencyList(UpdatedDependencyList),
    IncrementMetric(IncrementMetric),
    CreatePullRequest(CreatePullRequest),
    UpdatePullRequest(UpdatePullRequest),
    ClosePullRequest(ClosePullRequest),
    RecordUpdateJobError(UpdateJobError),
    MarkAsProcessed(MarkAsProcessed),
}

impl ApiMessage {
    /// Service endpoint this event is posted to
    pub fn endpoint(&self) -> &'static str {
        match self {
            ApiMessage::UpdatedDependencyList(_) => "update_dependency_list",
            ApiMessage::IncrementMetric(_) => "increment_metric",
            ApiMessage::CreatePullRequest(_) => "create_pull_request",
            ApiMessage::UpdatePullRequest(_) => "update_pull_request",
            ApiMessage::ClosePullRequest(_) => "close_pull_request",
            ApiMessage::RecordUpdateJobError(_) => "record_update_job_error",
            ApiMessage::MarkAsProcessed(_) => "mark_as_processed",
        }
    }

    /// The event body without the type envelope
    pub fn payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            ApiMessage::UpdatedDependencyList(m) => serde_json::to_value(m),
            ApiMessage::IncrementMetric(m) => serde_json::to_value(m),
            ApiMessage::CreatePullRequest(m) => serde_json::to_value(m),
            ApiMessage::UpdatePullRequest(m) => serde_json::to_value(m),
            ApiMessage::ClosePullRequest(m) => serde_json::to_value(m),
            ApiMessage::RecordUpdateJobError(m) => serde_json::to_value(m),
            ApiMessage::MarkAsProcessed(m) => serde_json::to_value(m),
        }
    }

    /// `updater.started` metric tagged with the handler operation
    pub fn started_metric(operation: &str) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert("operation".to_string(), operation.to_string());
        ApiMessage::IncrementMetric(IncrementMetric {
            metric: UPDATER_STARTED_METRIC.to_string(),
            tags,
        })
    }

    pub fn close(dependency_names: Vec<String>, reason: CloseReason) -> Self {
        ApiMessage::ClosePullRequest(ClosePullRequest {
            dependency_names,
            reason,
        })
    }

    pub fn mark_as_processed(base_commit_sha: impl Into<String>) -> Self {
        ApiMessage::MarkAsProcessed(MarkAsProcessed {
            base_commit_sha: base_commit_sha.into(),
        })
    }

    pub fn is_job_error(&self) -> bool {
        matches!(self, ApiMessage::RecordUpdateJobError(_))
    }
}

/// A requirement line of a reported dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReportedRequirement {
    pub requirement: String,
    /// Repo-rooted project file
    pub file: String,
    pub groups: Vec<String>,
}

/// A dependency as reported to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReportedDependency {
    pub name: String,
    pub version: Option<String>,
    pub requirements: Vec<ReportedRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_requirements: Option<Vec<ReportedRequirement>>,
}

/// Dependencies found in one job directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdatedDependencyList {
    pub dependencies: Vec<ReportedDependency>,
    pub dependency_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IncrementMetric {
    pub metric: String,
    pub tags: BTreeMap<String, String>,
}

/// A changed file, split into its repo-rooted directory and file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DependencyFile {
    pub directory: String,
    pub name: String,
    pub content: String,
}

impl DependencyFile {
    /// Repo-rooted path (`/src` + `project.csproj` -> `/src/project.csproj`)
    pub fn path(&self) -> String {
        crate::domain::join_repo_path(&self.directory, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreatePullRequest {
    pub dependencies: Vec<ReportedDependency>,
    pub updated_dependency_files: Vec<DependencyFile>,
    pub base_commit_sha: String,
    pub commit_message: String,
    pub pr_title: String,
    pub pr_body: String,
    pub dependency_group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdatePullRequest {
    pub base_commit_sha: String,
    pub dependency_names: Vec<String>,
    pub updated_dependency_files: Vec<DependencyFile>,
    pub pr_title: String,
    pub pr_body: String,
    pub commit_message: String,
    pub dependency_group: Option<String>,
}

/// Why a pull request is being closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    DependenciesRemoved,
    DependencyRemoved,
    UpdateNoLongerPossible,
    UpToDate,
    DependenciesChanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClosePullRequest {
    pub dependency_names: Vec<String>,
    pub reason: CloseReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MarkAsProcessed {
    pub base_commit_sha: String,
}

/// Dependency named by a `pull_request_exists_for_security_update` error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingUpdate {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,
}

/// Outcomes that end a dependency's processing without a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "error-type",
    content = "error-details",
    rename_all = "snake_case",
    rename_all_fields = "kebab-case"
)]
pub enum UpdateJobError {
    SecurityUpdateDependencyNotFound,
    SecurityUpdateNotNeeded {
        dependency_name: String,
    },
    SecurityUpdateNotFound {
        dependency_name: String,
        dependency_version: String,
    },
    SecurityUpdateIgnored {
        dependency_name: String,
    },
    SecurityUpdateNotPossible {
        dependency_name: String,
        latest_resolvable_version: String,
        lowest_non_vulnerable_version: String,
        conflicting_dependencies: Vec<String>,
    },
    PullRequestExistsForSecurityUpdate {
        updated_dependencies: Vec<ExistingUpdate>,
    },
    DependencyFileNotParseable {
        message: String,
        file_path: Option<String>,
    },
    UnknownError {
        message: String,
    },
}

impl UpdateJobError {
    /// Snake-case identifier as sent to the service
    pub fn error_type(&self) -> &'static str {
        match self {
            UpdateJobError::SecurityUpdateDependencyNotFound => {
                "security_update_dependency_not_found"
            }
            UpdateJobError::SecurityUpdateNotNeeded { .. } => "security_update_not_needed",
            UpdateJobError::SecurityUpdateNotFound { .. } => "security_update_not_found",
            UpdateJobError::SecurityUpdateIgnored { .. } => "security_update_ignored",
            UpdateJobError::SecurityUpdateNotPossible { .. } => "security_update_not_possible",
            UpdateJobError::PullRequestExistsForSecurityUpdate { .. } => {
                "pull_request_exists_for_security_update"
            }
            UpdateJobError::DependencyFileNotParseable { .. } => "dependency_file_not_parseable",
            UpdateJobError::UnknownError { .. } => "unknown_error",
        }
    }
}
