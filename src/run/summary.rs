//! Run summary derived from the emitted events

use super::HandlerKind;
use crate::api::{ApiMessage, CloseReason, UpdateJobError};
use serde::Serialize;

/// A pull request the run asked the service to close
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClosedPullRequest {
    pub dependency_names: Vec<String>,
    pub reason: CloseReason,
}

/// What one run did, in event order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunSummary {
    /// Tag of the handler that ran
    pub handler: String,
    /// Number of dependencies reported across all directories
    pub dependencies_discovered: usize,
    /// Titles of created pull requests
    pub created: Vec<String>,
    /// Titles of updated pull requests
    pub updated: Vec<String>,
    pub closed: Vec<ClosedPullRequest>,
    pub job_errors: Vec<UpdateJobError>,
    /// Base commit the run was marked processed at
    pub processed: Option<String>,
}

impl RunSummary {
    /// Summarize the events of a run
    pub fn from_messages(handler: HandlerKind, messages: &[ApiMessage]) -> Self {
        let mut summary = Self {
            handler: handler.tag_name().to_string(),
            dependencies_discovered: 0,
            created: Vec::new(),
            updated: Vec::new(),
            closed: Vec::new(),
            job_errors: Vec::new(),
            processed: None,
        };

        for message in messages {
            match message {
                ApiMessage::UpdatedDependencyList(list) => {
                    summary.dependencies_discovered += list.dependencies.len();
                }
                ApiMessage::IncrementMetric(_) => {}
                ApiMessage::CreatePullRequest(pr) => summary.created.push(pr.pr_title.clone()),
                ApiMessage::UpdatePullRequest(pr) => summary.updated.push(pr.pr_title.clone()),
                ApiMessage::ClosePullRequest(close) => summary.closed.push(ClosedPullRequest {
                    dependency_names: close.dependency_names.clone(),
                    reason: close.reason,
                }),
                ApiMessage::RecordUpdateJobError(error) => summary.job_errors.push(error.clone()),
                ApiMessage::MarkAsProcessed(mark) => {
                    summary.processed = Some(mark.base_commit_sha.clone());
                }
            }
        }
        summary
    }

    /// Whether any job-error event was recorded
    pub fn has_job_errors(&self) -> bool {
        !self.job_errors.is_empty()
    }

    /// Whether the run created, updated or closed any pull request
    pub fn has_changes(&self) -> bool {
        !self.created.is_empty() || !self.updated.is_empty() || !self.closed.is_empty()
    }
}
