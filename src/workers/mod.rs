//! Collaborator interfaces
//!
//! Discovery, analysis and file rewriting are ecosystem specific and live
//! outside this crate. Handlers only talk to them through these traits:
//! - `DiscoveryWorker`: snapshot the projects of one directory
//! - `AnalyzeWorker`: decide whether and to what a dependency can move
//! - `UpdaterWorker`: rewrite project files for one dependency

mod command;

pub use command::{CommandWorkers, WorkerCommands};

use crate::domain::{AnalysisResult, DependencyInfo, UpdateOperationResult, WorkspaceDiscoveryResult};
use crate::error::WorkerError;
use async_trait::async_trait;
use std::path::Path;

/// Produces the discovery snapshot of one job directory
#[async_trait]
pub trait DiscoveryWorker: Send + Sync {
    async fn discover(
        &self,
        repo_root: &Path,
        directory: &str,
    ) -> Result<WorkspaceDiscoveryResult, WorkerError>;
}

/// Decides the update target of one dependency
#[async_trait]
pub trait AnalyzeWorker: Send + Sync {
    async fn analyze(
        &self,
        repo_root: &Path,
        discovery: &WorkspaceDiscoveryResult,
        dependency: &DependencyInfo,
    ) -> Result<AnalysisResult, WorkerError>;
}

/// Parameters of one updater call
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateRequest<'a> {
    /// Repo-rooted project file to update
    pub project_path: &'a str,
    pub dependency_name: &'a str,
    pub previous_version: &'a str,
    pub new_version: &'a str,
    pub is_transitive: bool,
}

/// Rewrites project files for one dependency
#[async_trait]
pub trait UpdaterWorker: Send + Sync {
    async fn update(
        &self,
        repo_root: &Path,
        request: &UpdateRequest<'_>,
    ) -> Result<UpdateOperationResult, WorkerError>;
}
