//! Job execution
//!
//! `RunWorker` selects the handler for a job, runs it against the
//! collaborators and guarantees the run ends with `MarkAsProcessed`.

pub mod files;
pub mod handlers;
pub mod pr_text;
pub mod selector;
mod summary;
pub mod support;

pub use selector::{select_handler, HandlerKind};
pub use summary::{ClosedPullRequest, RunSummary};

use crate::api::{ApiHandler, ApiMessage, UpdateJobError};
use crate::domain::Job;
use crate::error::{AppError, WorkerError};
use crate::workers::{AnalyzeWorker, DiscoveryWorker, UpdaterWorker};
use std::path::Path;
use tracing::{error, info};

/// Everything a handler needs for one run
pub struct RunContext<'a> {
    pub job: &'a Job,
    pub repo_root: &'a Path,
    pub base_commit_sha: &'a str,
    pub discovery: &'a dyn DiscoveryWorker,
    pub analyzer: &'a dyn AnalyzeWorker,
    pub updater: &'a dyn UpdaterWorker,
    pub api: &'a dyn ApiHandler,
}

impl RunContext<'_> {
    /// Deliver one event to the sink
    pub async fn send(&self, message: ApiMessage) -> Result<(), AppError> {
        self.api.send(message).await.map_err(AppError::from)
    }
}

/// Runs jobs against a fixed set of collaborators and an event sink
pub struct RunWorker<'a> {
    discovery: &'a dyn DiscoveryWorker,
    analyzer: &'a dyn AnalyzeWorker,
    updater: &'a dyn UpdaterWorker,
    api: &'a dyn ApiHandler,
}

impl<'a> RunWorker<'a> {
    pub fn new(
        discovery: &'a dyn DiscoveryWorker,
        analyzer: &'a dyn AnalyzeWorker,
        updater: &'a dyn UpdaterWorker,
        api: &'a dyn ApiHandler,
    ) -> Self {
        Self {
            discovery,
            analyzer,
            updater,
            api,
        }
    }

    /// Process one job.
    ///
    /// Handler failures are reported as job-error events. Only a failure to
    /// deliver events makes this return `Err`, and `MarkAsProcessed` is
    /// still attempted in that case.
    pub async fn run(
        &self,
        job: &Job,
        repo_root: &Path,
        base_commit_sha: &str,
    ) -> Result<HandlerKind, AppError> {
        let kind = select_handler(job);
        info!("starting job processing with handler {}", kind);

        let ctx = RunContext {
            job,
            repo_root,
            base_commit_sha,
            discovery: self.discovery,
            analyzer: self.analyzer,
            updater: self.updater,
            api: self.api,
        };

        let outcome = match handlers::dispatch(&ctx, kind).await {
            Ok(()) => Ok(()),
            Err(AppError::Api(e)) => {
                error!("failed to deliver event: {}", e);
                Err(AppError::Api(e))
            }
            Err(e) => {
                error!("handler {} failed: {}", kind, e);
                ctx.send(ApiMessage::RecordUpdateJobError(job_error_for(&e)))
                    .await
            }
        };

        let marked = ctx.send(ApiMessage::mark_as_processed(base_commit_sha)).await;
        info!("finished job processing");
        outcome.and(marked).map(|()| kind)
    }
}

/// Job-error event for a failure that aborted a handler
pub fn job_error_for(error: &AppError) -> UpdateJobError {
    match error {
        AppError::Worker(WorkerError::DiscoveryFailed { directory, message }) => {
            UpdateJobError::DependencyFileNotParseable {
                message: message.clone(),
                file_path: Some(directory.clone()),
            }
        }
        other => UpdateJobError::UnknownError {
            message: other.to_string(),
        },
    }
}
