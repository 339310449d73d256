//! Update handlers
//!
//! Every handler starts the same way: discover each job directory, report
//! the dependency lists, then report the `updater.started` metric. What
//! happens afterwards depends on the selected `HandlerKind`.

mod create_security_update;
mod group_update_all_versions;
mod refresh_pull_request;

pub use refresh_pull_request::RefreshKind;

use super::files::merge_files;
use super::pr_text::PullRequestText;
use super::selector::HandlerKind;
use super::support::{dependency_list, PerformedUpdate};
use super::RunContext;
use crate::api::{ApiMessage, CreatePullRequest, DependencyFile};
use crate::domain::update_operation::merge_operations;
use crate::domain::WorkspaceDiscoveryResult;
use crate::error::AppError;
use tracing::info;

/// Run the handler for `kind`
pub async fn dispatch(ctx: &RunContext<'_>, kind: HandlerKind) -> Result<(), AppError> {
    let discoveries = discover_all(ctx).await?;
    ctx.send(ApiMessage::started_metric(kind.tag_name())).await?;

    match kind {
        HandlerKind::GroupUpdateAllVersions => group_update_all_versions::run(ctx, &discoveries).await,
        HandlerKind::CreateSecurityUpdatePullRequest => {
            create_security_update::run(ctx, &discoveries).await
        }
        HandlerKind::RefreshGroupUpdatePullRequest => {
            refresh_pull_request::run(ctx, &discoveries, RefreshKind::Group).await
        }
        HandlerKind::RefreshSecurityUpdatePullRequest => {
            refresh_pull_request::run(ctx, &discoveries, RefreshKind::Security).await
        }
        HandlerKind::RefreshVersionUpdatePullRequest => {
            refresh_pull_request::run(ctx, &discoveries, RefreshKind::Version).await
        }
    }
}

/// Discover every job directory in order, reporting each dependency list
async fn discover_all(ctx: &RunContext<'_>) -> Result<Vec<WorkspaceDiscoveryResult>, AppError> {
    let mut discoveries = Vec::new();
    for directory in ctx.job.source.all_directories() {
        info!("running discovery in {}", directory);
        let discovery = ctx.discovery.discover(ctx.repo_root, &directory).await?;
        info!(
            "discovered {} project(s) in {}",
            discovery.projects.len(),
            discovery.path
        );
        ctx.send(ApiMessage::UpdatedDependencyList(dependency_list(
            ctx.job, &discovery,
        )))
        .await?;
        discoveries.push(discovery);
    }
    Ok(discoveries)
}

/// PR text for a set of performed updates
fn pull_request_text(
    ctx: &RunContext<'_>,
    performed: &[PerformedUpdate],
    group: Option<&str>,
) -> PullRequestText {
    let operations = merge_operations(performed.iter().map(|u| u.operation.clone()).collect());
    PullRequestText::generate(ctx.job, &operations, group)
}

/// Emit a `CreatePullRequest` for the performed updates
async fn create_pull_request(
    ctx: &RunContext<'_>,
    performed: &[PerformedUpdate],
    file_sets: Vec<Vec<DependencyFile>>,
    group: Option<&str>,
) -> Result<(), AppError> {
    let text = pull_request_text(ctx, performed, group);
    info!("creating pull request: {}", text.title);
    ctx.send(ApiMessage::CreatePullRequest(CreatePullRequest {
        dependencies: super::support::reported_dependencies(ctx.job, performed),
        updated_dependency_files: merge_files(file_sets),
        base_commit_sha: ctx.base_commit_sha.to_string(),
        commit_message: text.commit_message,
        pr_title: text.title,
        pr_body: text.body,
        dependency_group: group.map(str::to_string),
    }))
    .await
}
