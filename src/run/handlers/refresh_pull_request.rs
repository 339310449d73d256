//! Refreshing an existing pull request
//!
//! The three refresh variants share one flow. They differ in how the set of
//! managed dependencies is chosen, whether an up-to-date check applies, and
//! which group (if any) the resulting pull request belongs to.

use super::{create_pull_request, pull_request_text};
use crate::api::{ApiMessage, CloseReason, UpdatePullRequest};
use crate::domain::job::ExistingPullRequest;
use crate::domain::{DependencyGroup, Job, WorkspaceDiscoveryResult};
use crate::error::AppError;
use crate::run::files::{merge_files, ModifiedFilesTracker};
use crate::run::support::{update_dependency, update_operations, updated_name_versions};
use crate::run::RunContext;
use tracing::info;

/// Which kind of pull request is being refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    Version,
    Security,
    Group,
}

pub async fn run(
    ctx: &RunContext<'_>,
    discoveries: &[WorkspaceDiscoveryResult],
    kind: RefreshKind,
) -> Result<(), AppError> {
    let job = ctx.job;
    let group = match kind {
        RefreshKind::Group => job.group_to_refresh()?,
        _ => None,
    };
    let managed = managed_dependencies(job, discoveries, group);
    info!("refreshing pull request for: {}", managed.join(", "));

    let (present, missing): (Vec<&String>, Vec<&String>) = managed
        .iter()
        .partition(|name| discoveries.iter().any(|d| d.contains_dependency(name)));

    if present.is_empty() {
        return close(ctx, managed.clone(), CloseReason::DependenciesRemoved).await;
    }
    if !missing.is_empty() {
        let missing = missing.into_iter().cloned().collect();
        return close(ctx, missing, CloseReason::DependencyRemoved).await;
    }
    if kind == RefreshKind::Security && !any_vulnerable(job, discoveries, &managed) {
        return close(ctx, managed.clone(), CloseReason::UpToDate).await;
    }

    let mut trackers = Vec::new();
    for discovery in discoveries {
        trackers.push(ModifiedFilesTracker::start(ctx.repo_root, discovery).await);
    }

    let mut performed = Vec::new();
    for name in &managed {
        if job.is_dependency_ignored_by_name_only(name) {
            info!("skipping ignored dependency {}", name);
            continue;
        }
        for discovery in discoveries {
            for (project, dependency) in update_operations(discovery) {
                if dependency.is_named(name) {
                    performed.extend(update_dependency(ctx, discovery, project, dependency).await?);
                }
            }
        }
    }

    let operations: Vec<_> = performed.iter().map(|u| u.operation.clone()).collect();
    let mut file_sets = Vec::new();
    for tracker in trackers {
        file_sets.push(tracker.stop(&operations).await);
    }

    if performed.is_empty() {
        info!("no updates performed for: {}", managed.join(", "));
        return close(ctx, managed, CloseReason::UpdateNoLongerPossible).await;
    }

    let group_name = group.map(|g| g.name.as_str());
    let updated = updated_name_versions(&performed);
    let existing = existing_pull_requests(job, group);

    if existing.iter().any(|pr| pr.matches(&updated, true)) {
        let text = pull_request_text(ctx, &performed, group_name);
        info!("updating pull request: {}", text.title);
        return ctx
            .send(ApiMessage::UpdatePullRequest(UpdatePullRequest {
                base_commit_sha: ctx.base_commit_sha.to_string(),
                dependency_names: managed,
                updated_dependency_files: merge_files(file_sets),
                pr_title: text.title,
                pr_body: text.body,
                commit_message: text.commit_message,
                dependency_group: group_name.map(str::to_string),
            }))
            .await;
    }

    if existing
        .iter()
        .any(|pr| managed.iter().any(|name| pr.contains(name)))
    {
        close(ctx, managed, CloseReason::DependenciesChanged).await?;
    }
    create_pull_request(ctx, &performed, file_sets, group_name).await
}

async fn close(
    ctx: &RunContext<'_>,
    dependency_names: Vec<String>,
    reason: CloseReason,
) -> Result<(), AppError> {
    info!(
        "closing pull request for {} ({:?})",
        dependency_names.join(", "),
        reason
    );
    ctx.send(ApiMessage::close(dependency_names, reason)).await
}

/// Names this refresh is responsible for, sorted case-insensitively
fn managed_dependencies(
    job: &Job,
    discoveries: &[WorkspaceDiscoveryResult],
    group: Option<&DependencyGroup>,
) -> Vec<String> {
    let mut names: Vec<String> = match group {
        Some(group) => {
            let requested: Vec<String> = job
                .dependencies
                .iter()
                .filter(|n| is_assigned(job, group, n))
                .cloned()
                .collect();
            if requested.is_empty() {
                discoveries
                    .iter()
                    .flat_map(|d| d.versioned_dependencies())
                    .map(|(_, dependency)| dependency.name.clone())
                    .filter(|n| is_assigned(job, group, n))
                    .collect()
            } else {
                requested
            }
        }
        None => {
            let claimed: Vec<String> = job
                .dependencies
                .iter()
                .filter(|n| job.existing_pull_requests.iter().any(|pr| pr.contains(n)))
                .cloned()
                .collect();
            if claimed.is_empty() {
                job.dependencies.clone()
            } else {
                claimed
            }
        }
    };
    names.sort_by_key(|n| n.to_ascii_lowercase());
    names.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
    names
}

fn is_assigned(job: &Job, group: &DependencyGroup, name: &str) -> bool {
    job.assigned_group(name).is_some_and(|g| g.name == group.name)
}

fn any_vulnerable(job: &Job, discoveries: &[WorkspaceDiscoveryResult], managed: &[String]) -> bool {
    discoveries
        .iter()
        .flat_map(|d| d.versioned_dependencies())
        .any(|(_, dependency)| {
            managed.iter().any(|n| dependency.is_named(n)) && job.is_vulnerable(dependency)
        })
}

/// Open pull requests this refresh may match against. A group refresh
/// considers the group's own pull request first.
fn existing_pull_requests(job: &Job, group: Option<&DependencyGroup>) -> Vec<ExistingPullRequest> {
    let mut existing = Vec::new();
    if let Some(pr) = group.and_then(|g| job.existing_group_pull_request(&g.name)) {
        existing.push(ExistingPullRequest {
            dependencies: pr.dependencies.clone(),
        });
    }
    existing.extend(job.existing_pull_requests.iter().cloned());
    existing
}
