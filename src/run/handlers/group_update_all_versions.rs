//! Version (or untargeted security) updates across every directory
//!
//! Without applicable groups each directory gets its own pull request. With
//! groups, each one gets a single pull request spanning all directories and
//! dependencies outside every group are left alone.

use super::create_pull_request;
use crate::domain::{Dependency, DependencyGroup, WorkspaceDiscoveryResult};
use crate::error::AppError;
use crate::run::files::ModifiedFilesTracker;
use crate::run::support::{update_dependency, update_operations, PerformedUpdate};
use crate::run::RunContext;
use tracing::info;

pub async fn run(
    ctx: &RunContext<'_>,
    discoveries: &[WorkspaceDiscoveryResult],
) -> Result<(), AppError> {
    let groups: Vec<&DependencyGroup> = ctx.job.applicable_groups().collect();
    if groups.is_empty() {
        run_ungrouped(ctx, discoveries).await
    } else {
        run_grouped(ctx, discoveries, &groups).await
    }
}

async fn run_ungrouped(
    ctx: &RunContext<'_>,
    discoveries: &[WorkspaceDiscoveryResult],
) -> Result<(), AppError> {
    for discovery in discoveries {
        let tracker = ModifiedFilesTracker::start(ctx.repo_root, discovery).await;
        let performed = update_directory(ctx, discovery, |_| true).await?;
        let operations: Vec<_> = performed.iter().map(|u| u.operation.clone()).collect();
        let files = tracker.stop(&operations).await;

        if performed.is_empty() {
            info!("no updates performed in {}", discovery.path);
            continue;
        }
        create_pull_request(ctx, &performed, vec![files], None).await?;
    }
    Ok(())
}

async fn run_grouped(
    ctx: &RunContext<'_>,
    discoveries: &[WorkspaceDiscoveryResult],
    groups: &[&DependencyGroup],
) -> Result<(), AppError> {
    for group in groups {
        if ctx.job.existing_group_pull_request(&group.name).is_some() {
            info!(
                "existing pull request found for group {}, skipping pull request creation",
                group.name
            );
            continue;
        }

        info!("starting update for group {}", group.name);
        let mut performed = Vec::new();
        let mut file_sets = Vec::new();
        for discovery in discoveries {
            let tracker = ModifiedFilesTracker::start(ctx.repo_root, discovery).await;
            let in_group = |dependency: &Dependency| {
                ctx.job
                    .applicable_group_for(&dependency.name)
                    .is_some_and(|g| g.name == group.name)
            };
            let directory_updates = update_directory(ctx, discovery, in_group).await?;
            let operations: Vec<_> = directory_updates
                .iter()
                .map(|u| u.operation.clone())
                .collect();
            file_sets.push(tracker.stop(&operations).await);
            performed.extend(directory_updates);
        }

        if performed.is_empty() {
            info!("no updates performed for group {}", group.name);
            continue;
        }
        create_pull_request(ctx, &performed, file_sets, Some(&group.name)).await?;
    }
    Ok(())
}

/// Update every eligible dependency of one directory accepted by `filter`
async fn update_directory<F>(
    ctx: &RunContext<'_>,
    discovery: &WorkspaceDiscoveryResult,
    filter: F,
) -> Result<Vec<PerformedUpdate>, AppError>
where
    F: Fn(&Dependency) -> bool,
{
    let mut performed = Vec::new();
    for (project, dependency) in update_operations(discovery) {
        if !is_eligible(ctx, dependency) || !filter(dependency) {
            continue;
        }
        performed.extend(update_dependency(ctx, discovery, project, dependency).await?);
    }
    Ok(performed)
}

fn is_eligible(ctx: &RunContext<'_>, dependency: &Dependency) -> bool {
    let job = ctx.job;
    if !job.is_in_scope(&dependency.name) || !job.is_update_permitted(dependency) {
        return false;
    }
    if job.security_updates_only && !job.is_vulnerable(dependency) {
        return false;
    }
    if job.is_dependency_ignored_by_name_only(&dependency.name) {
        info!("skipping ignored dependency {}", dependency.name);
        return false;
    }
    true
}
