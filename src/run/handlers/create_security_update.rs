//! Targeted security update for the job's named dependencies

use super::create_pull_request;
use crate::api::messages::ExistingUpdate;
use crate::api::{ApiMessage, UpdateJobError};
use crate::domain::{Dependency, ProjectDiscoveryResult, WorkspaceDiscoveryResult};
use crate::error::AppError;
use crate::run::files::ModifiedFilesTracker;
use crate::run::support::{analyze, apply_update, update_operations, PerformedUpdate};
use crate::run::RunContext;
use tracing::{info, warn};

pub async fn run(
    ctx: &RunContext<'_>,
    discoveries: &[WorkspaceDiscoveryResult],
) -> Result<(), AppError> {
    let mut names: Vec<&str> = ctx.job.dependencies.iter().map(String::as_str).collect();
    names.sort_by_key(|n| n.to_ascii_lowercase());
    names.dedup_by(|a, b| a.eq_ignore_ascii_case(b));

    let mut trackers = Vec::new();
    for discovery in discoveries {
        trackers.push(ModifiedFilesTracker::start(ctx.repo_root, discovery).await);
    }

    let mut performed = Vec::new();
    for name in names {
        performed.extend(update_vulnerable_dependency(ctx, discoveries, name).await?);
    }

    let operations: Vec<_> = performed.iter().map(|u| u.operation.clone()).collect();
    let mut file_sets = Vec::new();
    for tracker in trackers {
        file_sets.push(tracker.stop(&operations).await);
    }

    if performed.is_empty() {
        info!("no security updates performed");
        return Ok(());
    }
    create_pull_request(ctx, &performed, file_sets, None).await
}

async fn record(ctx: &RunContext<'_>, error: UpdateJobError) -> Result<(), AppError> {
    warn!("{}: {:?}", error.error_type(), error);
    ctx.send(ApiMessage::RecordUpdateJobError(error)).await
}

async fn update_vulnerable_dependency(
    ctx: &RunContext<'_>,
    discoveries: &[WorkspaceDiscoveryResult],
    name: &str,
) -> Result<Vec<PerformedUpdate>, AppError> {
    let job = ctx.job;
    let mut occurrences: Vec<(&WorkspaceDiscoveryResult, &ProjectDiscoveryResult, &Dependency)> =
        Vec::new();
    for discovery in discoveries {
        for (project, dependency) in update_operations(discovery) {
            if dependency.is_named(name) {
                occurrences.push((discovery, project, dependency));
            }
        }
    }

    if occurrences.is_empty() {
        record(ctx, UpdateJobError::SecurityUpdateDependencyNotFound).await?;
        return Ok(Vec::new());
    }

    let vulnerable: Vec<_> = occurrences
        .into_iter()
        .filter(|(_, _, dependency)| job.is_vulnerable(dependency))
        .collect();
    if vulnerable.is_empty() {
        record(
            ctx,
            UpdateJobError::SecurityUpdateNotNeeded {
                dependency_name: name.to_string(),
            },
        )
        .await?;
        return Ok(Vec::new());
    }

    if job.is_dependency_ignored_by_name_only(name) {
        record(
            ctx,
            UpdateJobError::SecurityUpdateIgnored {
                dependency_name: name.to_string(),
            },
        )
        .await?;
        return Ok(Vec::new());
    }

    let mut performed = Vec::new();
    let mut no_op_version: Option<String> = None;
    for (discovery, project, dependency) in vulnerable {
        let Some(analysis) = analyze(ctx, discovery, dependency).await? else {
            continue;
        };
        if !analysis.can_update {
            record(
                ctx,
                UpdateJobError::SecurityUpdateNotFound {
                    dependency_name: dependency.name.clone(),
                    dependency_version: dependency.version.clone().unwrap_or_default(),
                },
            )
            .await?;
            continue;
        }

        let wanted = [(dependency.name.clone(), analysis.updated_version.clone())];
        if job.existing_pull_request_for(&wanted, true).is_some() {
            info!(
                "pull request already exists for {} {}",
                dependency.name, analysis.updated_version
            );
            record(
                ctx,
                UpdateJobError::PullRequestExistsForSecurityUpdate {
                    updated_dependencies: vec![ExistingUpdate {
                        name: dependency.name.clone(),
                        version: analysis.updated_version.clone(),
                        dependency_type: dependency.dependency_type,
                    }],
                },
            )
            .await?;
            return Ok(Vec::new());
        }

        match apply_update(ctx, discovery, project, dependency, &analysis).await? {
            Some(updates) if updates.is_empty() => {
                no_op_version = Some(analysis.updated_version.clone());
            }
            Some(updates) => performed.extend(updates),
            None => {}
        }
    }

    if performed.is_empty() {
        if let Some(version) = no_op_version {
            record(
                ctx,
                UpdateJobError::SecurityUpdateNotPossible {
                    dependency_name: name.to_string(),
                    latest_resolvable_version: version.clone(),
                    lowest_non_vulnerable_version: version,
                    conflicting_dependencies: Vec::new(),
                },
            )
            .await?;
        }
    }
    Ok(performed)
}
