//! Building blocks shared by the update handlers

use super::RunContext;
use crate::api::{ApiMessage, ReportedDependency, ReportedRequirement, UpdatedDependencyList};
use crate::domain::{
    AnalysisResult, Dependency, Job, ProjectDiscoveryResult, UpdateOperation,
    WorkspaceDiscoveryResult,
};
use crate::error::{AppError, WorkerError};
use crate::workers::UpdateRequest;
use tracing::{info, warn};

/// An update operation together with the project it was performed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformedUpdate {
    /// Repo-rooted project path
    pub project_path: String,
    pub operation: UpdateOperation,
}

/// Dependency list event for one discovery snapshot
pub fn dependency_list(
    job: &Job,
    discovery: &WorkspaceDiscoveryResult,
) -> UpdatedDependencyList {
    let dependencies = discovery
        .versioned_dependencies()
        .map(|(project, dependency)| {
            let version = dependency.version.clone().unwrap_or_default();
            ReportedDependency {
                name: dependency.name.clone(),
                version: Some(version.clone()),
                requirements: vec![ReportedRequirement {
                    requirement: version,
                    file: project.repo_path(&discovery.path),
                    groups: vec![job.group_label(&dependency.name).to_string()],
                }],
                previous_version: None,
                previous_requirements: None,
            }
        })
        .collect();

    UpdatedDependencyList {
        dependencies,
        dependency_files: discovery.dependency_file_paths(),
    }
}

/// Every (project, dependency) pair to consider, ordered by dependency name
/// (case-insensitive) and then project path. A name declared twice in the
/// same project is visited once.
pub fn update_operations(
    discovery: &WorkspaceDiscoveryResult,
) -> Vec<(&ProjectDiscoveryResult, &Dependency)> {
    let mut pairs: Vec<(String, String, &ProjectDiscoveryResult, &Dependency)> = Vec::new();
    for (project, dependency) in discovery.versioned_dependencies() {
        let name_key = dependency.name.to_ascii_lowercase();
        let path_key = project.repo_path(&discovery.path).to_ascii_lowercase();
        if pairs
            .iter()
            .any(|(n, p, _, _)| *n == name_key && *p == path_key)
        {
            continue;
        }
        pairs.push((name_key, path_key, project, dependency));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    pairs
        .into_iter()
        .map(|(_, _, project, dependency)| (project, dependency))
        .collect()
}

/// Fill each operation's previous version from the project's snapshot
pub fn patch_old_versions(
    operations: Vec<UpdateOperation>,
    project: &ProjectDiscoveryResult,
) -> Vec<UpdateOperation> {
    operations
        .into_iter()
        .map(|operation| {
            let old = project
                .find_dependency(operation.dependency_name())
                .and_then(|d| d.version.clone());
            operation.with_old_version(old)
        })
        .collect()
}

/// Reported dependencies for a pull request: one entry per dependency and
/// new version, with a requirement line per updated project
pub fn reported_dependencies(
    job: &Job,
    performed: &[PerformedUpdate],
) -> Vec<ReportedDependency> {
    let mut reported: Vec<ReportedDependency> = Vec::new();
    for update in performed {
        let op = &update.operation;
        let group = job.group_label(op.dependency_name()).to_string();
        let requirement = ReportedRequirement {
            requirement: op.new_version().to_string(),
            file: update.project_path.clone(),
            groups: vec![group.clone()],
        };
        let previous = op.old_version().map(|old| ReportedRequirement {
            requirement: old.to_string(),
            file: update.project_path.clone(),
            groups: vec![group],
        });

        let existing = reported.iter_mut().find(|r| {
            r.name.eq_ignore_ascii_case(op.dependency_name())
                && r.version.as_deref() == Some(op.new_version())
        });
        match existing {
            Some(entry) => {
                if !entry.requirements.iter().any(|r| r.file == requirement.file) {
                    entry.requirements.push(requirement);
                    if let (Some(list), Some(previous)) = (&mut entry.previous_requirements, previous) {
                        list.push(previous);
                    }
                }
            }
            None => reported.push(ReportedDependency {
                name: op.dependency_name().to_string(),
                version: Some(op.new_version().to_string()),
                requirements: vec![requirement],
                previous_version: op.old_version().map(str::to_string),
                previous_requirements: previous.map(|p| vec![p]),
            }),
        }
    }
    reported.sort_by(|a, b| {
        a.name
            .to_ascii_lowercase()
            .cmp(&b.name.to_ascii_lowercase())
    });
    reported
}

/// `(name, new version)` pairs of direct changes, sorted by name and
/// de-duplicated, as compared against existing pull requests
pub fn updated_name_versions(performed: &[PerformedUpdate]) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for update in performed {
        if matches!(update.operation, UpdateOperation::IndirectUpdate { .. }) {
            continue;
        }
        let name = update.operation.dependency_name();
        if !pairs.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)) {
            pairs.push((name.to_string(), update.operation.new_version().to_string()));
        }
    }
    pairs.sort_by_key(|(n, _)| n.to_ascii_lowercase());
    pairs
}

/// Record a collaborator failure scoped to one dependency.
///
/// Contract violations are returned as errors and abort the handler.
pub async fn record_worker_failure(ctx: &RunContext<'_>, error: WorkerError) -> Result<(), AppError> {
    if error.is_contract_violation() {
        return Err(error.into());
    }
    warn!("{}", error);
    let job_error = super::job_error_for(&AppError::from(error));
    ctx.send(ApiMessage::RecordUpdateJobError(job_error)).await
}

/// Run analysis for one dependency. `None` means a failure was recorded.
pub async fn analyze(
    ctx: &RunContext<'_>,
    discovery: &WorkspaceDiscoveryResult,
    dependency: &Dependency,
) -> Result<Option<AnalysisResult>, AppError> {
    let dependency_info = ctx.job.dependency_info(dependency);
    match ctx.analyzer.analyze(ctx.repo_root, discovery, &dependency_info).await {
        Ok(result) => {
            if !result.can_update {
                info!(
                    "no updatable version found for {} {}",
                    dependency.name, dependency_info.version
                );
            }
            Ok(Some(result))
        }
        Err(error) => {
            record_worker_failure(ctx, error).await?;
            Ok(None)
        }
    }
}

/// Run the updater for one project. `None` means a failure was recorded;
/// an empty list means the updater had nothing to change.
pub async fn apply_update(
    ctx: &RunContext<'_>,
    discovery: &WorkspaceDiscoveryResult,
    project: &ProjectDiscoveryResult,
    dependency: &Dependency,
    analysis: &AnalysisResult,
) -> Result<Option<Vec<PerformedUpdate>>, AppError> {
    let project_path = project.repo_path(&discovery.path);
    let request = UpdateRequest {
        project_path: &project_path,
        dependency_name: &dependency.name,
        previous_version: dependency.version.as_deref().unwrap_or_default(),
        new_version: &analysis.updated_version,
        is_transitive: dependency.is_transitive,
    };

    let result = match ctx.updater.update(ctx.repo_root, &request).await {
        Ok(result) => result,
        Err(error) => {
            record_worker_failure(ctx, error).await?;
            return Ok(None);
        }
    };

    if let Some(unexpected) = result
        .update_operations
        .iter()
        .find(|op| !is_expected_operation(op, dependency, analysis))
    {
        return Err(WorkerError::unexpected_dependency(unexpected.dependency_name()).into());
    }

    if result.is_empty() {
        info!(
            "updater made no changes for {} in {}",
            dependency.name, project_path
        );
        return Ok(Some(Vec::new()));
    }

    let performed = patch_old_versions(result.update_operations, project)
        .into_iter()
        .map(|operation| {
            info!("update operation performed: {}", operation.report());
            PerformedUpdate {
                project_path: project_path.clone(),
                operation,
            }
        })
        .collect();
    Ok(Some(performed))
}

/// Analyze then update one dependency of one project. Failures are recorded
/// and yield no operations.
pub async fn update_dependency(
    ctx: &RunContext<'_>,
    discovery: &WorkspaceDiscoveryResult,
    project: &ProjectDiscoveryResult,
    dependency: &Dependency,
) -> Result<Vec<PerformedUpdate>, AppError> {
    let Some(analysis) = analyze(ctx, discovery, dependency).await? else {
        return Ok(Vec::new());
    };
    if !analysis.can_update {
        return Ok(Vec::new());
    }
    info!(
        "attempting update of {} from {} to {} in {}",
        dependency.name,
        dependency.version.as_deref().unwrap_or_default(),
        analysis.updated_version,
        project.repo_path(&discovery.path)
    );
    Ok(apply_update(ctx, discovery, project, dependency, &analysis)
        .await?
        .unwrap_or_default())
}

fn is_expected_operation(
    operation: &UpdateOperation,
    dependency: &Dependency,
    analysis: &AnalysisResult,
) -> bool {
    let known = |name: &str| {
        dependency.is_named(name) || analysis.updated_dependencies.iter().any(|d| d.is_named(name))
    };
    match operation {
        UpdateOperation::IndirectUpdate {
            parent_dependency_name,
            ..
        } => known(parent_dependency_name),
        other => known(other.dependency_name()),
    }
}
