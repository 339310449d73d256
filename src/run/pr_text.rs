//! Pull request title, body and commit message

use crate::domain::update_operation::performed_updates_report;
use crate::domain::{Job, UpdateOperation};

/// Generated text for one pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestText {
    pub title: String,
    pub body: String,
    pub commit_message: String,
}

impl PullRequestText {
    /// Describe a set of merged operations
    pub fn generate(job: &Job, operations: &[UpdateOperation], group: Option<&str>) -> Self {
        let title = title(job, operations, group);
        let body = performed_updates_report(operations);
        let commit_message = if body.is_empty() {
            title.clone()
        } else {
            format!("{}\n\n{}", title, body)
        };
        Self {
            title,
            body,
            commit_message,
        }
    }
}

/// Operations that headline the title: direct and pinned changes, or all of
/// them when only indirect changes were made
fn headline_operations(operations: &[UpdateOperation]) -> Vec<&UpdateOperation> {
    let primary: Vec<&UpdateOperation> = operations
        .iter()
        .filter(|op| !matches!(op, UpdateOperation::IndirectUpdate { .. }))
        .collect();
    if primary.is_empty() {
        operations.iter().collect()
    } else {
        primary
    }
}

fn distinct_names<'a>(operations: &[&'a UpdateOperation]) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    for op in operations {
        let name = op.dependency_name();
        if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            names.push(name);
        }
    }
    names
}

fn title(job: &Job, operations: &[UpdateOperation], group: Option<&str>) -> String {
    let verb = job.package_manager.bump_verb();
    let headline = headline_operations(operations);
    let names = distinct_names(&headline);

    if let Some(group) = group {
        let count = names.len();
        let noun = if count == 1 { "update" } else { "updates" };
        return format!("{} the {} group with {} {}", verb, group, count, noun);
    }

    match names.as_slice() {
        [] => format!("{} dependencies", verb),
        [name] => {
            let ops: Vec<&&UpdateOperation> = headline
                .iter()
                .filter(|op| op.dependency_name().eq_ignore_ascii_case(name))
                .collect();
            let new_version = ops.last().map(|op| op.new_version()).unwrap_or_default();
            let old_versions: Vec<Option<&str>> = ops.iter().map(|op| op.old_version()).collect();
            match old_versions.first() {
                Some(Some(old)) if old_versions.iter().all(|v| *v == Some(*old)) => {
                    format!("{} {} from {} to {}", verb, name, old, new_version)
                }
                _ => format!("{} {} to {}", verb, name, new_version),
            }
        }
        [first, second] => format!("{} {} and {}", verb, first, second),
        [rest @ .., last] => format!("{} {} and {}", verb, rest.join(", "), last),
    }
}
