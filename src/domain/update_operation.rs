//! Update operations reported by the updater collaborator

use crate::domain::Version;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One change the updater made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum UpdateOperation {
    /// The dependency itself was bumped
    DirectUpdate {
        dependency_name: String,
        new_version: String,
        updated_files: Vec<String>,
        #[serde(default)]
        old_version: Option<String>,
    },
    /// A transitive dependency was pinned at a version
    PinnedUpdate {
        dependency_name: String,
        new_version: String,
        updated_files: Vec<String>,
        #[serde(default)]
        old_version: Option<String>,
    },
    /// The dependency moved because its parent was bumped
    IndirectUpdate {
        dependency_name: String,
        new_version: String,
        updated_files: Vec<String>,
        parent_dependency_name: String,
        parent_new_version: String,
        #[serde(default)]
        old_version: Option<String>,
    },
}

/// Everything one updater call changed; empty means "nothing to do"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UpdateOperationResult {
    pub update_operations: Vec<UpdateOperation>,
}

impl UpdateOperationResult {
    pub fn new(update_operations: Vec<UpdateOperation>) -> Self {
        Self { update_operations }
    }

    pub fn is_empty(&self) -> bool {
        self.update_operations.is_empty()
    }
}

impl UpdateOperation {
    /// Create a direct update
    pub fn direct(
        dependency_name: impl Into<String>,
        new_version: impl Into<String>,
        updated_files: Vec<String>,
    ) -> Self {
        UpdateOperation::DirectUpdate {
            dependency_name: dependency_name.into(),
            new_version: new_version.into(),
            updated_files,
            old_version: None,
        }
    }

    /// Create an indirect update driven by a parent bump
    pub fn indirect(
        dependency_name: impl Into<String>,
        new_version: impl Into<String>,
        updated_files: Vec<String>,
        parent_dependency_name: impl Into<String>,
        parent_new_version: impl Into<String>,
    ) -> Self {
        UpdateOperation::IndirectUpdate {
            dependency_name: dependency_name.into(),
            new_version: new_version.into(),
            updated_files,
            parent_dependency_name: parent_dependency_name.into(),
            parent_new_version: parent_new_version.into(),
            old_version: None,
        }
    }

    pub fn dependency_name(&self) -> &str {
        match self {
            UpdateOperation::DirectUpdate {
                dependency_name, ..
            }
            | UpdateOperation::PinnedUpdate {
                dependency_name, ..
            }
            | UpdateOperation::IndirectUpdate {
                dependency_name, ..
            } => dependency_name,
        }
    }

    pub fn new_version(&self) -> &str {
        match self {
            UpdateOperation::DirectUpdate { new_version, .. }
            | UpdateOperation::PinnedUpdate { new_version, .. }
            | UpdateOperation::IndirectUpdate { new_version, .. } => new_version,
        }
    }

    pub fn old_version(&self) -> Option<&str> {
        match self {
            UpdateOperation::DirectUpdate { old_version, .. }
            | UpdateOperation::PinnedUpdate { old_version, .. }
            | UpdateOperation::IndirectUpdate { old_version, .. } => old_version.as_deref(),
        }
    }

    pub fn updated_files(&self) -> &[String] {
        match self {
            UpdateOperation::DirectUpdate { updated_files, .. }
            | UpdateOperation::PinnedUpdate { updated_files, .. }
            | UpdateOperation::IndirectUpdate { updated_files, .. } => updated_files,
        }
    }

    fn updated_files_mut(&mut self) -> &mut Vec<String> {
        match self {
            UpdateOperation::DirectUpdate { updated_files, .. }
            | UpdateOperation::PinnedUpdate { updated_files, .. }
            | UpdateOperation::IndirectUpdate { updated_files, .. } => updated_files,
        }
    }

    /// Fill in the version the dependency had before the update
    pub fn with_old_version(mut self, version: Option<String>) -> Self {
        match &mut self {
            UpdateOperation::DirectUpdate { old_version, .. }
            | UpdateOperation::PinnedUpdate { old_version, .. }
            | UpdateOperation::IndirectUpdate { old_version, .. } => {
                if old_version.is_none() {
                    *old_version = version;
                }
            }
        }
        self
    }

    /// Replace the updated file list
    pub fn with_updated_files(mut self, files: Vec<String>) -> Self {
        *self.updated_files_mut() = files;
        self
    }

    fn kind_rank(&self) -> u8 {
        match self {
            UpdateOperation::DirectUpdate { .. } => 0,
            UpdateOperation::IndirectUpdate { .. } => 1,
            UpdateOperation::PinnedUpdate { .. } => 2,
        }
    }

    fn merge_key(&self) -> (u8, String, Option<String>, String, Option<(String, String)>) {
        let parent = match self {
            UpdateOperation::IndirectUpdate {
                parent_dependency_name,
                parent_new_version,
                ..
            } => Some((
                parent_dependency_name.to_ascii_lowercase(),
                parent_new_version.clone(),
            )),
            _ => None,
        };
        (
            self.kind_rank(),
            self.dependency_name().to_ascii_lowercase(),
            self.old_version().map(str::to_string),
            self.new_version().to_string(),
            parent,
        )
    }

    /// One line of the "performed updates" report
    pub fn report(&self) -> String {
        let files = self.updated_files().join(", ");
        match self {
            UpdateOperation::DirectUpdate {
                dependency_name,
                new_version,
                old_version,
                ..
            } => match old_version {
                Some(old) => format!(
                    "Updated {} from {} to {} in {}",
                    dependency_name, old, new_version, files
                ),
                None => format!("Updated {} to {} in {}", dependency_name, new_version, files),
            },
            UpdateOperation::PinnedUpdate {
                dependency_name,
                new_version,
                ..
            } => format!("Pinned {} at {} in {}", dependency_name, new_version, files),
            UpdateOperation::IndirectUpdate {
                dependency_name,
                new_version,
                parent_dependency_name,
                parent_new_version,
                ..
            } => format!(
                "Updated {} to {} indirectly via {}/{} in {}",
                dependency_name, new_version, parent_dependency_name, parent_new_version, files
            ),
        }
    }
}

/// Merge operations that describe the same change, combining their files.
///
/// The result is ordered by kind, dependency name and versions, and every
/// file list is de-duplicated and sorted.
pub fn merge_operations(operations: Vec<UpdateOperation>) -> Vec<UpdateOperation> {
    let mut merged: Vec<UpdateOperation> = Vec::new();
    for operation in operations {
        let key = operation.merge_key();
        match merged.iter_mut().find(|m| m.merge_key() == key) {
            Some(existing) => {
                let files = existing.updated_files_mut();
                files.extend(operation.updated_files().iter().cloned());
            }
            None => merged.push(operation),
        }
    }
    for operation in &mut merged {
        let files = operation.updated_files_mut();
        files.sort();
        files.dedup();
    }
    merged.sort_by(|a, b| {
        a.kind_rank()
            .cmp(&b.kind_rank())
            .then_with(|| {
                a.dependency_name()
                    .to_ascii_lowercase()
                    .cmp(&b.dependency_name().to_ascii_lowercase())
            })
            .then_with(|| compare_version_text(a.new_version(), b.new_version()))
    });
    merged
}

fn compare_version_text(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Bullet list of performed updates; empty when nothing was done
pub fn performed_updates_report(operations: &[UpdateOperation]) -> String {
    if operations.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = operations
        .iter()
        .map(|op| format!("- {}", op.report()))
        .collect();
    format!("Performed the following updates:\n{}", lines.join("\n"))
}
