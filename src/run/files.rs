//! Detecting which dependency files an update pass changed

use crate::api::DependencyFile;
use crate::domain::{join_repo_path, parent_dir, UpdateOperation, WorkspaceDiscoveryResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Snapshot of a directory's dependency files taken before updating
#[derive(Debug)]
pub struct ModifiedFilesTracker {
    repo_root: PathBuf,
    workspace_path: String,
    /// Repo-rooted path -> content before the pass (`None` if unreadable)
    original: BTreeMap<String, Option<String>>,
}

impl ModifiedFilesTracker {
    /// Record the current content of every file the discovery knows about
    pub async fn start(repo_root: &Path, discovery: &WorkspaceDiscoveryResult) -> Self {
        let mut original = BTreeMap::new();
        for path in discovery.dependency_file_paths() {
            let content = read_repo_file(repo_root, &path).await;
            original.insert(path, content);
        }
        Self {
            repo_root: repo_root.to_path_buf(),
            workspace_path: discovery.path.clone(),
            original,
        }
    }

    /// Files whose content differs from the snapshot, plus any file an
    /// operation reports as updated that was not tracked, sorted by path
    pub async fn stop(self, operations: &[UpdateOperation]) -> Vec<DependencyFile> {
        let mut changed: BTreeMap<String, String> = BTreeMap::new();
        for (path, before) in &self.original {
            let after = read_repo_file(&self.repo_root, path).await;
            if let Some(content) = after {
                if before.as_deref() != Some(content.as_str()) {
                    changed.insert(path.clone(), content);
                }
            }
        }

        for operation in operations {
            for file in operation.updated_files() {
                let path = join_repo_path("/", file);
                if self.original.contains_key(&path) || changed.contains_key(&path) {
                    continue;
                }
                if let Some(content) = read_repo_file(&self.repo_root, &path).await {
                    changed.insert(path, content);
                }
            }
        }

        changed
            .into_iter()
            .map(|(path, content)| self.dependency_file(&path, content))
            .collect()
    }

    fn dependency_file(&self, path: &str, content: String) -> DependencyFile {
        let (directory, name) = split_repo_path(&self.workspace_path, path);
        DependencyFile {
            directory,
            name,
            content,
        }
    }
}

/// Split a repo-rooted path into a directory and a file name relative to it.
/// Files below the workspace keep the workspace as their directory.
fn split_repo_path(workspace_path: &str, path: &str) -> (String, String) {
    let workspace = join_repo_path("/", workspace_path);
    let prefix = if workspace == "/" {
        "/".to_string()
    } else {
        format!("{}/", workspace)
    };
    match path.strip_prefix(&prefix) {
        Some(rest) if !rest.is_empty() => (workspace, rest.to_string()),
        _ => {
            let directory = parent_dir(path).to_string();
            let name = path
                .rsplit('/')
                .next()
                .unwrap_or(path)
                .to_string();
            (directory, name)
        }
    }
}

/// Merge file sets by path; later sets win
pub fn merge_files(sets: Vec<Vec<DependencyFile>>) -> Vec<DependencyFile> {
    let mut merged: BTreeMap<String, DependencyFile> = BTreeMap::new();
    for file in sets.into_iter().flatten() {
        merged.insert(file.path(), file);
    }
    merged.into_values().collect()
}

async fn read_repo_file(repo_root: &Path, repo_path: &str) -> Option<String> {
    let relative = repo_path.trim_start_matches('/');
    tokio::fs::read_to_string(repo_root.join(relative)).await.ok()
}
