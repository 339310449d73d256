//! Discovery snapshot of one job directory
//!
//! A [`WorkspaceDiscoveryResult`] is produced once per directory by the
//! discovery collaborator and never mutated afterwards. Project file paths
//! are relative to the workspace path; imported and additional files are
//! relative to the directory of the project that references them.

use crate::domain::Version;
use serde::{Deserialize, Serialize};

/// How a dependency is declared in its project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyType {
    PackageReference,
    PackageVersion,
    GlobalPackageReference,
    PackagesConfig,
    Requirement,
    Module,
    Provider,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A dependency as found in a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Dependency {
    pub name: String,
    /// Declared or resolved version; `None` when discovery could not resolve it
    #[serde(default)]
    pub version: Option<String>,
    #[serde(rename = "type", default)]
    pub dependency_type: DependencyType,
    #[serde(default)]
    pub target_frameworks: Vec<String>,
    #[serde(default)]
    pub is_transitive: bool,
}

impl Dependency {
    /// Create a direct dependency with a known version
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
            dependency_type: DependencyType::PackageReference,
            target_frameworks: Vec::new(),
            is_transitive: false,
        }
    }

    /// Mark this dependency as transitive
    pub fn transitive(mut self) -> Self {
        self.is_transitive = true;
        self
    }

    /// Set the dependency type
    pub fn with_type(mut self, dependency_type: DependencyType) -> Self {
        self.dependency_type = dependency_type;
        self
    }

    /// The version parsed, if present and well-formed
    pub fn parsed_version(&self) -> Option<Version> {
        self.version.as_deref().and_then(|v| Version::parse(v).ok())
    }

    /// Case-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Discovery result for a single project file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectDiscoveryResult {
    pub file_path: String,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub imported_files: Vec<String>,
    #[serde(default)]
    pub additional_files: Vec<String>,
}

impl ProjectDiscoveryResult {
    pub fn new(file_path: impl Into<String>, dependencies: Vec<Dependency>) -> Self {
        Self {
            file_path: file_path.into(),
            dependencies,
            imported_files: Vec::new(),
            additional_files: Vec::new(),
        }
    }

    pub fn with_imported_files(mut self, files: Vec<String>) -> Self {
        self.imported_files = files;
        self
    }

    pub fn with_additional_files(mut self, files: Vec<String>) -> Self {
        self.additional_files = files;
        self
    }

    /// First dependency with the given name
    pub fn find_dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.is_named(name))
    }

    /// Repo-rooted path of this project file
    pub fn repo_path(&self, workspace_path: &str) -> String {
        join_repo_path(workspace_path, &self.file_path)
    }

    /// Repo-rooted paths of every file this project depends on, project first
    pub fn repo_file_paths(&self, workspace_path: &str) -> Vec<String> {
        let project_path = self.repo_path(workspace_path);
        let project_dir = parent_dir(&project_path);
        std::iter::once(project_path.clone())
            .chain(
                self.imported_files
                    .iter()
                    .chain(&self.additional_files)
                    .map(|f| join_repo_path(project_dir, f)),
            )
            .collect()
    }
}

/// Discovery result for one job directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkspaceDiscoveryResult {
    /// Repo-rooted directory, e.g. `/src`
    pub path: String,
    #[serde(default)]
    pub projects: Vec<ProjectDiscoveryResult>,
}

impl WorkspaceDiscoveryResult {
    pub fn new(path: impl Into<String>, projects: Vec<ProjectDiscoveryResult>) -> Self {
        Self {
            path: path.into(),
            projects,
        }
    }

    /// Projects ordered by repo path
    pub fn projects_by_path(&self) -> Vec<&ProjectDiscoveryResult> {
        let mut projects: Vec<_> = self.projects.iter().collect();
        projects.sort_by_key(|p| p.repo_path(&self.path).to_ascii_lowercase());
        projects
    }

    /// Whether any project declares a dependency with this name
    pub fn contains_dependency(&self, name: &str) -> bool {
        self.projects
            .iter()
            .any(|p| p.find_dependency(name).is_some())
    }

    /// Every versioned dependency, in project then declaration order
    pub fn versioned_dependencies(
        &self,
    ) -> impl Iterator<Item = (&ProjectDiscoveryResult, &Dependency)> {
        self.projects.iter().flat_map(|p| {
            p.dependencies
                .iter()
                .filter(|d| d.version.is_some())
                .map(move |d| (p, d))
        })
    }

    /// Repo-rooted paths of all project, imported and additional files,
    /// de-duplicated and sorted
    pub fn dependency_file_paths(&self) -> Vec<String> {
        let mut files: Vec<String> = self
            .projects
            .iter()
            .flat_map(|p| p.repo_file_paths(&self.path))
            .collect();
        files.sort();
        files.dedup();
        files
    }
}

/// Join a repo-rooted directory with a relative path.
///
/// Separators are normalized to `/`, `.` and `..` segments are resolved and
/// the result always starts with `/`.
pub fn join_repo_path(directory: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in directory
        .split(['/', '\\'])
        .chain(relative.split(['/', '\\']))
    {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Directory part of a repo-rooted path (`/a/b.csproj` -> `/a`)
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_repo_path() {
        assert_eq!(join_repo_path("/", "project.csproj"), "/project.csproj");
        assert_eq!(join_repo_path("/src", "app/app.csproj"), "/src/app/app.csproj");
        assert_eq!(join_repo_path("src/", ".\\app\\app.csproj"), "/src/app/app.csproj");
        assert_eq!(join_repo_path("/src/app", "../Directory.Packages.props"), "/src/Directory.Packages.props");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("/project.csproj"), "/");
        assert_eq!(parent_dir("/src/app/app.csproj"), "/src/app");
    }

    #[test]
    fn test_repo_file_paths_resolve_relative_to_project() {
        let project = ProjectDiscoveryResult::new("app/app.csproj", vec![])
            .with_imported_files(vec!["../Directory.Build.props".to_string()])
            .with_additional_files(vec!["packages.config".to_string()]);
        assert_eq!(
            project.repo_file_paths("/src"),
            vec![
                "/src/app/app.csproj",
                "/src/Directory.Build.props",
                "/src/app/packages.config"
            ]
        );
    }

    #[test]
    fn test_dependency_file_paths_dedup_and_sorted() {
        let shared = vec!["Directory.Packages.props".to_string()];
        let ws = WorkspaceDiscoveryResult::new(
            "/",
            vec![
                ProjectDiscoveryResult::new("b.csproj", vec![]).with_imported_files(shared.clone()),
                ProjectDiscoveryResult::new("a.csproj", vec![]).with_imported_files(shared),
            ],
        );
        assert_eq!(
            ws.dependency_file_paths(),
            vec!["/Directory.Packages.props", "/a.csproj", "/b.csproj"]
        );
    }

    #[test]
    fn test_versioned_dependencies_skip_unresolved() {
        let mut unresolved = Dependency::new("Unresolved", "1.0.0");
        unresolved.version = None;
        let ws = WorkspaceDiscoveryResult::new(
            "/",
            vec![ProjectDiscoveryResult::new(
                "project.csproj",
                vec![Dependency::new("Some.Package", "1.0.0"), unresolved],
            )],
        );
        let names: Vec<_> = ws.versioned_dependencies().map(|(_, d)| d.name.as_str()).collect();
        assert_eq!(names, vec!["Some.Package"]);
        assert!(ws.contains_dependency("some.package"));
        assert!(ws.contains_dependency("Unresolved"));
    }

    #[test]
    fn test_deserialize_kebab_case() {
        let json = r#"{
            "path": "/src",
            "projects": [{
                "file-path": "project.csproj",
                "dependencies": [
                    {"name": "Some.Package", "version": "1.0.0", "type": "package-reference", "target-frameworks": ["net8.0"]},
                    {"name": "Transitive.Package", "version": "2.0.0", "type": "weird", "is-transitive": true}
                ]
            }]
        }"#;
        let ws: WorkspaceDiscoveryResult = serde_json::from_str(json).unwrap();
        let deps = &ws.projects[0].dependencies;
        assert_eq!(deps[0].dependency_type, DependencyType::PackageReference);
        assert_eq!(deps[0].target_frameworks, vec!["net8.0"]);
        assert_eq!(deps[1].dependency_type, DependencyType::Unknown);
        assert!(deps[1].is_transitive);
    }
}
