//! Job description
//!
//! A [`Job`] is read once from the job file and never changes during a run.
//! All dependency-name comparisons are ASCII case-insensitive.

use crate::domain::analysis::DependencyInfo;
use crate::domain::pattern::{wildcard_matches, NamePatterns};
use crate::domain::{Dependency, Ecosystem, Requirement, Version};
use crate::error::JobError;
use crate::update::CooldownOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Group label used when a dependency belongs to no declared group
pub const DEFAULT_GROUP_LABEL: &str = "dependencies";

/// Top-level layout of a job file: `{"job": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFile {
    pub job: Job,
}

/// One dependency-update job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Job {
    pub package_manager: Ecosystem,
    /// Names explicitly in scope (empty = all)
    pub dependencies: Vec<String>,
    pub dependency_groups: Vec<DependencyGroup>,
    pub dependency_group_to_refresh: Option<String>,
    pub security_advisories: Vec<SecurityAdvisory>,
    pub security_updates_only: bool,
    pub updating_a_pull_request: bool,
    pub existing_pull_requests: Vec<ExistingPullRequest>,
    pub existing_group_pull_requests: Vec<ExistingGroupPullRequest>,
    pub ignore_conditions: Vec<IgnoreCondition>,
    /// Empty means "direct dependencies, all update types"
    pub allowed_updates: Vec<AllowedUpdate>,
    pub cooldown: Option<CooldownOptions>,
    pub source: JobSource,
}

/// Where the job's manifests live
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct JobSource {
    pub provider: Option<String>,
    pub repo: Option<String>,
    pub directory: Option<String>,
    pub directories: Vec<String>,
}

impl JobSource {
    /// Target directories in job order, repo-rooted; `/` when none are given
    pub fn all_directories(&self) -> Vec<String> {
        let listed: Vec<&str> = if !self.directories.is_empty() {
            self.directories.iter().map(String::as_str).collect()
        } else if let Some(directory) = &self.directory {
            vec![directory.as_str()]
        } else {
            vec!["/"]
        };
        listed
            .into_iter()
            .map(|d| crate::domain::join_repo_path("/", d))
            .collect()
    }
}

/// A named group of dependencies updated together in one PR
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DependencyGroup {
    pub name: String,
    pub rules: GroupRules,
    pub applies_to: Option<GroupAppliesTo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GroupRules {
    /// Empty means every dependency matches
    pub patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupAppliesTo {
    VersionUpdates,
    SecurityUpdates,
}

impl DependencyGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.rules.patterns = patterns;
        self
    }

    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.rules.exclude_patterns = patterns;
        self
    }

    pub fn with_applies_to(mut self, applies_to: GroupAppliesTo) -> Self {
        self.applies_to = Some(applies_to);
        self
    }

    /// Whether the group's rules claim this dependency name
    pub fn matches(&self, dependency_name: &str) -> bool {
        if NamePatterns::new(&self.rules.exclude_patterns).is_match(dependency_name) {
            return false;
        }
        let patterns = NamePatterns::new(&self.rules.patterns);
        patterns.is_empty() || patterns.is_match(dependency_name)
    }

    /// Whether the group is considered for this kind of job
    pub fn applies_to_job(&self, security_updates_only: bool) -> bool {
        match self.applies_to {
            None => true,
            Some(GroupAppliesTo::SecurityUpdates) => security_updates_only,
            Some(GroupAppliesTo::VersionUpdates) => !security_updates_only,
        }
    }
}

/// A published advisory for one dependency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SecurityAdvisory {
    pub dependency_name: String,
    pub affected_versions: Vec<Requirement>,
    pub patched_versions: Vec<Requirement>,
    pub unaffected_versions: Vec<Requirement>,
}

impl SecurityAdvisory {
    /// Whether `version` is covered by this advisory.
    ///
    /// With explicit affected ranges only those count; otherwise anything not
    /// patched and not unaffected is vulnerable.
    pub fn is_vulnerable(&self, version: &Version) -> bool {
        if !self.affected_versions.is_empty() {
            return self.affected_versions.iter().any(|r| r.satisfied_by(version));
        }
        let safe = self
            .patched_versions
            .iter()
            .chain(&self.unaffected_versions)
            .collect::<Vec<_>>();
        !safe.is_empty() && !safe.iter().any(|r| r.satisfied_by(version))
    }
}

/// Semver update types an ignore condition can exclude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateType {
    #[serde(rename = "version-update:semver-major")]
    SemverMajor,
    #[serde(rename = "version-update:semver-minor")]
    SemverMinor,
    #[serde(rename = "version-update:semver-patch")]
    SemverPatch,
}

/// Keeps matching dependencies (or some of their versions) out of updates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct IgnoreCondition {
    /// Wildcard pattern
    pub dependency_name: String,
    pub version_requirement: Option<Requirement>,
    pub update_types: Vec<UpdateType>,
}

impl IgnoreCondition {
    pub fn matches_name(&self, dependency_name: &str) -> bool {
        wildcard_matches(&self.dependency_name, dependency_name)
    }

    /// No version or update-type qualifier: the whole dependency is ignored
    pub fn is_name_only(&self) -> bool {
        self.version_requirement.is_none() && self.update_types.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllowedDependencyType {
    #[default]
    Direct,
    Indirect,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllowedUpdateType {
    #[default]
    All,
    Security,
}

/// One entry of the allow list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AllowedUpdate {
    pub dependency_type: AllowedDependencyType,
    pub update_type: AllowedUpdateType,
}

/// A dependency recorded on an open pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PullRequestDependency {
    pub dependency_name: String,
    pub dependency_version: Option<String>,
    pub directory: Option<String>,
}

impl PullRequestDependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            dependency_name: name.into(),
            dependency_version: Some(version.into()),
            directory: None,
        }
    }
}

/// An open pull request previously created for this repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExistingPullRequest {
    pub dependencies: Vec<PullRequestDependency>,
}

/// An open grouped pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExistingGroupPullRequest {
    pub dependency_group_name: String,
    pub dependencies: Vec<PullRequestDependency>,
}

impl ExistingPullRequest {
    /// Whether this PR holds exactly the given names (and versions when asked)
    pub fn matches(&self, wanted: &[(String, String)], consider_versions: bool) -> bool {
        if self.dependencies.len() != wanted.len() {
            return false;
        }
        wanted.iter().all(|(name, version)| {
            self.dependencies.iter().any(|d| {
                d.dependency_name.eq_ignore_ascii_case(name)
                    && (!consider_versions
                        || d.dependency_version
                            .as_deref()
                            .is_some_and(|v| versions_equal(v, version)))
            })
        })
    }

    /// Whether any dependency on this PR has the given name
    pub fn contains(&self, name: &str) -> bool {
        self.dependencies
            .iter()
            .any(|d| d.dependency_name.eq_ignore_ascii_case(name))
    }
}

fn versions_equal(a: &str, b: &str) -> bool {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.eq_ignore_ascii_case(b),
    }
}

impl Job {
    /// Read a job file (`{"job": {...}}`)
    pub fn from_file(path: &Path) -> Result<Job, JobError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| JobError::read_error(path, e))?;
        Self::from_json(&content).map_err(|message| JobError::parse_error(path, message))
    }

    /// Parse the contents of a job file
    pub fn from_json(content: &str) -> Result<Job, String> {
        serde_json::from_str::<JobFile>(content)
            .map(|file| file.job)
            .map_err(|e| e.to_string())
    }

    /// Whether the job scope includes this dependency name
    pub fn is_in_scope(&self, dependency_name: &str) -> bool {
        self.dependencies.is_empty()
            || self
                .dependencies
                .iter()
                .any(|d| d.eq_ignore_ascii_case(dependency_name))
    }

    /// Advisories published for this dependency name
    pub fn advisories_for<'a>(
        &'a self,
        dependency_name: &'a str,
    ) -> impl Iterator<Item = &'a SecurityAdvisory> + 'a {
        self.security_advisories
            .iter()
            .filter(move |a| a.dependency_name.eq_ignore_ascii_case(dependency_name))
    }

    /// Whether the dependency's current version is covered by an advisory
    pub fn is_vulnerable(&self, dependency: &Dependency) -> bool {
        let Some(version) = dependency.parsed_version() else {
            return false;
        };
        self.advisories_for(&dependency.name)
            .any(|a| a.is_vulnerable(&version))
    }

    /// Whether an ignore condition without qualifiers names this dependency
    pub fn is_dependency_ignored_by_name_only(&self, dependency_name: &str) -> bool {
        self.ignore_conditions
            .iter()
            .any(|c| c.is_name_only() && c.matches_name(dependency_name))
    }

    /// Allow-list check
    pub fn is_update_permitted(&self, dependency: &Dependency) -> bool {
        let vulnerable = self.is_vulnerable(dependency);
        if self.security_updates_only {
            return vulnerable;
        }

        let default_allowed = [AllowedUpdate::default()];
        let allowed = if self.allowed_updates.is_empty() {
            &default_allowed[..]
        } else {
            &self.allowed_updates[..]
        };
        allowed.iter().any(|rule| {
            let type_ok = match rule.dependency_type {
                AllowedDependencyType::Direct => !dependency.is_transitive,
                AllowedDependencyType::Indirect => dependency.is_transitive,
                AllowedDependencyType::All => true,
            };
            let update_ok = match rule.update_type {
                AllowedUpdateType::All => true,
                AllowedUpdateType::Security => vulnerable,
            };
            type_ok && update_ok
        })
    }

    /// Open PR holding exactly these dependencies
    pub fn existing_pull_request_for(
        &self,
        dependencies: &[(String, String)],
        consider_versions: bool,
    ) -> Option<&ExistingPullRequest> {
        self.existing_pull_requests
            .iter()
            .find(|pr| pr.matches(dependencies, consider_versions))
    }

    /// Open grouped PR for this group name
    pub fn existing_group_pull_request(&self, group_name: &str) -> Option<&ExistingGroupPullRequest> {
        self.existing_group_pull_requests
            .iter()
            .find(|pr| pr.dependency_group_name == group_name)
    }

    /// Groups considered for this job type, in declared order
    pub fn applicable_groups(&self) -> impl Iterator<Item = &DependencyGroup> {
        self.dependency_groups
            .iter()
            .filter(|g| g.applies_to_job(self.security_updates_only))
    }

    /// First applicable group claiming this dependency
    pub fn applicable_group_for(&self, dependency_name: &str) -> Option<&DependencyGroup> {
        self.applicable_groups().find(|g| g.matches(dependency_name))
    }

    /// Group a dependency belongs to when refreshing: the first applicable
    /// group, else the first declared one
    pub fn assigned_group(&self, dependency_name: &str) -> Option<&DependencyGroup> {
        self.applicable_group_for(dependency_name).or_else(|| {
            self.dependency_groups
                .iter()
                .find(|g| g.matches(dependency_name))
        })
    }

    /// Group label reported for a discovered dependency
    pub fn group_label(&self, dependency_name: &str) -> &str {
        self.applicable_group_for(dependency_name)
            .map(|g| g.name.as_str())
            .unwrap_or(DEFAULT_GROUP_LABEL)
    }

    /// The group named by `dependency-group-to-refresh`
    pub fn group_to_refresh(&self) -> Result<Option<&DependencyGroup>, JobError> {
        let Some(name) = &self.dependency_group_to_refresh else {
            return Ok(None);
        };
        self.dependency_groups
            .iter()
            .find(|g| &g.name == name)
            .map(Some)
            .ok_or_else(|| JobError::unknown_group(name))
    }

    /// Build the analyzer input for a discovered dependency
    pub fn dependency_info(&self, dependency: &Dependency) -> DependencyInfo {
        let matching_conditions: Vec<&IgnoreCondition> = self
            .ignore_conditions
            .iter()
            .filter(|c| c.matches_name(&dependency.name))
            .collect();

        let ignored_versions = matching_conditions
            .iter()
            .filter_map(|c| c.version_requirement.clone())
            .collect();
        let mut ignored_update_types: Vec<UpdateType> = Vec::new();
        for update_type in matching_conditions.iter().flat_map(|c| &c.update_types) {
            if !ignored_update_types.contains(update_type) {
                ignored_update_types.push(*update_type);
            }
        }

        let cooldown = if self.security_updates_only {
            None
        } else {
            self.cooldown
                .clone()
                .filter(|c| c.is_enabled() && c.applies_to(&dependency.name))
        };

        DependencyInfo {
            name: dependency.name.clone(),
            version: dependency.version.clone().unwrap_or_default(),
            is_vulnerable: self.is_vulnerable(dependency),
            ignored_versions,
            ignored_update_types,
            vulnerabilities: self.advisories_for(&dependency.name).cloned().collect(),
            cooldown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advisory(name: &str, affected: &[&str], patched: &[&str]) -> SecurityAdvisory {
        SecurityAdvisory {
            dependency_name: name.to_string(),
            affected_versions: affected.iter().map(|r| Requirement::parse(r).unwrap()).collect(),
            patched_versions: patched.iter().map(|r| Requirement::parse(r).unwrap()).collect(),
            unaffected_versions: vec![],
        }
    }

    fn allowed(dependency_type: AllowedDependencyType, update_type: AllowedUpdateType) -> AllowedUpdate {
        AllowedUpdate {
            dependency_type,
            update_type,
        }
    }

    #[test]
    fn test_parse_job_file() {
        let json = r#"{
            "job": {
                "package-manager": "nuget",
                "dependencies": ["Some.Package"],
                "security-updates-only": true,
                "security-advisories": [
                    {"dependency-name": "Some.Package", "affected-versions": ["< 1.1.0"]}
                ],
                "existing-pull-requests": [
                    {"dependencies": [{"dependency-name": "Some.Package", "dependency-version": "1.1.0"}]}
                ],
                "ignore-conditions": [{"dependency-name": "Ignored.*"}],
                "source": {"provider": "github", "repo": "test/repo", "directory": "src"}
            }
        }"#;
        let job = Job::from_json(json).unwrap();
        assert_eq!(job.package_manager, Ecosystem::NuGet);
        assert!(job.security_updates_only);
        assert!(!job.updating_a_pull_request);
        assert_eq!(job.security_advisories.len(), 1);
        assert_eq!(job.source.all_directories(), vec!["/src"]);
        assert!(job.is_dependency_ignored_by_name_only("ignored.package"));
    }

    #[test]
    fn test_parse_job_rejects_bad_requirement() {
        let json = r#"{"job": {"security-advisories": [{"dependency-name": "X", "affected-versions": [">> 1"]}]}}"#;
        assert!(Job::from_json(json).is_err());
    }

    #[test]
    fn test_all_directories_defaults_to_root() {
        assert_eq!(JobSource::default().all_directories(), vec!["/"]);
        let source = JobSource {
            directories: vec!["/a".to_string(), "b/".to_string()],
            ..JobSource::default()
        };
        assert_eq!(source.all_directories(), vec!["/a", "/b"]);
    }

    #[test]
    fn test_is_in_scope() {
        let mut job = Job::default();
        assert!(job.is_in_scope("Anything"));
        job.dependencies = vec!["Some.Package".to_string()];
        assert!(job.is_in_scope("some.package"));
        assert!(!job.is_in_scope("Other.Package"));
    }

    #[test]
    fn test_is_vulnerable_with_affected_ranges() {
        let job = Job {
            security_advisories: vec![advisory("Some.Package", &["< 1.1.0"], &[])],
            ..Job::default()
        };
        assert!(job.is_vulnerable(&Dependency::new("some.package", "1.0.0")));
        assert!(!job.is_vulnerable(&Dependency::new("Some.Package", "1.1.0")));
        assert!(!job.is_vulnerable(&Dependency::new("Other.Package", "1.0.0")));
    }

    #[test]
    fn test_is_vulnerable_with_only_patched_versions() {
        let job = Job {
            security_advisories: vec![advisory("Some.Package", &[], &[">= 1.11.0"])],
            ..Job::default()
        };
        assert!(job.is_vulnerable(&Dependency::new("Some.Package", "1.8.0")));
        assert!(!job.is_vulnerable(&Dependency::new("Some.Package", "1.11.0")));
    }

    #[test]
    fn test_update_permitted_defaults_to_direct_only() {
        let job = Job::default();
        assert!(job.is_update_permitted(&Dependency::new("Some.Package", "1.8.0")));
        assert!(!job.is_update_permitted(&Dependency::new("Some.Package", "1.8.0").transitive()));
    }

    #[test]
    fn test_update_permitted_indirect_security_rule() {
        let mut job = Job {
            allowed_updates: vec![
                allowed(AllowedDependencyType::Direct, AllowedUpdateType::All),
                allowed(AllowedDependencyType::Indirect, AllowedUpdateType::Security),
            ],
            ..Job::default()
        };
        let transitive = Dependency::new("Some.Package", "1.8.0").transitive();
        assert!(!job.is_update_permitted(&transitive));

        job.security_advisories = vec![advisory("Some.Package", &[], &[">= 1.11.0"])];
        assert!(job.is_update_permitted(&transitive));
    }

    #[test]
    fn test_update_permitted_security_only_requires_vulnerability() {
        let mut job = Job {
            security_updates_only: true,
            ..Job::default()
        };
        let direct = Dependency::new("Some.Package", "1.8.0");
        assert!(!job.is_update_permitted(&direct));

        job.security_advisories = vec![advisory("Some.Package", &[], &[">= 1.11.0"])];
        assert!(job.is_update_permitted(&direct));
        assert!(job.is_update_permitted(&direct.clone().transitive()));
    }

    #[test]
    fn test_ignore_conditions() {
        let job = Job {
            ignore_conditions: vec![
                IgnoreCondition {
                    dependency_name: "Some.*".to_string(),
                    version_requirement: Some(Requirement::parse(">= 2.0").unwrap()),
                    update_types: vec![],
                },
                IgnoreCondition {
                    dependency_name: "Some.Package".to_string(),
                    version_requirement: None,
                    update_types: vec![UpdateType::SemverMajor],
                },
            ],
            ..Job::default()
        };
        assert!(!job.is_dependency_ignored_by_name_only("Some.Package"));

        let info = job.dependency_info(&Dependency::new("Some.Package", "1.0.0"));
        assert_eq!(info.ignored_versions.len(), 1);
        assert_eq!(info.ignored_update_types, vec![UpdateType::SemverMajor]);
        assert!(!info.is_vulnerable);
    }

    #[test]
    fn test_existing_pull_request_matching() {
        let job = Job {
            existing_pull_requests: vec![ExistingPullRequest {
                dependencies: vec![PullRequestDependency::new("Some.Package", "2.0.0")],
            }],
            ..Job::default()
        };
        let same = vec![("some.package".to_string(), "2.0".to_string())];
        let newer = vec![("Some.Package".to_string(), "2.0.1".to_string())];
        assert!(job.existing_pull_request_for(&same, true).is_some());
        assert!(job.existing_pull_request_for(&newer, true).is_none());
        assert!(job.existing_pull_request_for(&newer, false).is_some());

        let more = vec![
            ("Some.Package".to_string(), "2.0.0".to_string()),
            ("Other".to_string(), "1.0.0".to_string()),
        ];
        assert!(job.existing_pull_request_for(&more, false).is_none());
    }

    #[test]
    fn test_groups() {
        let job = Job {
            dependency_groups: vec![
                DependencyGroup::new("security-group")
                    .with_applies_to(GroupAppliesTo::SecurityUpdates),
                DependencyGroup::new("microsoft")
                    .with_patterns(vec!["Microsoft.*".to_string()])
                    .with_exclude_patterns(vec!["Microsoft.Build".to_string()]),
            ],
            ..Job::default()
        };
        assert_eq!(job.applicable_groups().count(), 1);
        assert_eq!(
            job.applicable_group_for("Microsoft.Extensions.Logging").map(|g| g.name.as_str()),
            Some("microsoft")
        );
        assert!(job.applicable_group_for("Microsoft.Build").is_none());
        assert_eq!(job.group_label("Microsoft.Extensions.Logging"), "microsoft");
        assert_eq!(job.group_label("Newtonsoft.Json"), DEFAULT_GROUP_LABEL);
        assert_eq!(Job::default().group_label("Newtonsoft.Json"), DEFAULT_GROUP_LABEL);
    }

    #[test]
    fn test_group_label_skips_groups_for_other_job_kinds() {
        let groups = vec![
            DependencyGroup::new("security-group").with_applies_to(GroupAppliesTo::SecurityUpdates),
            DependencyGroup::new("everything"),
        ];
        let mut job = Job {
            dependency_groups: groups,
            ..Job::default()
        };
        assert_eq!(job.group_label("Some.Package"), "everything");

        job.security_updates_only = true;
        assert_eq!(job.group_label("Some.Package"), "security-group");
    }

    #[test]
    fn test_assigned_group_is_first_declared_match() {
        let job = Job {
            dependency_groups: vec![
                DependencyGroup::new("security-only")
                    .with_applies_to(GroupAppliesTo::SecurityUpdates)
                    .with_patterns(vec!["Secure.*".to_string()]),
                DependencyGroup::new("first").with_patterns(vec!["Test.*".to_string()]),
                DependencyGroup::new("second").with_patterns(vec!["*".to_string()]),
            ],
            ..Job::default()
        };
        assert_eq!(job.assigned_group("Test.A").map(|g| g.name.as_str()), Some("first"));
        assert_eq!(job.assigned_group("Other").map(|g| g.name.as_str()), Some("second"));
        // an applicable group claims the name before a declared-but-inapplicable one
        assert_eq!(job.assigned_group("Secure.Lib").map(|g| g.name.as_str()), Some("second"));
        assert!(Job::default().assigned_group("Other").is_none());
    }

    #[test]
    fn test_group_to_refresh() {
        let mut job = Job {
            dependency_groups: vec![DependencyGroup::new("test-group")],
            dependency_group_to_refresh: Some("test-group".to_string()),
            ..Job::default()
        };
        assert_eq!(job.group_to_refresh().unwrap().unwrap().name, "test-group");

        job.dependency_group_to_refresh = Some("missing".to_string());
        assert!(matches!(job.group_to_refresh(), Err(JobError::UnknownGroup { .. })));

        job.dependency_group_to_refresh = None;
        assert!(job.group_to_refresh().unwrap().is_none());
    }

    #[test]
    fn test_dependency_info_cooldown_only_for_version_updates() {
        let mut job = Job {
            cooldown: Some(CooldownOptions::new(5).with_exclude(vec!["Excluded".to_string()])),
            ..Job::default()
        };
        assert!(job.dependency_info(&Dependency::new("Some.Package", "1.0.0")).cooldown.is_some());
        assert!(job.dependency_info(&Dependency::new("Excluded", "1.0.0")).cooldown.is_none());

        job.security_updates_only = true;
        assert!(job.dependency_info(&Dependency::new("Some.Package", "1.0.0")).cooldown.is_none());
    }
}
