//! Handler selection from job flags

use crate::domain::Job;
use std::fmt;

/// Which handler runs a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    GroupUpdateAllVersions,
    CreateSecurityUpdatePullRequest,
    RefreshGroupUpdatePullRequest,
    RefreshSecurityUpdatePullRequest,
    RefreshVersionUpdatePullRequest,
}

impl HandlerKind {
    /// Operation tag used on the `updater.started` metric
    pub fn tag_name(&self) -> &'static str {
        match self {
            HandlerKind::GroupUpdateAllVersions => "group_update_all_versions",
            HandlerKind::CreateSecurityUpdatePullRequest => "create_security_pr",
            HandlerKind::RefreshGroupUpdatePullRequest => "update_version_group_pr",
            HandlerKind::RefreshSecurityUpdatePullRequest => "update_security_pr",
            HandlerKind::RefreshVersionUpdatePullRequest => "update_version_pr",
        }
    }

    pub fn all() -> &'static [HandlerKind] {
        &[
            HandlerKind::GroupUpdateAllVersions,
            HandlerKind::CreateSecurityUpdatePullRequest,
            HandlerKind::RefreshGroupUpdatePullRequest,
            HandlerKind::RefreshSecurityUpdatePullRequest,
            HandlerKind::RefreshVersionUpdatePullRequest,
        ]
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag_name())
    }
}

/// Pick the handler for a job.
///
/// Exactly one handler applies to every combination of flags.
pub fn select_handler(job: &Job) -> HandlerKind {
    if !job.updating_a_pull_request {
        if !job.security_updates_only
            || job.dependencies.is_empty()
            || !job.dependency_groups.is_empty()
        {
            HandlerKind::GroupUpdateAllVersions
        } else {
            HandlerKind::CreateSecurityUpdatePullRequest
        }
    } else if job.dependency_group_to_refresh.is_some() {
        HandlerKind::RefreshGroupUpdatePullRequest
    } else if job.security_updates_only {
        HandlerKind::RefreshSecurityUpdatePullRequest
    } else {
        HandlerKind::RefreshVersionUpdatePullRequest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependencyGroup;

    fn job(
        updating: bool,
        security_only: bool,
        dependencies: bool,
        groups: bool,
        refresh_group: bool,
    ) -> Job {
        Job {
            updating_a_pull_request: updating,
            security_updates_only: security_only,
            dependencies: if dependencies {
                vec!["Some.Package".to_string()]
            } else {
                vec![]
            },
            dependency_groups: if groups {
                vec![DependencyGroup::new("group")]
            } else {
                vec![]
            },
            dependency_group_to_refresh: refresh_group.then(|| "group".to_string()),
            ..Job::default()
        }
    }

    #[test]
    fn test_new_version_updates_use_group_handler() {
        assert_eq!(
            select_handler(&job(false, false, false, false, false)),
            HandlerKind::GroupUpdateAllVersions
        );
        assert_eq!(
            select_handler(&job(false, false, true, false, false)),
            HandlerKind::GroupUpdateAllVersions
        );
    }

    #[test]
    fn test_targeted_security_update() {
        assert_eq!(
            select_handler(&job(false, true, true, false, false)),
            HandlerKind::CreateSecurityUpdatePullRequest
        );
    }

    #[test]
    fn test_security_update_with_groups_or_no_targets() {
        assert_eq!(
            select_handler(&job(false, true, true, true, false)),
            HandlerKind::GroupUpdateAllVersions
        );
        assert_eq!(
            select_handler(&job(false, true, false, false, false)),
            HandlerKind::GroupUpdateAllVersions
        );
    }

    #[test]
    fn test_refresh_handlers() {
        assert_eq!(
            select_handler(&job(true, false, true, true, true)),
            HandlerKind::RefreshGroupUpdatePullRequest
        );
        assert_eq!(
            select_handler(&job(true, true, true, false, false)),
            HandlerKind::RefreshSecurityUpdatePullRequest
        );
        assert_eq!(
            select_handler(&job(true, false, true, false, false)),
            HandlerKind::RefreshVersionUpdatePullRequest
        );
    }

    #[test]
    fn test_every_flag_combination_selects_one_handler() {
        for bits in 0..32u8 {
            let flags: Vec<bool> = (0..5).map(|i| bits & (1 << i) != 0).collect();
            let j = job(flags[0], flags[1], flags[2], flags[3], flags[4]);
            let kind = select_handler(&j);
            assert!(HandlerKind::all().contains(&kind));
            if !j.updating_a_pull_request {
                assert!(matches!(
                    kind,
                    HandlerKind::GroupUpdateAllVersions
                        | HandlerKind::CreateSecurityUpdatePullRequest
                ));
            } else if j.dependency_group_to_refresh.is_some() {
                assert_eq!(kind, HandlerKind::RefreshGroupUpdatePullRequest);
            }
        }
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(HandlerKind::CreateSecurityUpdatePullRequest.to_string(), "create_security_pr");
        assert_eq!(HandlerKind::RefreshGroupUpdatePullRequest.tag_name(), "update_version_group_pr");
    }
}
