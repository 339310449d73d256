//! CLI argument parsing module for depjob

use crate::error::ConfigError;
use crate::update::CooldownOptions;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parse a day count in format: N or Nd (days), Nw (weeks), Nm (months)
pub fn parse_days(s: &str) -> Result<u32, String> {
    let invalid = || {
        ConfigError::InvalidDays {
            value: s.to_string(),
        }
        .to_string()
    };

    let s = s.trim();
    if s.is_empty() {
        return Err(invalid());
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('d') {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('w') {
        (n, 7)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 30) // months (30 days)
    } else {
        (s, 1)
    };

    let num: u32 = num_str.parse().map_err(|_| invalid())?;
    num.checked_mul(multiplier).ok_or_else(invalid)
}

/// Dependency update job runner
#[derive(Parser, Debug, Clone)]
#[command(name = "depjob", version, about = "Dependency update job runner")]
pub struct CliArgs {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run an update job and report its events
    Run(RunArgs),
    /// Print the handler a job would run with
    Select(SelectArgs),
    /// Pick the version to update to from a list of release candidates
    PickVersion(PickVersionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Job file (`{"job": {...}}`)
    #[arg(long)]
    pub job: PathBuf,

    /// Repository checkout the job operates on
    #[arg(long)]
    pub repo_root: PathBuf,

    /// Commit the job runs against
    #[arg(long)]
    pub base_commit_sha: String,

    /// Config file (default: ./depjob.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the PR-management service
    #[arg(long)]
    pub api_url: Option<String>,

    /// Job id used in service URLs
    #[arg(long)]
    pub job_id: Option<String>,

    /// Write the emitted events to this file as JSON
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    /// Job file (`{"job": {...}}`)
    #[arg(long)]
    pub job: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct PickVersionArgs {
    /// JSON file with `[{"version": "...", "released-at": "..."}]`
    #[arg(long)]
    pub candidates: PathBuf,

    /// Installed version
    #[arg(long)]
    pub current: Option<String>,

    /// Ignore versions matching this requirement (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Default cooldown (e.g., 7, 10d, 2w, 1m)
    #[arg(long, value_parser = parse_days)]
    pub cooldown: Option<u32>,

    /// Cooldown for major updates
    #[arg(long, value_parser = parse_days)]
    pub major: Option<u32>,

    /// Cooldown for minor updates
    #[arg(long, value_parser = parse_days)]
    pub minor: Option<u32>,

    /// Cooldown for patch updates
    #[arg(long, value_parser = parse_days)]
    pub patch: Option<u32>,
}

impl PickVersionArgs {
    /// Cooldown options from the day flags, `None` when no flag is given
    pub fn cooldown_options(&self) -> Option<CooldownOptions> {
        if self.cooldown.is_none()
            && self.major.is_none()
            && self.minor.is_none()
            && self.patch.is_none()
        {
            return None;
        }
        Some(
            CooldownOptions::new(self.cooldown.unwrap_or(0))
                .with_major_days(self.major.unwrap_or(0))
                .with_minor_days(self.minor.unwrap_or(0))
                .with_patch_days(self.patch.unwrap_or(0)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_run_args() {
        let args = CliArgs::parse_from([
            "depjob",
            "run",
            "--job",
            "job.json",
            "--repo-root",
            "/repo",
            "--base-commit-sha",
            "abc123",
        ]);
        assert!(!args.verbose);
        assert!(!args.quiet);
        match args.command {
            Command::Run(run) => {
                assert_eq!(run.job, PathBuf::from("job.json"));
                assert_eq!(run.repo_root, PathBuf::from("/repo"));
                assert_eq!(run.base_commit_sha, "abc123");
                assert!(run.config.is_none());
                assert!(run.api_url.is_none());
                assert!(run.output.is_none());
                assert!(!run.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_run_requires_base_commit_sha() {
        let result =
            CliArgs::try_parse_from(["depjob", "run", "--job", "job.json", "--repo-root", "/repo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(["depjob", "select", "--job", "job.json", "--verbose"]);
        assert!(args.verbose);
        let args = CliArgs::parse_from(["depjob", "-q", "select", "--job", "job.json"]);
        assert!(args.quiet);
    }

    #[test]
    fn test_pick_version_args() {
        let args = CliArgs::parse_from([
            "depjob",
            "pick-version",
            "--candidates",
            "versions.json",
            "--current",
            "0.110.2",
            "--ignore",
            ">= 1.0",
            "--ignore",
            "0.124.3",
            "--cooldown",
            "3",
            "--minor",
            "40d",
        ]);
        let Command::PickVersion(pick) = args.command else {
            panic!("expected pick-version");
        };
        assert_eq!(pick.ignore, vec![">= 1.0", "0.124.3"]);
        assert_eq!(pick.current.as_deref(), Some("0.110.2"));
        let cooldown = pick.cooldown_options().unwrap();
        assert_eq!(cooldown.default_days, 3);
        assert_eq!(cooldown.semver_minor_days, 40);
        assert_eq!(cooldown.semver_major_days, 0);
    }

    #[test]
    fn test_pick_version_without_cooldown() {
        let args = CliArgs::parse_from(["depjob", "pick-version", "--candidates", "v.json"]);
        let Command::PickVersion(pick) = args.command else {
            panic!("expected pick-version");
        };
        assert!(pick.cooldown_options().is_none());
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days("7"), Ok(7));
        assert_eq!(parse_days("10d"), Ok(10));
        assert_eq!(parse_days("2w"), Ok(14));
        assert_eq!(parse_days("1m"), Ok(30));
    }

    #[test]
    fn test_parse_days_invalid() {
        assert!(parse_days("").is_err());
        assert!(parse_days("abc").is_err());
        assert!(parse_days("-1d").is_err());
        assert!(parse_days("10x").unwrap_err().contains("invalid day count '10x'"));
    }
}
