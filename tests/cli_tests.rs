//! CLI tests for the depjob binary
//!
//! These tests verify:
//! - Handler selection output
//! - Version picking with ignore requirements and cooldowns
//! - Running a job through shell helper commands and the exit codes

use assert_cmd::Command;
use chrono::{Duration, Utc};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn depjob() -> Command {
    Command::cargo_bin("depjob").unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

mod select {
    use super::*;

    #[test]
    fn test_prints_handler_tag() {
        let dir = TempDir::new().unwrap();
        let job = write(
            dir.path(),
            "job.json",
            r#"{"job": {"package-manager": "nuget", "dependencies": ["Some.Package"], "security-updates-only": true}}"#,
        );

        depjob()
            .args(["select", "--job"])
            .arg(&job)
            .assert()
            .success()
            .stdout("create_security_pr\n");
    }

    #[test]
    fn test_refresh_group_job() {
        let dir = TempDir::new().unwrap();
        let job = write(
            dir.path(),
            "job.json",
            r#"{"job": {"updating-a-pull-request": true, "dependency-group-to-refresh": "g"}}"#,
        );

        depjob()
            .args(["select", "--job"])
            .arg(&job)
            .assert()
            .success()
            .stdout("update_version_group_pr\n");
    }

    #[test]
    fn test_missing_job_file_fails() {
        depjob()
            .args(["select", "--job", "/nonexistent/job.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read job file"));
    }
}

mod pick_version {
    use super::*;

    fn days_ago(days: i64) -> String {
        (Utc::now() - Duration::days(days)).to_rfc3339()
    }

    #[test]
    fn test_minor_cooldown_holds_back_recent_release() {
        let dir = TempDir::new().unwrap();
        let candidates = format!(
            r#"[
                {{"version": "0.128.0", "released-at": "{}"}},
                {{"version": "0.124.2", "released-at": "{}"}}
            ]"#,
            days_ago(25),
            days_ago(42)
        );
        let path = write(dir.path(), "versions.json", &candidates);

        depjob()
            .args(["pick-version", "--current", "0.110.0", "--minor", "40", "--candidates"])
            .arg(&path)
            .assert()
            .success()
            .stdout("0.124.2\n");
    }

    #[test]
    fn test_ignore_requirement() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "versions.json",
            r#"[{"version": "1.0.0"}, {"version": "2.0.0"}, {"version": "2.1.0"}]"#,
        );

        depjob()
            .args(["pick-version", "--ignore", ">= 2.0", "--candidates"])
            .arg(&path)
            .assert()
            .success()
            .stdout("1.0.0\n");
    }

    #[test]
    fn test_no_admissible_version_exits_one() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "versions.json", r#"[{"version": "2.0.0"}]"#);

        depjob()
            .args(["pick-version", "--ignore", "2.0.0", "--candidates"])
            .arg(&path)
            .assert()
            .code(1)
            .stdout("");
    }

    #[test]
    fn test_invalid_cooldown_is_rejected() {
        depjob()
            .args(["pick-version", "--candidates", "v.json", "--cooldown", "2y"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid day count '2y'"));
    }
}

#[cfg(unix)]
mod run {
    use super::*;

    const DISCOVERY: &str = r#"{"path": "/", "projects": [{"file-path": "project.csproj", "dependencies": [{"name": "Some.Package", "version": "1.0.0", "type": "package-reference"}]}]}"#;

    fn helper(response: &str) -> String {
        format!("cat > /dev/null; printf '%s' '{}'", response)
    }

    fn config(dir: &Path, discover_script: &str) -> std::path::PathBuf {
        let analyze = helper(r#"{"can-update": false, "updated-version": "1.0.0"}"#);
        let content = format!(
            "[workers]\ndiscover = [\"sh\", \"-c\", {:?}]\nanalyze = [\"sh\", \"-c\", {:?}]\nupdate = [\"sh\", \"-c\", \"cat > /dev/null; echo '{{}}'\"]\n",
            discover_script, analyze
        );
        write(dir, "depjob.toml", &content)
    }

    fn setup(discover_script: &str) -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "project.csproj",
            "<Project><ItemGroup><PackageReference Include=\"Some.Package\" Version=\"1.0.0\" /></ItemGroup></Project>\n",
        );
        let job = write(dir.path(), "job.json", r#"{"job": {"package-manager": "nuget"}}"#);
        let config = config(dir.path(), discover_script);
        (dir, job, config)
    }

    #[test]
    fn test_run_writes_events() {
        let (dir, job, config) = setup(&helper(DISCOVERY));
        let events = dir.path().join("events.json");

        depjob()
            .arg("--quiet")
            .arg("run")
            .arg("--job")
            .arg(&job)
            .arg("--repo-root")
            .arg(dir.path())
            .args(["--base-commit-sha", "abc123", "--config"])
            .arg(&config)
            .arg("--output")
            .arg(&events)
            .assert()
            .success()
            .stdout(predicate::str::contains("No changes"));

        let recorded: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&events).unwrap()).unwrap();
        let types: Vec<&str> = recorded
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["type"].as_str().unwrap())
            .collect();
        assert_eq!(
            types,
            vec!["updated_dependency_list", "increment_metric", "mark_as_processed"]
        );
        assert_eq!(recorded[2]["data"]["base-commit-sha"], "abc123");
    }

    #[test]
    fn test_run_json_summary() {
        let (dir, job, config) = setup(&helper(DISCOVERY));

        let output = depjob()
            .arg("run")
            .arg("--job")
            .arg(&job)
            .arg("--repo-root")
            .arg(dir.path())
            .args(["--base-commit-sha", "abc123", "--json", "--config"])
            .arg(&config)
            .output()
            .unwrap();

        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["summary"]["handler"], "group_update_all_versions");
        assert_eq!(json["summary"]["processed"], "abc123");
    }

    #[test]
    fn test_discovery_failure_exits_two() {
        let (dir, job, config) = setup("cat > /dev/null; echo 'bad project file' >&2; exit 1");

        depjob()
            .arg("-q")
            .arg("run")
            .arg("--job")
            .arg(&job)
            .arg("--repo-root")
            .arg(dir.path())
            .args(["--base-commit-sha", "abc123", "--json", "--config"])
            .arg(&config)
            .assert()
            .code(2)
            .stdout(predicate::str::contains("dependency_file_not_parseable"));
    }

    #[test]
    fn test_api_url_requires_job_id() {
        let (dir, job, config) = setup(&helper(DISCOVERY));

        depjob()
            .arg("run")
            .arg("--job")
            .arg(&job)
            .arg("--repo-root")
            .arg(dir.path())
            .args(["--base-commit-sha", "abc123", "--api-url", "http://localhost:1"])
            .arg("--config")
            .arg(&config)
            .assert()
            .failure()
            .stderr(predicate::str::contains("requires a job id"));
    }
}
