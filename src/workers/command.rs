//! Subprocess-backed collaborators
//!
//! Each call spawns the configured helper command in the repository root,
//! writes a JSON request to its stdin and parses the JSON response from its
//! stdout. A non-zero exit status becomes a `WorkerError` carrying stderr.

use super::{AnalyzeWorker, DiscoveryWorker, UpdateRequest, UpdaterWorker};
use crate::domain::{AnalysisResult, DependencyInfo, UpdateOperationResult, WorkspaceDiscoveryResult};
use crate::error::WorkerError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Command lines (program followed by arguments) for each collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerCommands {
    pub discover: Vec<String>,
    pub analyze: Vec<String>,
    pub update: Vec<String>,
}

/// Implements all three collaborator traits by running helper commands
#[derive(Debug, Clone)]
pub struct CommandWorkers {
    commands: WorkerCommands,
}

/// Result of one helper invocation
#[derive(Debug)]
struct HelperOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

impl CommandWorkers {
    pub fn new(commands: WorkerCommands) -> Self {
        Self { commands }
    }

    async fn run_helper<Req: Serialize + Sync>(
        command: &[String],
        repo_root: &Path,
        request: &Req,
    ) -> Result<HelperOutput, WorkerError> {
        let command_line = command.join(" ");
        let (program, args) = command
            .split_first()
            .ok_or_else(|| WorkerError::command(&command_line, "no command configured"))?;

        let input = serde_json::to_vec(request)
            .map_err(|e| WorkerError::command(&command_line, format!("failed to encode request: {}", e)))?;

        debug!("running helper: {}", command_line);
        let mut child = Command::new(program)
            .args(args)
            .current_dir(repo_root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| WorkerError::command(&command_line, format!("failed to spawn: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&input)
                .await
                .map_err(|e| WorkerError::command(&command_line, format!("failed to write stdin: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| WorkerError::command(&command_line, e.to_string()))?;

        Ok(HelperOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn parse_response<T: DeserializeOwned>(command: &[String], stdout: &str) -> Result<T, WorkerError> {
        serde_json::from_str(stdout).map_err(|e| {
            WorkerError::command(command.join(" "), format!("invalid JSON response: {}", e))
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct DiscoverRequest<'a> {
    repo_root: &'a Path,
    directory: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct AnalyzeRequest<'a> {
    repo_root: &'a Path,
    discovery: &'a WorkspaceDiscoveryResult,
    dependency: &'a DependencyInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct UpdateHelperRequest<'a> {
    repo_root: &'a Path,
    #[serde(flatten)]
    request: &'a UpdateRequest<'a>,
}

#[async_trait]
impl DiscoveryWorker for CommandWorkers {
    async fn discover(
        &self,
        repo_root: &Path,
        directory: &str,
    ) -> Result<WorkspaceDiscoveryResult, WorkerError> {
        let command = &self.commands.discover;
        let output = Self::run_helper(command, repo_root, &DiscoverRequest { repo_root, directory }).await?;
        if !output.success {
            return Err(WorkerError::discovery_failed(directory, output.stderr));
        }
        Self::parse_response(command, &output.stdout)
    }
}

#[async_trait]
impl AnalyzeWorker for CommandWorkers {
    async fn analyze(
        &self,
        repo_root: &Path,
        discovery: &WorkspaceDiscoveryResult,
        dependency: &DependencyInfo,
    ) -> Result<AnalysisResult, WorkerError> {
        let command = &self.commands.analyze;
        let request = AnalyzeRequest {
            repo_root,
            discovery,
            dependency,
        };
        let output = Self::run_helper(command, repo_root, &request).await?;
        if !output.success {
            return Err(WorkerError::analysis_failed(&dependency.name, output.stderr));
        }
        Self::parse_response(command, &output.stdout)
    }
}

#[async_trait]
impl UpdaterWorker for CommandWorkers {
    async fn update(
        &self,
        repo_root: &Path,
        request: &UpdateRequest<'_>,
    ) -> Result<UpdateOperationResult, WorkerError> {
        let command = &self.commands.update;
        let output = Self::run_helper(
            command,
            repo_root,
            &UpdateHelperRequest { repo_root, request },
        )
        .await?;
        if !output.success {
            return Err(WorkerError::update_failed(
                request.dependency_name,
                request.project_path,
                output.stderr,
            ));
        }
        Self::parse_response(command, &output.stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_discover_parses_stdout() {
        let temp = TempDir::new().unwrap();
        let workers = CommandWorkers::new(WorkerCommands {
            discover: sh(r#"cat > /dev/null; echo '{"path": "/", "projects": [{"file-path": "project.csproj"}]}'"#),
            ..WorkerCommands::default()
        });
        let result = workers.discover(temp.path(), "/").await.unwrap();
        assert_eq!(result.projects.len(), 1);
        assert_eq!(result.projects[0].file_path, "project.csproj");
    }

    #[tokio::test]
    async fn test_helper_receives_request_on_stdin() {
        let temp = TempDir::new().unwrap();
        // echo the directory field back as the discovery path
        let workers = CommandWorkers::new(WorkerCommands {
            discover: sh(r#"dir=$(sed -e 's/.*"directory":"\([^"]*\)".*/\1/'); echo "{\"path\": \"$dir\"}""#),
            ..WorkerCommands::default()
        });
        let result = workers.discover(temp.path(), "/src").await.unwrap();
        assert_eq!(result.path, "/src");
    }

    #[tokio::test]
    async fn test_nonzero_exit_maps_to_worker_error() {
        let temp = TempDir::new().unwrap();
        let workers = CommandWorkers::new(WorkerCommands {
            analyze: sh("cat > /dev/null; echo 'no feed' >&2; exit 3"),
            ..WorkerCommands::default()
        });
        let discovery = WorkspaceDiscoveryResult::new("/", vec![]);
        let info = DependencyInfo {
            name: "Some.Package".to_string(),
            version: "1.0.0".to_string(),
            is_vulnerable: false,
            ignored_versions: vec![],
            ignored_update_types: vec![],
            vulnerabilities: vec![],
            cooldown: None,
        };
        let err = workers.analyze(temp.path(), &discovery, &info).await.unwrap_err();
        match err {
            WorkerError::AnalysisFailed { dependency, message } => {
                assert_eq!(dependency, "Some.Package");
                assert_eq!(message, "no feed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_command_error() {
        let temp = TempDir::new().unwrap();
        let workers = CommandWorkers::new(WorkerCommands {
            update: sh("cat > /dev/null; echo 'not json'"),
            ..WorkerCommands::default()
        });
        let request = UpdateRequest {
            project_path: "/project.csproj",
            dependency_name: "Some.Package",
            previous_version: "1.0.0",
            new_version: "1.0.1",
            is_transitive: false,
        };
        let err = workers.update(temp.path(), &request).await.unwrap_err();
        assert!(matches!(err, WorkerError::Command { .. }));
    }

    #[tokio::test]
    async fn test_missing_command_is_command_error() {
        let temp = TempDir::new().unwrap();
        let workers = CommandWorkers::new(WorkerCommands::default());
        let err = workers.discover(temp.path(), "/").await.unwrap_err();
        assert!(matches!(err, WorkerError::Command { .. }));
    }

    #[tokio::test]
    async fn test_spawn_failure_names_command_line() {
        let temp = TempDir::new().unwrap();
        let workers = CommandWorkers::new(WorkerCommands {
            discover: vec!["depjob-missing-helper".to_string(), "discover".to_string()],
            ..WorkerCommands::default()
        });
        let err = workers.discover(temp.path(), "/").await.unwrap_err();
        match err {
            WorkerError::Command { command, message } => {
                assert_eq!(command, "depjob-missing-helper discover");
                assert!(message.starts_with("failed to spawn"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
