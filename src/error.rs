//! Application error types using thiserror
//!
//! Error hierarchy:
//! - JobError: Issues with the job description itself
//! - WorkerError: Failures reported by the discovery/analyze/update collaborators
//! - ApiError: Issues delivering events to the PR-management service
//! - ConfigError: Issues with configuration file and CLI options
//! - VersionError: Unparseable versions and requirements
//! - IoError: File system operation failures

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Job description related errors
    #[error(transparent)]
    Job(#[from] JobError),

    /// Collaborator related errors
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// Event delivery related errors
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Version parsing errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors related to the job description
#[derive(Error, Debug)]
pub enum JobError {
    /// Failed to read the job file
    #[error("failed to read job file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Job file is not valid JSON for a job
    #[error("failed to parse job file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// The group requested for refresh is not declared by the job
    #[error("dependency group '{group}' to refresh is not defined in the job")]
    UnknownGroup { group: String },

    /// Unsupported package manager
    #[error("unsupported package manager '{value}': expected 'nuget', 'pip', or 'terraform'")]
    UnsupportedPackageManager { value: String },
}

/// Errors reported by the discovery, analyze and update collaborators
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Discovery could not read the workspace
    #[error("discovery failed in {directory}: {message}")]
    DiscoveryFailed { directory: String, message: String },

    /// Analysis could not evaluate a dependency
    #[error("analysis failed for '{dependency}': {message}")]
    AnalysisFailed { dependency: String, message: String },

    /// The updater could not rewrite a project
    #[error("update of '{dependency}' in {file} failed: {message}")]
    UpdateFailed {
        dependency: String,
        file: String,
        message: String,
    },

    /// A collaborator answered about a dependency it was never asked about
    #[error("collaborator returned unexpected dependency '{dependency}'")]
    UnexpectedDependency { dependency: String },

    /// The helper command could not be spawned or produced garbage
    #[error("helper command '{command}' failed: {message}")]
    Command { command: String, message: String },
}

/// Errors related to delivering events
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network request failed
    #[error("failed to send '{endpoint}' event: {message}")]
    NetworkError { endpoint: String, message: String },

    /// Rate limit exceeded
    #[error("rate limit exceeded while sending '{endpoint}' event")]
    RateLimitExceeded { endpoint: String },

    /// Timeout
    #[error("timeout while sending '{endpoint}' event")]
    Timeout { endpoint: String },

    /// Service rejected the event
    #[error("service rejected '{endpoint}' event with HTTP {status}")]
    Rejected { endpoint: String, status: u16 },

    /// Event could not be encoded
    #[error("failed to serialize '{endpoint}' event: {message}")]
    Serialization { endpoint: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid day count format
    #[error("invalid day count '{value}': expected format like '7', '10d', '2w', '1m'")]
    InvalidDays { value: String },

    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// A worker command is configured empty
    #[error("worker command '{worker}' is empty")]
    EmptyCommand { worker: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

/// Errors related to versions and version requirements
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Version string is not a dotted numeric version
    #[error("invalid version '{value}'")]
    InvalidVersion { value: String },

    /// Requirement string could not be parsed
    #[error("invalid version requirement '{value}': {message}")]
    InvalidRequirement { value: String, message: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Generic IO error
    #[error("IO error at {path}: {source}")]
    Generic {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl JobError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        JobError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        JobError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new UnknownGroup error
    pub fn unknown_group(group: impl Into<String>) -> Self {
        JobError::UnknownGroup {
            group: group.into(),
        }
    }
}

impl WorkerError {
    /// Creates a new DiscoveryFailed error
    pub fn discovery_failed(directory: impl Into<String>, message: impl Into<String>) -> Self {
        WorkerError::DiscoveryFailed {
            directory: directory.into(),
            message: message.into(),
        }
    }

    /// Creates a new AnalysisFailed error
    pub fn analysis_failed(dependency: impl Into<String>, message: impl Into<String>) -> Self {
        WorkerError::AnalysisFailed {
            dependency: dependency.into(),
            message: message.into(),
        }
    }

    /// Creates a new UpdateFailed error
    pub fn update_failed(
        dependency: impl Into<String>,
        file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        WorkerError::UpdateFailed {
            dependency: dependency.into(),
            file: file.into(),
            message: message.into(),
        }
    }

    /// Creates a new UnexpectedDependency error
    pub fn unexpected_dependency(dependency: impl Into<String>) -> Self {
        WorkerError::UnexpectedDependency {
            dependency: dependency.into(),
        }
    }

    /// Creates a new Command error
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        WorkerError::Command {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Whether this error means a collaborator broke its contract.
    ///
    /// Contract violations abort the whole run; every other worker error is
    /// scoped to the dependency being processed.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, WorkerError::UnexpectedDependency { .. })
    }
}

impl ApiError {
    /// Creates a new NetworkError
    pub fn network_error(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::NetworkError {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(endpoint: impl Into<String>) -> Self {
        ApiError::Timeout {
            endpoint: endpoint.into(),
        }
    }
}

impl VersionError {
    /// Creates a new InvalidVersion error
    pub fn invalid_version(value: impl Into<String>) -> Self {
        VersionError::InvalidVersion {
            value: value.into(),
        }
    }

    /// Creates a new InvalidRequirement error
    pub fn invalid_requirement(value: impl Into<String>, message: impl Into<String>) -> Self {
        VersionError::InvalidRequirement {
            value: value.into(),
            message: message.into(),
        }
    }
}

impl IoError {
    /// Creates a new DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        IoError::DirectoryNotFound { path: path.into() }
    }

    /// Creates a new Generic IO error
    pub fn generic(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Generic {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_error_parse() {
        let err = JobError::parse_error("/tmp/job.json", "expected value at line 1");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse job file"));
        assert!(msg.contains("job.json"));
        assert!(msg.contains("line 1"));
    }

    #[test]
    fn test_job_error_unknown_group() {
        let err = JobError::unknown_group("test-group");
        let msg = format!("{}", err);
        assert!(msg.contains("'test-group'"));
        assert!(msg.contains("not defined"));
    }

    #[test]
    fn test_worker_error_discovery() {
        let err = WorkerError::discovery_failed("/src", "no projects found");
        let msg = format!("{}", err);
        assert!(msg.contains("discovery failed in /src"));
        assert!(msg.contains("no projects found"));
    }

    #[test]
    fn test_worker_error_update() {
        let err = WorkerError::update_failed("Some.Package", "/src/project.csproj", "locked");
        let msg = format!("{}", err);
        assert!(msg.contains("Some.Package"));
        assert!(msg.contains("/src/project.csproj"));
        assert!(msg.contains("locked"));
    }

    #[test]
    fn test_worker_error_contract_violation() {
        assert!(WorkerError::unexpected_dependency("Other").is_contract_violation());
        assert!(!WorkerError::analysis_failed("Some.Package", "boom").is_contract_violation());
        assert!(!WorkerError::command("helper", "exit 1").is_contract_violation());
    }

    #[test]
    fn test_api_error_messages() {
        let err = ApiError::network_error("create_pull_request", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("create_pull_request"));
        assert!(msg.contains("connection refused"));

        let err = ApiError::timeout("mark_as_processed");
        assert!(format!("{}", err).contains("timeout"));

        let err = ApiError::Rejected {
            endpoint: "close_pull_request".to_string(),
            status: 422,
        };
        assert!(format!("{}", err).contains("HTTP 422"));
    }

    #[test]
    fn test_config_error_invalid_days() {
        let err = ConfigError::InvalidDays {
            value: "abc".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("invalid day count"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_config_error_empty_command() {
        let err = ConfigError::EmptyCommand {
            worker: "discover".to_string(),
        };
        assert!(format!("{}", err).contains("'discover' is empty"));
    }

    #[test]
    fn test_version_error_messages() {
        let err = VersionError::invalid_version("x.y");
        assert_eq!(format!("{}", err), "invalid version 'x.y'");

        let err = VersionError::invalid_requirement(">>1.0", "unknown operator");
        let msg = format!("{}", err);
        assert!(msg.contains(">>1.0"));
        assert!(msg.contains("unknown operator"));
    }

    #[test]
    fn test_io_error_directory_not_found() {
        let err = IoError::directory_not_found("/path/to/missing");
        let msg = format!("{}", err);
        assert!(msg.contains("directory not found"));
    }

    #[test]
    fn test_app_error_from_sub_errors() {
        let app_err: AppError = JobError::unknown_group("g").into();
        assert!(format!("{}", app_err).contains("'g'"));

        let app_err: AppError = WorkerError::unexpected_dependency("X").into();
        assert!(format!("{}", app_err).contains("unexpected dependency 'X'"));

        let app_err: AppError = VersionError::invalid_version("bad").into();
        assert!(format!("{}", app_err).contains("invalid version"));

        let app_err: AppError = IoError::directory_not_found("/missing").into();
        assert!(format!("{}", app_err).contains("directory not found"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = WorkerError::unexpected_dependency("Some.Package");
        let debug = format!("{:?}", err);
        assert!(debug.contains("UnexpectedDependency"));
    }
}
