//! Configuration file support
//!
//! `depjob.toml` carries the service endpoint, the helper command lines and
//! the default log level. Every section is optional.

use crate::error::ConfigError;
use crate::workers::WorkerCommands;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "depjob.toml";

/// Environment variable that overrides `api.token`
pub const TOKEN_ENV_VAR: &str = "DEPJOB_API_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api: ApiConfig,
    pub workers: WorkersConfig,
    pub logging: LoggingConfig,
}

/// PR-management service endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub url: Option<String>,
    pub job_id: Option<String>,
    pub token: Option<String>,
}

/// Helper command lines, program first
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkersConfig {
    pub discover: Vec<String>,
    pub analyze: Vec<String>,
    pub update: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, else `./depjob.toml` when present, else defaults
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::ParseError {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml(content: &str) -> Result<Config, String> {
        toml::from_str(content).map_err(|e: toml::de::Error| e.to_string())
    }

    /// Replace the token with the environment value when one is set
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.api.token = Some(token);
        }
        self
    }

    /// Apply `--api-url` / `--job-id` on top of the file values
    pub fn with_cli_overrides(
        mut self,
        api_url: Option<String>,
        job_id: Option<String>,
    ) -> Result<Self, ConfigError> {
        if api_url.is_some() {
            self.api.url = api_url;
        }
        if job_id.is_some() {
            self.api.job_id = job_id;
        }
        if self.api.url.is_some() && self.api.job_id.is_none() {
            return Err(ConfigError::ConflictingOptions {
                message: "an API URL requires a job id".to_string(),
            });
        }
        Ok(self)
    }

    /// Command lines for the subprocess collaborators
    pub fn worker_commands(&self) -> Result<WorkerCommands, ConfigError> {
        let check = |worker: &str, command: &[String]| {
            if command.iter().all(|part| part.trim().is_empty()) {
                Err(ConfigError::EmptyCommand {
                    worker: worker.to_string(),
                })
            } else {
                Ok(command.to_vec())
            }
        };

        Ok(WorkerCommands {
            discover: check("discover", &self.workers.discover)?,
            analyze: check("analyze", &self.workers.analyze)?,
            update: check("update", &self.workers.update)?,
        })
    }
}
