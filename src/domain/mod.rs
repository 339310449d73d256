//! Core domain models for depjob
//!
//! This module contains the fundamental types used throughout the application:
//! - Ecosystem, version and version requirement types
//! - The job description and its rules (groups, advisories, ignores, allow list)
//! - Discovery snapshots, analysis results and update operations

pub mod analysis;
pub mod discovery;
mod ecosystem;
pub mod job;
pub mod pattern;
mod requirement;
pub mod update_operation;
mod version;

pub use analysis::{AnalysisResult, DependencyInfo};
pub use discovery::{
    join_repo_path, parent_dir, Dependency, DependencyType, ProjectDiscoveryResult,
    WorkspaceDiscoveryResult,
};
pub use ecosystem::Ecosystem;
pub use job::{DependencyGroup, Job, SecurityAdvisory};
pub use requirement::Requirement;
pub use update_operation::{UpdateOperation, UpdateOperationResult};
pub use version::{Version, VersionBump};
