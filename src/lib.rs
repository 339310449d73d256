//! depjob - Dependency update job runner library
//!
//! This library runs one dependency-update job against a checked-out
//! repository:
//! - selects the update strategy for the job
//! - drives the discovery, analysis and updater collaborators
//! - emits the ordered stream of pull-request events

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod progress;
pub mod run;
pub mod update;
pub mod workers;
