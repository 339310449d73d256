//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Created, updated and closed pull requests with their dependency changes
//! - Semantic version change type indication (major/minor/patch)
//! - Recorded job errors
//! - Full event listing in verbose mode

use crate::api::{ApiMessage, ReportedDependency, UpdateJobError};
use crate::domain::{Version, VersionBump};
use crate::output::{OutputFormatter, RunReport, Verbosity};
use crate::run::RunSummary;
use colored::Colorize;
use std::io::Write;

/// Semantic version change between two version strings, when both parse
pub fn change_type(old: &str, new: &str) -> Option<VersionBump> {
    let old = Version::parse(old).ok()?;
    let new = Version::parse(new).ok()?;
    Some(new.bump_from(&old))
}

fn change_label(bump: Option<VersionBump>, color: bool) -> String {
    let (label, colored) = match bump {
        Some(VersionBump::Major) => ("major", "major".red().bold().to_string()),
        Some(VersionBump::Minor) => ("minor", "minor".yellow().to_string()),
        Some(VersionBump::Patch) => ("patch", "patch".green().to_string()),
        None => ("?", "?".dimmed().to_string()),
    };
    if color {
        colored
    } else {
        label.to_string()
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self::with_color(verbosity, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn format_dependency_line(
        &self,
        dependency: &ReportedDependency,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let new_version = dependency.version.as_deref().unwrap_or("?");
        let name = format!("{:width$}", dependency.name, width = max_name_len);
        match dependency.previous_version.as_deref() {
            Some(old_version) => {
                let label = change_label(change_type(old_version, new_version), self.color);
                if self.color {
                    writeln!(
                        writer,
                        "    {} {} {} {} [{}]",
                        name,
                        old_version.dimmed(),
                        "→".dimmed(),
                        new_version.bright_white().bold(),
                        label
                    )
                } else {
                    writeln!(
                        writer,
                        "    {} {} -> {} [{}]",
                        name, old_version, new_version, label
                    )
                }
            }
            None => writeln!(writer, "    {} {}", name, new_version),
        }
    }

    fn format_dependencies(
        &self,
        dependencies: &[ReportedDependency],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let max_name_len = dependencies.iter().map(|d| d.name.len()).max().unwrap_or(0);
        for dependency in dependencies {
            self.format_dependency_line(dependency, max_name_len, writer)?;
        }
        Ok(())
    }

    fn format_job_error(&self, error: &UpdateJobError) -> String {
        let detail = match error {
            UpdateJobError::SecurityUpdateDependencyNotFound => String::new(),
            UpdateJobError::SecurityUpdateNotNeeded { dependency_name }
            | UpdateJobError::SecurityUpdateIgnored { dependency_name } => dependency_name.clone(),
            UpdateJobError::SecurityUpdateNotFound {
                dependency_name,
                dependency_version,
            } => format!("{} {}", dependency_name, dependency_version),
            UpdateJobError::SecurityUpdateNotPossible {
                dependency_name,
                latest_resolvable_version,
                ..
            } => format!("{} {}", dependency_name, latest_resolvable_version),
            UpdateJobError::PullRequestExistsForSecurityUpdate {
                updated_dependencies,
            } => updated_dependencies
                .iter()
                .map(|d| format!("{} {}", d.name, d.version))
                .collect::<Vec<_>>()
                .join(", "),
            UpdateJobError::DependencyFileNotParseable { message, .. }
            | UpdateJobError::UnknownError { message } => message.clone(),
        };
        if detail.is_empty() {
            error.error_type().to_string()
        } else {
            format!("{}: {}", error.error_type(), detail)
        }
    }

    fn format_event(&self, event: &ApiMessage, writer: &mut dyn Write) -> std::io::Result<()> {
        let endpoint = if self.color {
            event.endpoint().cyan().to_string()
        } else {
            event.endpoint().to_string()
        };
        let detail = match event {
            ApiMessage::UpdatedDependencyList(list) => format!(
                "{} dependencies in {} file(s)",
                list.dependencies.len(),
                list.dependency_files.len()
            ),
            ApiMessage::IncrementMetric(metric) => {
                let tags: Vec<String> = metric
                    .tags
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                format!("{} {}", metric.metric, tags.join(" "))
            }
            ApiMessage::CreatePullRequest(pr) => pr.pr_title.clone(),
            ApiMessage::UpdatePullRequest(pr) => pr.pr_title.clone(),
            ApiMessage::ClosePullRequest(close) => format!(
                "{} ({:?})",
                close.dependency_names.join(", "),
                close.reason
            ),
            ApiMessage::RecordUpdateJobError(error) => self.format_job_error(error),
            ApiMessage::MarkAsProcessed(mark) => mark.base_commit_sha.clone(),
        };
        writeln!(writer, "  {} {}", endpoint, detail)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        // In quiet mode, only show summary
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&report.summary, writer);
        }

        if self.verbosity == Verbosity::Verbose {
            writeln!(writer, "{}:", self.heading("Events"))?;
            for event in &report.events {
                self.format_event(event, writer)?;
            }
            writeln!(writer)?;
        }

        for event in &report.events {
            match event {
                ApiMessage::CreatePullRequest(pr) => {
                    let marker = if self.color { "+".green().to_string() } else { "+".to_string() };
                    writeln!(writer, "{} {}", marker, pr.pr_title)?;
                    self.format_dependencies(&pr.dependencies, writer)?;
                    for file in &pr.updated_dependency_files {
                        writeln!(writer, "    {}", file.path())?;
                    }
                }
                ApiMessage::UpdatePullRequest(pr) => {
                    let marker = if self.color { "~".yellow().to_string() } else { "~".to_string() };
                    writeln!(writer, "{} {}", marker, pr.pr_title)?;
                    for file in &pr.updated_dependency_files {
                        writeln!(writer, "    {}", file.path())?;
                    }
                }
                ApiMessage::ClosePullRequest(close) => {
                    let marker = if self.color { "-".red().to_string() } else { "-".to_string() };
                    writeln!(
                        writer,
                        "{} close {} ({:?})",
                        marker,
                        close.dependency_names.join(", "),
                        close.reason
                    )?;
                }
                _ => {}
            }
        }

        if report.summary.has_job_errors() {
            if self.color {
                writeln!(writer, "{}:", "Errors".red().bold())?;
            } else {
                writeln!(writer, "Errors:")?;
            }
            for error in &report.summary.job_errors {
                if self.color {
                    writeln!(writer, "  {} {}", "✗".red(), self.format_job_error(error))?;
                } else {
                    writeln!(writer, "  - {}", self.format_job_error(error))?;
                }
            }
        }

        writeln!(writer)?;
        self.format_summary(&report.summary, writer)
    }

    fn format_summary(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let created = summary.created.len();
        let updated = summary.updated.len();
        let closed = summary.closed.len();
        let errors = summary.job_errors.len();

        if self.verbosity == Verbosity::Quiet {
            let line = if summary.has_changes() {
                format!("{} created, {} updated, {} closed", created, updated, closed)
            } else {
                "No changes".to_string()
            };
            if self.color && !summary.has_changes() {
                writeln!(writer, "{}", line.dimmed())?;
            } else {
                writeln!(writer, "{}", line)?;
            }
            return Ok(());
        }

        writeln!(writer, "{} ({}):", self.heading("Summary"), summary.handler)?;
        writeln!(
            writer,
            "  {} dependencies discovered",
            summary.dependencies_discovered
        )?;
        if self.color {
            writeln!(
                writer,
                "  {} created, {} updated, {} closed",
                created.to_string().green(),
                updated.to_string().yellow(),
                closed.to_string().red()
            )?;
            if errors > 0 {
                writeln!(writer, "  {} job error(s)", errors.to_string().red())?;
            }
        } else {
            writeln!(
                writer,
                "  {} created, {} updated, {} closed",
                created, updated, closed
            )?;
            if errors > 0 {
                writeln!(writer, "  {} job error(s)", errors)?;
            }
        }
        match &summary.processed {
            Some(sha) => writeln!(writer, "  processed at {}", sha),
            None => writeln!(writer, "  not marked as processed"),
        }
    }
}
