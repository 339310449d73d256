//! Rendering a finished run for the terminal
//!
//! The event stream is summarized into a [`RunSummary`] and printed either
//! as colored text or as JSON. Logs go to stderr, so everything here writes
//! to the caller's writer (stdout in the binary).

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::api::ApiMessage;
use crate::run::{HandlerKind, RunSummary};
use std::io::{IsTerminal, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// How much of the run is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Counts only
    Quiet,
    /// Pull requests, closures and job errors
    #[default]
    Normal,
    /// Additionally every event in emission order
    Verbose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Colorize text output
    pub color: bool,
}

impl OutputConfig {
    pub fn new(format: OutputFormat, verbosity: Verbosity) -> Self {
        Self {
            format,
            verbosity,
            color: false,
        }
    }

    /// `--quiet` wins over `--verbose`; color only when stdout is a terminal
    pub fn from_cli(json: bool, verbose: bool, quiet: bool) -> Self {
        let format = match json {
            true => OutputFormat::Json,
            false => OutputFormat::Text,
        };
        let verbosity = match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };
        Self::new(format, verbosity).with_color(std::io::stdout().is_terminal())
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    /// Events in emission order
    pub events: Vec<ApiMessage>,
}

impl RunReport {
    pub fn new(handler: HandlerKind, events: Vec<ApiMessage>) -> Self {
        Self {
            summary: RunSummary::from_messages(handler, &events),
            events,
        }
    }
}

pub trait OutputFormatter {
    /// Write the whole run report
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Write only the summary block
    fn format_summary(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()>;
}

pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.verbosity, config.color)),
    }
}
