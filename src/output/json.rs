//! JSON output formatter for machine processing
//!
//! The full report carries the summary and the event list exactly as it
//! would be delivered to the service.

use crate::api::ApiMessage;
use crate::output::{OutputFormatter, RunReport, Verbosity};
use crate::run::RunSummary;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Quiet mode drops the event list
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: &'a RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<&'a [ApiMessage]>,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let events = (self.verbosity != Verbosity::Quiet).then_some(report.events.as_slice());
        let output = JsonOutput {
            summary: &report.summary,
            events,
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }

    fn format_summary(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(summary).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::UpdateJobError;
    use crate::run::HandlerKind;

    fn report() -> RunReport {
        RunReport::new(
            HandlerKind::CreateSecurityUpdatePullRequest,
            vec![
                ApiMessage::started_metric("create_security_pr"),
                ApiMessage::RecordUpdateJobError(UpdateJobError::SecurityUpdateDependencyNotFound),
                ApiMessage::mark_as_processed("TEST-COMMIT-SHA"),
            ],
        )
    }

    fn render(verbosity: Verbosity) -> serde_json::Value {
        let mut out = Vec::new();
        JsonFormatter::new(verbosity).format(&report(), &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn test_json_report_contains_events() {
        let json = render(Verbosity::Normal);
        assert_eq!(json["summary"]["handler"], "create_security_pr");
        assert_eq!(json["summary"]["processed"], "TEST-COMMIT-SHA");
        assert_eq!(
            json["summary"]["job-errors"][0]["error-type"],
            "security_update_dependency_not_found"
        );
        let events = json["events"].as_array().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2]["type"], "mark_as_processed");
    }

    #[test]
    fn test_quiet_json_omits_events() {
        let json = render(Verbosity::Quiet);
        assert!(json.get("events").is_none());
        assert_eq!(json["summary"]["created"].as_array().unwrap().len(), 0);
    }
}
