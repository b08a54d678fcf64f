//! Output formatting and writing utilities
//!
//! API results go to stdout as JSON (indented by default) or as a short
//! human-readable summary.

use crate::cli::OutputFormat;
use crate::error::Result;
use chrono::DateTime;
use colored::{ColoredString, Colorize};
use icann_client::mosapi::{MetricaReport, MetricaReportList, StateResponse};
use icann_client::{EscrowReportStatus, EscrowStatus};
use serde::Serialize;
use std::io::{self, Write};

/// Summary rendering for the `human` output format
pub trait HumanReadable {
    fn render_human(&self, color: bool) -> String;
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool) -> Self {
        Self::with_writer(format, use_color, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            writer,
        }
    }

    /// Write one result in the configured format
    pub fn emit<T: Serialize + HumanReadable>(&mut self, value: &T) -> Result<()> {
        let content = match self.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(value)?,
            OutputFormat::Human => value.render_human(self.use_color),
        };
        self.writeln(content.trim_end())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn paint(text: &str, up: bool, color: bool) -> ColoredString {
    match (color, up) {
        (false, _) => text.normal(),
        (true, true) => text.green(),
        (true, false) => text.red().bold(),
    }
}

fn timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

impl HumanReadable for StateResponse {
    fn render_human(&self, color: bool) -> String {
        let mut lines = vec![
            format!("TLD:          {}", self.tld),
            format!("Status:       {}", paint(&self.status, self.status == "Up", color)),
            format!("Last update:  {}", timestamp(self.last_update_api_database)),
        ];

        if self.tested_services.is_empty() {
            lines.push("Services:     none".to_string());
        } else {
            lines.push("Services:".to_string());
        }
        for (name, service) in self.services() {
            let mut line = format!("  {:<8} {}", name, paint(&service.status, service.is_up(), color));
            if service.emergency_threshold > 0.0 {
                line.push_str(&format!("  (emergency threshold {:.2}%)", service.emergency_threshold));
            }
            lines.push(line);

            for incident in &service.incidents {
                let ended = incident
                    .end_time
                    .map(timestamp)
                    .unwrap_or_else(|| "ongoing".to_string());
                lines.push(format!(
                    "    incident {} [{}] {} -> {}{}",
                    incident.incident_id,
                    incident.state,
                    timestamp(incident.start_time),
                    ended,
                    if incident.false_positive { " (false positive)" } else { "" }
                ));
            }
        }
        lines.join("\n")
    }
}

impl HumanReadable for MetricaReport {
    fn render_human(&self, _color: bool) -> String {
        let mut lines = Vec::new();
        if !self.tld.is_empty() {
            lines.push(format!("TLD:             {}", self.tld));
        }
        if let Some(iana_id) = self.iana_id {
            lines.push(format!("IANA ID:         {}", iana_id));
        }
        lines.push(format!("Report date:     {}", self.domain_list_date));
        if let Some(last_modified) = &self.last_modified {
            lines.push(format!("Last modified:   {}", last_modified));
        }
        if let Some(in_zone) = self.domains_in_zone {
            lines.push(format!("Domains in zone: {}", in_zone));
        }
        lines.push(format!("Abuse domains:   {}", self.unique_abuse_domains));
        lines.extend(
            self.domain_list_data
                .iter()
                .map(|threat| format!("  {:<12} {}", threat.threat_type, threat.count)),
        );
        lines.join("\n")
    }
}

impl HumanReadable for MetricaReportList {
    fn render_human(&self, _color: bool) -> String {
        if self.domain_lists.is_empty() {
            return "No METRICA reports available".to_string();
        }
        let mut lines = vec![format!("{:<12} GENERATED", "DATE")];
        lines.extend(
            self.domain_lists
                .iter()
                .map(|list| format!("{:<12} {}", list.domain_list_date, list.domain_list_generation_date)),
        );
        lines.join("\n")
    }
}

impl HumanReadable for EscrowReportStatus {
    fn render_human(&self, color: bool) -> String {
        format!(
            "{} report for {} on {}: {}",
            self.report_type,
            self.tld,
            self.date,
            paint(self.status.as_str(), self.status == EscrowStatus::Received, color)
        )
    }
}
