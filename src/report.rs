// src/report.rs

use crate::records::RecordResult;
use crate::table::Value;
use serde::Serialize;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format `{other}` (expected text or json)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordLine {
    pub label: String,
    #[serde(flatten)]
    pub result: RecordResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub matchweek: Value,
    pub records: Vec<RecordLine>,
}

impl Report {
    pub fn render(&self, format: ReportFormat) -> serde_json::Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => serde_json::to_string_pretty(self),
        }
    }
}

/// The post as it is pasted: a blank first line, the heading, then one line
/// per record.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "#DraftPL Unwanted Records: GW{}", self.matchweek)?;
        writeln!(f)?;
        writeln!(f, "Most:")?;
        for line in &self.records {
            writeln!(
                f,
                "{}: {} ({})",
                line.label,
                line.result.players.join(", "),
                line.result.value
            )?;
        }
        Ok(())
    }
}
