//! Classified diagnostics produced by the checkers.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Message severity. Only `Error` breaks a file (and therefore the run);
/// the rest is advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckMessage {
    pub severity: Severity,
    pub text: String,
}

impl CheckMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

/// Pipeline stage a file reached. Fatal parse failures stop at `Loaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Loaded,
    SchemaChecked,
    GeometryChecked,
    MetadataChecked,
    ProtocolChecked,
    Done,
}

/// Everything the run learned about one source file.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub path: PathBuf,
    pub source_id: Option<String>,
    pub stage: Stage,
    messages: Vec<CheckMessage>,
    /// Bytes a data-URL icon would free if hosted externally.
    pub embedded_icon_bytes: u64,
}

impl CheckReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source_id: None,
            stage: Stage::Loaded,
            messages: Vec::new(),
            embedded_icon_bytes: 0,
        }
    }

    pub fn push(&mut self, message: CheckMessage) {
        self.messages.push(message);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(CheckMessage::info(text));
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(CheckMessage::warning(text));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(CheckMessage::error(text));
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == severity)
            .count()
    }

    /// Messages grouped for emission: INFO first, then WARNING, then ERROR,
    /// preserving insertion order within each level so the most severe
    /// output is freshest at the end of a scrolling log.
    pub fn ordered_messages(&self) -> Vec<&CheckMessage> {
        let mut ordered: Vec<&CheckMessage> = Vec::with_capacity(self.messages.len());
        for severity in [Severity::Info, Severity::Warning, Severity::Error] {
            ordered.extend(self.messages.iter().filter(|m| m.severity == severity));
        }
        ordered
    }

    /// Raw messages in insertion order, mostly for tests.
    pub fn messages(&self) -> &[CheckMessage] {
        &self.messages
    }
}

/// Aggregate over a whole validation run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub reports: Vec<CheckReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: chrono::Utc::now(),
            reports: Vec::new(),
        }
    }

    pub fn add(&mut self, report: CheckReport) {
        self.reports.push(report);
    }

    /// The run-level failure signal: at least one file produced an ERROR.
    pub fn broken(&self) -> bool {
        self.reports.iter().any(CheckReport::has_errors)
    }

    pub fn files_checked(&self) -> usize {
        self.reports.len()
    }

    pub fn files_broken(&self) -> usize {
        self.reports.iter().filter(|r| r.has_errors()).count()
    }

    /// Total bytes saved if every embedded icon were hosted externally.
    pub fn embedded_icon_bytes(&self) -> u64 {
        self.reports.iter().map(|r| r.embedded_icon_bytes).sum()
    }

    pub fn report_for(&self, path: &Path) -> Option<&CheckReport> {
        self.reports.iter().find(|r| r.path == path)
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
