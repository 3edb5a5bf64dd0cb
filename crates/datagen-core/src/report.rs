//! Compile report
//!
//! What a compile leaves behind besides the type graph: whether it finished,
//! how many declarations pass 1 registered, and every diagnostic raised.
//! The JSON layout is versioned through [`REPORT_VERSION`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity};

/// Bumped on any breaking change to the serialized report
pub const REPORT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileOutcome {
    /// Both passes ran to the end
    Compiled,

    /// Population stopped on a fatal error
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,

    /// Record types registered in pass 1
    pub records_registered: usize,

    /// Enum types registered in pass 1
    pub enums_registered: usize,
}

/// Outcome and diagnostics of one compile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileReport {
    pub version: u32,
    pub compiled_at: DateTime<Utc>,
    pub outcome: CompileOutcome,
    pub summary: ReportSummary,

    /// In the order raised; a failed compile ends with its fatal error
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileReport {
    /// Start a report for a compile beginning now
    pub fn new() -> Self {
        Self {
            version: REPORT_VERSION,
            compiled_at: Utc::now(),
            outcome: CompileOutcome::Compiled,
            summary: ReportSummary::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Record a declaration skipped during registration
    pub fn record_skipped(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }

    /// Record the error that stopped the compile
    pub fn fail(&mut self, diagnostic: Diagnostic) {
        self.outcome = CompileOutcome::Failed;
        self.push(diagnostic);
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.summary.errors += 1,
            Severity::Warn => self.summary.warnings += 1,
            Severity::Info => {}
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn set_registered(&mut self, records: usize, enums: usize) {
        self.summary.records_registered = records;
        self.summary.enums_registered = enums;
    }

    pub fn succeeded(&self) -> bool {
        self.outcome == CompileOutcome::Compiled
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// The error that stopped a failed compile
    pub fn fatal(&self) -> Option<&Diagnostic> {
        match self.outcome {
            CompileOutcome::Failed => self.diagnostics.last(),
            CompileOutcome::Compiled => None,
        }
    }

    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }
}

impl Default for CompileReport {
    fn default() -> Self {
        Self::new()
    }
}
