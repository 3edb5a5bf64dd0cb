//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Schema structure (1xxx)
    /// An AST node does not have the shape expected at that point
    StructuralParseError,

    // Type resolution (2xxx)
    /// Two declarations share a qualified name
    DuplicateType,

    /// A type reference could not be resolved from its scope
    TypeNotFound,

    /// A type expression is malformed or ends early
    MalformedTypeExpression,

    // Options (3xxx)
    /// An option literal is neither a quoted string, a float, nor an integer
    LiteralParseError,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuralParseError => "STRUCTURAL_PARSE_ERROR",
            Self::DuplicateType => "DUPLICATE_TYPE",
            Self::TypeNotFound => "TYPE_NOT_FOUND",
            Self::MalformedTypeExpression => "MALFORMED_TYPE_EXPRESSION",
            Self::LiteralParseError => "LITERAL_PARSE_ERROR",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but does not stop compilation
    Warn,

    /// Error - the affected declaration is not usable
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where in the schema a diagnostic applies
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Qualified name of the enclosing declaration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Optional line number (1-indexed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// Optional column number (1-indexed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl Location {
    /// Create a location naming only the enclosing declaration
    pub fn in_scope(scope: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            line: None,
            column: None,
        }
    }

    /// Create a location from a source position
    pub fn at(line: Option<usize>, column: Option<usize>) -> Self {
        Self {
            scope: None,
            line,
            column,
        }
    }

    /// Set the enclosing declaration
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.scope.is_none() && self.line.is_none() && self.column.is_none()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(scope) = &self.scope {
            parts.push(scope.clone());
        }
        match (self.line, self.column) {
            (Some(line), Some(column)) => parts.push(format!("{}:{}", line, column)),
            (Some(line), None) => parts.push(format!("line {}", line)),
            _ => {}
        }
        write!(f, "{}", parts.join(" @ "))
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Source location (best-effort)
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
        }
    }

    /// Set the location, dropping it if it carries nothing
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = if location.is_empty() { None } else { Some(location) };
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.severity, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}
