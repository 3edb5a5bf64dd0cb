//! Compile errors

use datagen_core::{Diagnostic, DiagnosticCode, Location, RegistryError, Severity};
use crate::ast::AstNode;

/// Errors raised while compiling a schema
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Unexpected schema structure: {message}")]
    StructuralParse {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    #[error("Duplicate type: {0}")]
    DuplicateType(String),

    #[error("Type not found: {name}{}", scope_suffix(.scope))]
    TypeNotFound {
        name: String,
        scope: Option<String>,
    },

    #[error("Malformed type expression: {0}")]
    MalformedTypeExpression(String),

    #[error("Could not parse literal: {text}")]
    LiteralParse { text: String },

    #[error("In property {owner}.{property}: {source}")]
    InProperty {
        owner: String,
        property: String,
        #[source]
        source: Box<CompileError>,
    },
}

fn scope_suffix(scope: &Option<String>) -> String {
    scope
        .as_ref()
        .map(|s| format!(" (referenced from {})", s))
        .unwrap_or_default()
}

impl CompileError {
    /// Structural error located at `node`
    pub fn structural(node: &AstNode, message: impl Into<String>) -> Self {
        Self::StructuralParse {
            message: message.into(),
            line: node.line,
            column: node.column,
        }
    }

    /// Attach the property being populated
    pub fn in_property(self, owner: &str, property: &str) -> Self {
        Self::InProperty {
            owner: owner.to_string(),
            property: property.to_string(),
            source: Box::new(self),
        }
    }

    /// The error underneath any property context
    pub fn root_cause(&self) -> &CompileError {
        match self {
            Self::InProperty { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Stable diagnostic code for this error
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::StructuralParse { .. } => DiagnosticCode::StructuralParseError,
            Self::DuplicateType(_) => DiagnosticCode::DuplicateType,
            Self::TypeNotFound { .. } => DiagnosticCode::TypeNotFound,
            Self::MalformedTypeExpression(_) => DiagnosticCode::MalformedTypeExpression,
            Self::LiteralParse { .. } => DiagnosticCode::LiteralParseError,
            Self::InProperty { source, .. } => source.code(),
        }
    }

    /// Convert to an error-severity diagnostic
    pub fn to_diagnostic(&self, scope: Option<&str>) -> Diagnostic {
        let mut location = match self.root_cause() {
            Self::StructuralParse { line, column, .. } => Location::at(*line, *column),
            _ => Location::default(),
        };
        match self {
            Self::InProperty { owner, .. } => location = location.with_scope(owner.clone()),
            _ => {
                if let Some(scope) = scope {
                    location = location.with_scope(scope);
                }
            }
        }

        Diagnostic::new(self.code(), Severity::Error, self.to_string()).with_location(location)
    }
}

impl From<RegistryError> for CompileError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::DuplicateType(name) => Self::DuplicateType(name),
            RegistryError::TypeNotFound { name, scope } => Self::TypeNotFound { name, scope },
            RegistryError::InvalidScope(name) => Self::StructuralParse {
                message: format!("{} is not declared inside a record", name),
                line: None,
                column: None,
            },
        }
    }
}
