//! Option literal decoding

use crate::error::CompileError;

/// A decoded option argument
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i64),
    Float(f64),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "'{}'", s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Decode a literal token
///
/// Single-quoted text is a string (quotes stripped, no escapes), text with a
/// decimal point is a float, anything else must be an integer.
pub fn decode_literal(text: &str) -> Result<Literal, CompileError> {
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        return Ok(Literal::String(text[1..text.len() - 1].to_string()));
    }

    let parsed = if text.contains('.') {
        text.parse::<f64>().ok().map(Literal::Float)
    } else {
        text.parse::<i64>().ok().map(Literal::Integer)
    };

    parsed.ok_or_else(|| CompileError::LiteralParse {
        text: text.to_string(),
    })
}
