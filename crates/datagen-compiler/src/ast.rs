//! Schema AST
//!
//! The tree handed over by the schema grammar. The compiler only reads it.
//! Nodes deserialize from JSON so that a grammar running out of process can
//! hand its output over as a file.

use serde::{Deserialize, Serialize};

/// Kind of an AST node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// `data` declaration; first child is the name token
    Record,

    /// `enum` declaration; first child is the name token, the rest are values
    Enum,

    /// Property; first child is the name, then the type expression, then
    /// options and comments
    Property,

    /// Annotation; first child is the option name
    Option,

    /// `name = value` option argument
    Pair,

    /// Comment; children are the comment words
    Comment,

    /// Type-expression marker followed by a type name token
    TypePrimitive,

    /// Type-expression marker followed by one element type
    TypeList,

    /// Type-expression marker followed by one element type
    TypeSet,

    /// Type-expression marker followed by a key type and a value type
    TypeMap,

    /// End of input
    Eof,

    /// Plain leaf token (names, literals, enum values, comment words)
    Token,
}

/// A node of the schema AST
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstNode {
    pub kind: NodeKind,

    /// Token text
    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AstNode>,

    /// Source line (1-indexed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// Source column (1-indexed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl AstNode {
    /// Create a node without children
    pub fn new(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
            line: None,
            column: None,
        }
    }

    /// Create a plain leaf token
    pub fn token(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Token, text)
    }

    /// Record declaration named `name`
    pub fn record(name: &str, children: Vec<AstNode>) -> Self {
        Self::new(NodeKind::Record, "data").with_children(named(name, children))
    }

    /// Enum declaration named `name` with the given values
    pub fn enumeration(name: &str, values: &[&str]) -> Self {
        let values = values.iter().map(|v| Self::token(*v)).collect();
        Self::new(NodeKind::Enum, "enum").with_children(named(name, values))
    }

    /// Property named `name` of the type written in `type_expr`, followed by
    /// option and comment nodes
    pub fn property(name: &str, type_expr: &str, extras: Vec<AstNode>) -> Self {
        let mut children = type_tokens(type_expr);
        children.extend(extras);
        Self::new(NodeKind::Property, "property").with_children(named(name, children))
    }

    /// Option without arguments, or with positional/paired arguments
    pub fn option(name: &str, arguments: Vec<AstNode>) -> Self {
        Self::new(NodeKind::Option, "option").with_children(named(name, arguments))
    }

    /// `name = value` option argument
    pub fn pair(name: &str, value: &str) -> Self {
        Self::new(NodeKind::Pair, "=").with_children(vec![Self::token(name), Self::token(value)])
    }

    /// Comment whose words are split on whitespace
    pub fn comment(text: &str) -> Self {
        let words = text.split_whitespace().map(Self::token).collect();
        Self::new(NodeKind::Comment, "comment").with_children(words)
    }

    pub fn eof() -> Self {
        Self::new(NodeKind::Eof, "<EOF>")
    }

    pub fn with_children(mut self, children: Vec<AstNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Text of the first child, if any
    pub fn first_child_text(&self) -> Option<&str> {
        self.children.first().map(|c| c.text.as_str())
    }
}

fn named(name: &str, rest: Vec<AstNode>) -> Vec<AstNode> {
    let mut children = Vec::with_capacity(rest.len() + 1);
    children.push(AstNode::token(name));
    children.extend(rest);
    children
}

/// Flatten type-expression syntax (`map<string, list<int>>`) into the
/// marker/token sequence the grammar emits
///
/// Whitespace is ignored and angle brackets and commas only delimit names;
/// `list`, `set` and `map` followed by `<` become container markers, every
/// other name becomes a primitive marker plus its name token. No shape
/// checking happens here.
pub fn type_tokens(type_expr: &str) -> Vec<AstNode> {
    let mut tokens = Vec::new();
    let mut rest = type_expr.trim();

    while !rest.is_empty() {
        let end = rest
            .find(|c: char| c == '<' || c == '>' || c == ',' || c.is_whitespace())
            .unwrap_or(rest.len());

        if end == 0 {
            rest = rest[1..].trim_start();
            continue;
        }

        let name = &rest[..end];
        rest = rest[end..].trim_start();
        let opens = rest.starts_with('<');

        match name {
            "list" if opens => tokens.push(AstNode::new(NodeKind::TypeList, name)),
            "set" if opens => tokens.push(AstNode::new(NodeKind::TypeSet, name)),
            "map" if opens => tokens.push(AstNode::new(NodeKind::TypeMap, name)),
            _ => {
                tokens.push(AstNode::new(NodeKind::TypePrimitive, "type"));
                tokens.push(AstNode::token(name));
            }
        }
    }

    tokens
}

/// A parsed schema file: its top-level declarations
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ast {
    pub nodes: Vec<AstNode>,
}

impl Ast {
    pub fn new(nodes: Vec<AstNode>) -> Self {
        Self { nodes }
    }

    /// Load an AST from its JSON form
    pub fn from_json(json: &str) -> Result<Self, AstError> {
        serde_json::from_str(json)
            .map_err(|e| AstError::ParseError(e.to_string()))
    }

    /// Load an AST from a JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, AstError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AstError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_json(&contents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AstError {
    #[error("Failed to read AST file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse AST JSON: {0}")]
    ParseError(String),
}
