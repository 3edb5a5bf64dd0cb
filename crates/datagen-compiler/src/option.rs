//! Property options (`[identity]`, `[default = 3]`, ...)
//!
//! Options are built while populating a property and consumed right away;
//! they are not kept in the type graph.

use std::collections::HashMap;
use crate::ast::{AstNode, NodeKind};
use crate::error::CompileError;
use crate::literal::{decode_literal, Literal};

/// Option that designates the identity property of a record
pub const IDENTITY_OPTION: &str = "identity";

/// Parameter key used for a single positional argument
pub const POSITIONAL_KEY: &str = "value";

/// A parsed option
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaOption {
    pub name: String,
    pub parameters: HashMap<String, Literal>,
}

impl SchemaOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: HashMap::new(),
        }
    }

    /// Build an option from its AST node
    ///
    /// A lone non-pair argument is stored under `"value"`. Otherwise every
    /// pair argument with both a name and a value becomes a named parameter;
    /// other arguments are ignored.
    pub fn from_node(node: &AstNode) -> Result<Self, CompileError> {
        if node.kind != NodeKind::Option {
            return Err(CompileError::structural(node, format!("Expected an option, found {:?}", node.kind)));
        }

        let (name, arguments) = node
            .children
            .split_first()
            .ok_or_else(|| CompileError::structural(node, "Option has no name"))?;

        let mut option = Self::new(name.text.clone());

        match arguments {
            [single] if single.kind != NodeKind::Pair => {
                option.parameters.insert(POSITIONAL_KEY.to_string(), decode_literal(&single.text)?);
            }
            _ => {
                for argument in arguments {
                    if let (NodeKind::Pair, [key, value]) = (argument.kind, argument.children.as_slice()) {
                        option.parameters.insert(key.text.clone(), decode_literal(&value.text)?);
                    }
                }
            }
        }

        Ok(option)
    }

    pub fn parameter(&self, key: &str) -> Option<&Literal> {
        self.parameters.get(key)
    }

    /// The positional argument, if one was given
    pub fn value(&self) -> Option<&Literal> {
        self.parameter(POSITIONAL_KEY)
    }

    pub fn is_identity(&self) -> bool {
        self.name == IDENTITY_OPTION
    }
}
