//! Type-expression resolution
//!
//! A property's type arrives as a flattened prefix sequence of markers and
//! name tokens (`map list int string` for `map<list<int>, string>`). The
//! resolver walks it by recursive descent with a cursor that each call takes
//! by value and hands back advanced past exactly the tokens it consumed.

use datagen_core::{Type, TypeId, TypeRegistry};
use crate::ast::{AstNode, NodeKind};
use crate::error::CompileError;

/// Read position in a token sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCursor<'a> {
    tokens: &'a [AstNode],
    position: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [AstNode]) -> Self {
        Self { tokens, position: 0 }
    }

    /// The next token and the cursor past it
    pub fn advance(self) -> Option<(&'a AstNode, Self)> {
        let token = self.tokens.get(self.position)?;
        Some((token, Self { position: self.position + 1, ..self }))
    }

    /// Tokens not yet consumed
    pub fn remaining(self) -> &'a [AstNode] {
        &self.tokens[self.position.min(self.tokens.len())..]
    }

    pub fn position(self) -> usize {
        self.position
    }

    pub fn is_exhausted(self) -> bool {
        self.position >= self.tokens.len()
    }
}

/// Resolves type expressions referenced from one record
pub struct TypeExpressionResolver<'r> {
    registry: &'r TypeRegistry,

    /// Record the expression appears in; `None` resolves from the root
    scope: Option<TypeId>,
}

impl<'r> TypeExpressionResolver<'r> {
    pub fn new(registry: &'r TypeRegistry, scope: Option<TypeId>) -> Self {
        Self { registry, scope }
    }

    /// Resolve one type expression starting at `cursor`
    pub fn resolve<'a>(&self, cursor: TokenCursor<'a>) -> Result<(Type, TokenCursor<'a>), CompileError> {
        let (marker, cursor) = cursor
            .advance()
            .ok_or_else(|| malformed("expression ended where a type was expected"))?;

        match marker.kind {
            NodeKind::TypePrimitive => {
                let (name, cursor) = cursor
                    .advance()
                    .ok_or_else(|| malformed("expression ended where a type name was expected"))?;
                if name.kind != NodeKind::Token {
                    return Err(malformed(format!("expected a type name, found {:?}", name.kind)));
                }

                let id = self.registry.lookup_scoped(self.scope, &name.text)?;
                Ok((self.registry.type_of(id), cursor))
            }
            NodeKind::TypeList => {
                let (element, cursor) = self.resolve(cursor)?;
                Ok((Type::list(element), cursor))
            }
            NodeKind::TypeSet => {
                let (element, cursor) = self.resolve(cursor)?;
                Ok((Type::set(element), cursor))
            }
            NodeKind::TypeMap => {
                let (key, cursor) = self.resolve(cursor)?;
                let (value, cursor) = self.resolve(cursor)?;
                Ok((Type::map(key, value), cursor))
            }
            other => Err(malformed(format!(
                "unexpected {:?} '{}' where a type was expected",
                other, marker.text
            ))),
        }
    }
}

fn malformed(reason: impl Into<String>) -> CompileError {
    CompileError::MalformedTypeExpression(reason.into())
}
