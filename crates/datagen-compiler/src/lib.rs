//! Schema compilation
//!
//! This crate handles:
//! - The AST shape produced by the external schema grammar
//! - Decoding option literals and building options
//! - Resolving (possibly nested) container type expressions
//! - Selecting the property representation for a resolved type
//! - The two-pass compile from AST to a populated type registry

pub mod ast;
pub mod literal;
pub mod option;
pub mod resolver;
pub mod property;
pub mod reporter;
pub mod error;
pub mod compiler;

pub use ast::{Ast, AstError, AstNode, NodeKind};
pub use literal::{Literal, decode_literal};
pub use option::{SchemaOption, IDENTITY_OPTION};
pub use resolver::{TokenCursor, TypeExpressionResolver};
pub use property::PropertyFactory;
pub use reporter::{Reporter, TracingReporter, CollectingReporter, display_name};
pub use error::CompileError;
pub use compiler::{SchemaCompiler, Compilation, CompileFailure};
