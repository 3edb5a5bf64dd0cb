//! Two-pass schema compiler
//!
//! Pass 1 walks the whole AST and registers an empty shell for every record
//! and enum declaration, so later declarations can be referenced before they
//! appear. A failure there only skips the offending subtree: it is logged,
//! recorded in the report, and registration carries on with its siblings.
//!
//! Pass 2 walks the top-level declarations again and fills the shells in:
//! properties, enum values, comments and identity designations. Any failure
//! there aborts the compile, since a half-resolved graph is of no use to code
//! generation.

use std::collections::HashSet;
use datagen_core::{CompileReport, CompilerConfig, TypeId, TypeKind, TypeRegistry};
use crate::ast::{Ast, AstNode, NodeKind};
use crate::error::CompileError;
use crate::option::SchemaOption;
use crate::property::PropertyFactory;
use crate::reporter::{display_name, Reporter, TracingReporter};
use crate::resolver::{TokenCursor, TypeExpressionResolver};

/// A successful compile
#[derive(Debug)]
pub struct Compilation {
    /// The populated type graph
    pub registry: TypeRegistry,

    /// Diagnostics recorded along the way (pass-1 failures)
    pub report: CompileReport,
}

/// A failed compile
#[derive(Debug, thiserror::Error)]
#[error("Schema compile failed")]
pub struct CompileFailure {
    /// The error that aborted population
    #[source]
    pub error: CompileError,

    /// Every diagnostic recorded, ending with the fatal error
    pub report: CompileReport,
}

/// Compiles schema ASTs into type registries
pub struct SchemaCompiler<R = TracingReporter> {
    config: CompilerConfig,
    reporter: R,
}

impl SchemaCompiler<TracingReporter> {
    /// Create a compiler that reports registered types through `tracing`
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            reporter: TracingReporter,
        }
    }
}

impl<R: Reporter> SchemaCompiler<R> {
    /// Replace the registered-type reporter
    pub fn with_reporter<S: Reporter>(self, reporter: S) -> SchemaCompiler<S> {
        SchemaCompiler {
            config: self.config,
            reporter,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `ast` into a fully resolved type registry
    pub fn compile(&mut self, ast: &Ast) -> Result<Compilation, CompileFailure> {
        let mut report = CompileReport::new();

        let mut registry = match TypeRegistry::with_builtins(
            self.config.types.primitives.iter().cloned(),
            self.config.types.blob.clone(),
        ) {
            Ok(registry) => registry,
            Err(err) => return Err(fail(err.into(), None, report)),
        };

        // Pass 1
        let mut registration = Registration {
            registry: &mut registry,
            report: &mut report,
        };
        for node in &ast.nodes {
            registration.register(node, None);
        }

        let records = registry.types_of(TypeKind::UserData).count();
        let enums = registry.types_of(TypeKind::UserEnum).count();
        report.set_registered(records, enums);
        tracing::debug!(records, enums, "registration complete");

        if !self.config.quiet {
            for (_, declaration) in registry.types_of(TypeKind::UserData) {
                let name = declaration.name();
                self.reporter.registered_type(name, &display_name(name));
            }
        }

        // Pass 2
        let mut population = Population {
            registry: &mut registry,
            camel_case_keys: self.config.camel_case_keys,
            populated: HashSet::new(),
        };
        for node in &ast.nodes {
            let result = match node.kind {
                NodeKind::Record => population.populate_record(node, None),
                NodeKind::Enum => population.populate_enum(node, None),
                _ => Ok(()),
            };
            if let Err(err) = result {
                let scope = node.first_child_text().map(str::to_string);
                return Err(fail(err, scope.as_deref(), report));
            }
        }

        Ok(Compilation { registry, report })
    }
}

fn fail(error: CompileError, scope: Option<&str>, mut report: CompileReport) -> CompileFailure {
    tracing::error!(error = %error, "schema compile aborted");
    report.fail(error.to_diagnostic(scope));
    CompileFailure { error, report }
}

struct Registration<'a> {
    registry: &'a mut TypeRegistry,
    report: &'a mut CompileReport,
}

impl Registration<'_> {
    /// Register every declaration under `node`
    fn register(&mut self, node: &AstNode, parent: Option<TypeId>) {
        let scope = match self.register_declaration(node, parent) {
            Ok(Some(id)) if node.kind == NodeKind::Record => Some(id),
            Ok(_) => None,
            Err(err) => {
                let parent_name = parent.map(|id| self.registry.get(id).name().to_string());
                tracing::warn!(error = %err, "skipping declaration during registration");
                self.report.record_skipped(err.to_diagnostic(parent_name.as_deref()));
                return;
            }
        };

        for child in &node.children {
            self.register(child, scope);
        }
    }

    fn register_declaration(&mut self, node: &AstNode, parent: Option<TypeId>) -> Result<Option<TypeId>, CompileError> {
        let Some(name_node) = node.children.first() else {
            return Ok(None);
        };

        let id = match node.kind {
            NodeKind::Record => self.registry.register_data(parent, declaration_name(name_node)?)?,
            NodeKind::Enum => self.registry.register_enum(parent, declaration_name(name_node)?)?,
            _ => return Ok(None),
        };

        tracing::debug!(name = self.registry.get(id).name(), "registered declaration");
        Ok(Some(id))
    }
}

/// Local name of a declaration, which must be a single plain segment
fn declaration_name(node: &AstNode) -> Result<&str, CompileError> {
    let name = node.text.as_str();
    if node.kind != NodeKind::Token {
        return Err(CompileError::structural(node, format!("Expected a declaration name, found {:?}", node.kind)));
    }
    if name.is_empty() || name.contains('.') || name.chars().any(char::is_whitespace) {
        return Err(CompileError::structural(node, format!("Invalid declaration name '{}'", name)));
    }
    Ok(name)
}

struct Population<'a> {
    registry: &'a mut TypeRegistry,
    camel_case_keys: bool,

    /// Shells already populated; a second visit means a duplicate declaration
    populated: HashSet<TypeId>,
}

impl Population<'_> {
    /// Fetch the registered shell for a declaration, along with its members
    fn shell<'n>(&mut self, node: &'n AstNode, parent: Option<TypeId>, kind: TypeKind) -> Result<(TypeId, &'n [AstNode]), CompileError> {
        let (name_node, members) = node
            .children
            .split_first()
            .ok_or_else(|| CompileError::structural(node, format!("{:?} declaration has no name", node.kind)))?;

        let name = self.registry.qualify(parent, declaration_name(name_node)?);
        let id = self.registry.lookup_exact(&name)?;
        if self.registry.get(id).kind() != kind || !self.populated.insert(id) {
            return Err(CompileError::DuplicateType(name));
        }

        tracing::debug!(name = %name, "populating declaration");
        Ok((id, members))
    }

    fn populate_record(&mut self, node: &AstNode, parent: Option<TypeId>) -> Result<(), CompileError> {
        let (id, members) = self.shell(node, parent, TypeKind::UserData)?;

        for member in members {
            match member.kind {
                NodeKind::Record => self.populate_record(member, Some(id))?,
                NodeKind::Enum => self.populate_enum(member, Some(id))?,
                NodeKind::Property => self.populate_property(member, id)?,
                NodeKind::Comment => {
                    if let Some(data) = self.registry.data_mut(id) {
                        data.comment = Some(decode_comment(member));
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn populate_enum(&mut self, node: &AstNode, parent: Option<TypeId>) -> Result<(), CompileError> {
        let (id, members) = self.shell(node, parent, TypeKind::UserEnum)?;
        let Some(enumeration) = self.registry.enumeration_mut(id) else {
            return Err(CompileError::structural(node, "Enum shell is not an enum"));
        };

        for member in members {
            match member.kind {
                NodeKind::Comment => enumeration.comment = Some(decode_comment(member)),
                _ => enumeration.add_value(member.text.clone()),
            }
        }

        Ok(())
    }

    fn populate_property(&mut self, node: &AstNode, owner: TypeId) -> Result<(), CompileError> {
        let (name_node, rest) = node
            .children
            .split_first()
            .ok_or_else(|| CompileError::structural(node, "Property has no name"))?;

        self.add_property(owner, &name_node.text, rest)
            .map_err(|err| err.in_property(self.registry.get(owner).name(), &name_node.text))
    }

    fn add_property(&mut self, owner: TypeId, name: &str, rest: &[AstNode]) -> Result<(), CompileError> {
        let resolver = TypeExpressionResolver::new(self.registry, Some(owner));
        let (ty, cursor) = resolver.resolve(TokenCursor::new(rest))?;

        let mut options = Vec::new();
        let mut comment = None;
        for child in cursor.remaining() {
            match child.kind {
                NodeKind::Option => options.push(SchemaOption::from_node(child)?),
                NodeKind::Comment => comment = Some(decode_comment(child)),
                _ => {}
            }
        }

        let property = PropertyFactory::new(self.registry, self.camel_case_keys).build(owner, name, ty, comment);
        let data = self.registry.data_mut(owner).ok_or_else(|| CompileError::StructuralParse {
            message: format!("Property owner {} is not a record", owner.index()),
            line: None,
            column: None,
        })?;

        let index = data.add_property(property);
        for option in options.iter().filter(|o| o.is_identity()) {
            tracing::debug!(owner = %data.name, property = name, option = %option.name, "identity designated");
            data.set_identity(index);
        }

        Ok(())
    }
}

/// Text of a comment node: its words joined by single spaces
///
/// No separator follows the last word, so the text carries no trailing space.
/// A comment node without word children falls back to its own text.
fn decode_comment(node: &AstNode) -> String {
    if node.children.is_empty() {
        return node.text.clone();
    }

    node.children
        .iter()
        .map(|word| word.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
