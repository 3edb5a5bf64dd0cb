//! Datagen Core
//!
//! Core domain model for compiled schemas: the resolved type graph,
//! the type registry that owns it, and the stable diagnostic/report types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod types;
pub mod registry;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use types::{Type, TypeId, TypeKind, Declaration, PrimitiveType, BlobType, UserDataType, UserEnumType, Property, PropertyKind};
pub use registry::{TypeRegistry, RegistryError};
pub use report::{CompileOutcome, CompileReport, ReportSummary, REPORT_VERSION};
pub use config::{CompilerConfig, TypesConfig, ConfigError};
