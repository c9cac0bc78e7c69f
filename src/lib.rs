//! # pbts
//!
//! Generates TypeScript declaration files (`.ts`) from Protocol Buffers
//! schemas (`.proto`), resolving type references across files through a
//! tree of scopes.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project → config file + whole-directory compilation
//!   ↓
//! driver  → per-file sessions, completion cache, cycle guard
//!   ↓
//! emit    → TypeScript text for interfaces, enums, services, namespaces
//!   ↓
//! scope   → scope tree, root registrar, type resolver
//!   ↓
//! syntax  → `.proto` lexer + parser producing the schema model
//!   ↓
//! schema  → declaration tree (messages, enums, services, namespaces)
//!   ↓
//! base    → primitives (FileKey, LineIndex, TextRange)
//! ```

/// Foundation types: FileKey, LineIndex, TextRange
pub mod base;

/// Compilation sessions and the completion cache
pub mod driver;

/// TypeScript rendering
pub mod emit;

pub mod error;

/// Configuration and directory-level compilation
pub mod project;

/// Parsed declaration model
pub mod schema;

/// Scope tree and name resolution
pub mod scope;

/// `.proto` lexer and parser
pub mod syntax;

pub use base::{FileKey, LineCol, LineIndex, TextRange, TextSize};
pub use driver::{CompileSession, FileOutput, SessionOptions, SourceProvider, SourceSet};
pub use emit::EmitOptions;
pub use error::{PbtsError, Result, UnresolvedType};
pub use project::{CompileOptions, WorkspaceReport, compile_workspace};
pub use schema::{Decl, ParseOptions, ParsedFile};
pub use scope::{Resolver, ScopeId, ScopeTree};
pub use syntax::{ParseError, ProtoFileParser, ProtoParser};
