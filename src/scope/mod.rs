//! Lexical name spaces mirroring nested declarations.
//!
//! # Architecture
//!
//! 1. **Scope Builder** ([`build_scope`]) - one scope per nesting level of a
//!    file, exporting each declared name under its qualified name
//! 2. **Root Registrar** ([`register_file`]) - packaged files attach to the
//!    shared root scope and export their top-level names as `alias.Name`
//! 3. **Resolver** ([`Resolver`]) - walks parent links outward from the point
//!    of reference, settling cross-file collisions with the import list
//!
//! All scopes of one compilation run live in a single [`ScopeTree`] arena and
//! refer to each other by [`ScopeId`].

mod build;
mod register;
mod resolve;
mod tree;

pub use build::build_scope;
pub use register::register_file;
pub use resolve::{Resolver, primitive_type};
pub use tree::{Export, Scope, ScopeId, ScopeTree};
