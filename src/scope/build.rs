//! Scope construction: one file's declaration tree to a scope subtree.

use smol_str::{SmolStr, format_smolstr};

use super::tree::{ScopeId, ScopeTree};
use crate::schema::Nested;

/// Build the scope for a file's top-level declarations.
///
/// The returned scope is detached; packaged files are attached to the root
/// by [`register_file`](super::register_file).
pub fn build_scope(tree: &mut ScopeTree, nested: &Nested) -> ScopeId {
    build_level(tree, nested, "")
}

fn build_level(tree: &mut ScopeTree, nested: &Nested, prefix: &str) -> ScopeId {
    let scope = tree.alloc();

    for (name, decl) in nested {
        let qualified: SmolStr = if prefix.is_empty() {
            name.clone()
        } else {
            format_smolstr!("{prefix}.{name}")
        };
        tree.set_export(scope, name.clone(), qualified.clone());

        // Declarations without nesting still get an empty scope so their
        // members resolve through it.
        let child = match decl.nested() {
            Some(inner) => build_level(tree, inner, &qualified),
            None => tree.alloc(),
        };
        tree.attach(scope, name.clone(), child);
    }

    scope
}
