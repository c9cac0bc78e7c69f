//! Resolution of raw type tokens to qualified TypeScript type names.

use smol_str::{SmolStr, format_smolstr};

use super::tree::{Export, ScopeId, ScopeTree};
use crate::base::FileKey;
use crate::error::UnresolvedType;

/// TypeScript type of a protobuf scalar kind.
///
/// 64-bit integers map to `string` because JavaScript numbers cannot hold
/// them exactly.
pub fn primitive_type(token: &str) -> Option<&'static str> {
    Some(match token {
        "double" | "float" | "int32" | "uint32" | "sint32" | "fixed32" | "sfixed32" => "number",
        "int64" | "uint64" | "sint64" | "fixed64" | "sfixed64" | "string" | "bytes" => "string",
        "bool" => "boolean",
        _ => return None,
    })
}

/// Resolves type tokens as seen from one scope of one file.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    tree: &'a ScopeTree,
    scope: ScopeId,
    /// Imported file identifiers of the referencing file, in order.
    imports: &'a [SmolStr],
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a ScopeTree, scope: ScopeId, imports: &'a [SmolStr]) -> Self {
        Self { tree, scope, imports }
    }

    /// Resolve `token` to the TypeScript type to render.
    ///
    /// Dotted tokens (`Outer.Inner`, `.Outer.Inner`) resolve their first
    /// segment and keep the rest as written.
    pub fn resolve(&self, token: &str) -> Result<SmolStr, UnresolvedType> {
        if let Some(primitive) = primitive_type(token) {
            return Ok(SmolStr::new_static(primitive));
        }

        let path = token.strip_prefix('.').unwrap_or(token);
        let (head, tail) = match path.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (path, None),
        };

        let resolved = self.lookup(head).ok_or_else(|| UnresolvedType::new(token))?;
        Ok(match tail {
            Some(tail) => format_smolstr!("{resolved}.{tail}"),
            None => resolved,
        })
    }

    /// Walk from the current scope outward until some scope settles `name`.
    fn lookup(&self, name: &str) -> Option<SmolStr> {
        self.tree.ancestors(self.scope).find_map(|id| {
            match self.tree.get(id).export(name)? {
                Export::Single(qualified) => Some(qualified.clone()),
                Export::Ambiguous(candidates) => self.disambiguate(candidates),
            }
        })
    }

    /// Pick the candidate that belongs to a file this file imports.
    fn disambiguate(&self, candidates: &[SmolStr]) -> Option<SmolStr> {
        self.imports.iter().find_map(|import| {
            let alias = FileKey::new(import.as_str()).alias();
            candidates
                .iter()
                .find(|candidate| {
                    candidate
                        .strip_prefix(alias.as_str())
                        .is_some_and(|rest| rest.starts_with('.'))
                })
                .cloned()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Decl, Message, Nested};
    use crate::scope::{build_scope, register_file};
    use rstest::rstest;

    #[rstest]
    #[case("double", "number")]
    #[case("float", "number")]
    #[case("int32", "number")]
    #[case("uint32", "number")]
    #[case("sint32", "number")]
    #[case("fixed32", "number")]
    #[case("sfixed32", "number")]
    #[case("int64", "string")]
    #[case("uint64", "string")]
    #[case("sint64", "string")]
    #[case("fixed64", "string")]
    #[case("sfixed64", "string")]
    #[case("string", "string")]
    #[case("bytes", "string")]
    #[case("bool", "boolean")]
    fn test_primitive_table(#[case] proto: &str, #[case] ts: &str) {
        assert_eq!(primitive_type(proto), Some(ts));

        // Primitives win even with an empty scope chain.
        let tree = ScopeTree::new();
        let resolver = Resolver::new(&tree, tree.root(), &[]);
        assert_eq!(resolver.resolve(proto).unwrap(), ts);
    }

    #[test]
    fn test_non_primitives_are_not_in_table() {
        for token in ["Int32", "any", "message", "string64", ""] {
            assert_eq!(primitive_type(token), None);
        }
    }

    fn file_with(tree: &mut ScopeTree, file: &str, names: &[&str]) -> ScopeId {
        let nested: Nested = names
            .iter()
            .map(|&n| (SmolStr::new(n), Decl::Message(Message::default())))
            .collect();
        let scope = build_scope(tree, &nested);
        let key = FileKey::new(file);
        register_file(tree, key.stem(), scope, &key);
        scope
    }

    #[test]
    fn test_local_name_wins_over_root() {
        let mut tree = ScopeTree::new();
        file_with(&mut tree, "b.proto", &["Foo"]);
        let a = file_with(&mut tree, "a.proto", &["Foo"]);
        let imports = [SmolStr::new("b.proto")];

        let resolver = Resolver::new(&tree, a, &imports);
        assert_eq!(resolver.resolve("Foo").unwrap(), "Foo");
    }

    #[test]
    fn test_ambiguous_settled_by_imports() {
        let mut tree = ScopeTree::new();
        file_with(&mut tree, "c.proto", &["Foo"]);
        file_with(&mut tree, "b.proto", &["Foo"]);
        let a = file_with(&mut tree, "a.proto", &["Bar"]);
        let imports = [SmolStr::new("b.proto")];

        let resolver = Resolver::new(&tree, a, &imports);
        assert_eq!(resolver.resolve("Foo").unwrap(), "b.Foo");
    }

    #[test]
    fn test_ambiguous_without_matching_import_fails() {
        let mut tree = ScopeTree::new();
        file_with(&mut tree, "c.proto", &["Foo"]);
        file_with(&mut tree, "b.proto", &["Foo"]);
        let a = file_with(&mut tree, "a.proto", &["Bar"]);
        let imports = [SmolStr::new("d.proto")];

        let err = Resolver::new(&tree, a, &imports).resolve("Foo").unwrap_err();
        assert_eq!(err, UnresolvedType::new("Foo"));
    }

    #[test]
    fn test_alias_prefix_needs_dot_boundary() {
        let mut tree = ScopeTree::new();
        file_with(&mut tree, "users.proto", &["Foo"]);
        file_with(&mut tree, "user.proto", &["Foo"]);
        let a = file_with(&mut tree, "a.proto", &["Bar"]);
        let imports = [SmolStr::new("user.proto")];

        let resolver = Resolver::new(&tree, a, &imports);
        assert_eq!(resolver.resolve("Foo").unwrap(), "user.Foo");
    }

    #[test]
    fn test_dotted_token_resolves_head() {
        let mut tree = ScopeTree::new();
        file_with(&mut tree, "b.proto", &["Outer"]);
        let a = file_with(&mut tree, "a.proto", &["Bar"]);

        let resolver = Resolver::new(&tree, a, &[]);
        assert_eq!(resolver.resolve("Outer.Inner").unwrap(), "b.Outer.Inner");
        assert_eq!(resolver.resolve(".Outer.Inner").unwrap(), "b.Outer.Inner");
    }

    #[test]
    fn test_unknown_token() {
        let tree = ScopeTree::new();
        let err = Resolver::new(&tree, tree.root(), &[]).resolve("Bogus").unwrap_err();
        assert_eq!(err.token, "Bogus");
        assert_eq!(err.to_string(), "unresolved type `Bogus`");
    }
}
