//! TypeScript text for resolved declarations.
//!
//! [`Emitter::render_nested`] walks a declaration tree alongside its scope
//! tree, resolving every type reference through a [`Resolver`] anchored at
//! the declaration's own scope, and hands the results to the block renderers
//! in [`blocks`].

pub mod blocks;

use smol_str::{SmolStr, format_smolstr};

use crate::error::UnresolvedType;
use crate::schema::{Decl, FieldRule, Message, Nested, Service};
use crate::scope::{Resolver, ScopeId, ScopeTree, primitive_type};

pub use blocks::{
    render_comment, render_enum, render_header, render_imports, render_interface,
    render_namespace, render_service,
};

/// Rendering configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    /// Mark every interface field optional.
    pub force_optional: bool,
    /// Declarations whose name ends with this suffix get optional fields.
    pub request_suffix: SmolStr,
    /// One level of indentation.
    pub indent: SmolStr,
    /// Lint rules disabled at the top of every generated file.
    pub suppressions: Vec<String>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            force_optional: false,
            request_suffix: SmolStr::new_static("Req"),
            indent: SmolStr::new_static("  "),
            suppressions: Vec::new(),
        }
    }
}

impl EmitOptions {
    /// Whether fields of the declaration `name` render with `?`.
    pub fn fields_optional(&self, name: &str) -> bool {
        self.force_optional
            || (!self.request_suffix.is_empty() && name.ends_with(self.request_suffix.as_str()))
    }
}

/// How a member's type is wrapped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Array,
    /// Map keyed by the given TypeScript key type.
    Map { key: SmolStr },
}

/// A field or method with its type resolved, ready to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedMember {
    pub name: SmolStr,
    pub ty: SmolStr,
    pub comment: Option<String>,
    pub shape: Shape,
}

impl ResolvedMember {
    /// The member type with its shape applied.
    pub fn rendered_type(&self) -> SmolStr {
        match &self.shape {
            Shape::Scalar => self.ty.clone(),
            Shape::Array => format_smolstr!("{}[]", self.ty),
            Shape::Map { key } => format_smolstr!("{{ [key: {key}]: {} }}", self.ty),
        }
    }
}

/// Resolve every field of a message. Repeated wins over map, as in the
/// declaration JSON a field is never both.
pub fn resolve_fields(
    message: &Message,
    resolver: &Resolver<'_>,
) -> Result<Vec<ResolvedMember>, UnresolvedType> {
    message
        .fields
        .iter()
        .map(|(name, field)| {
            let ty = resolver.resolve(&field.type_name)?;
            let shape = if field.rule == FieldRule::Repeated {
                Shape::Array
            } else if let Some(key) = &field.key_type {
                let key = primitive_type(key).map_or_else(|| key.clone(), SmolStr::new_static);
                Shape::Map { key }
            } else {
                Shape::Scalar
            };
            Ok(ResolvedMember { name: name.clone(), ty, comment: field.comment.clone(), shape })
        })
        .collect()
}

/// Resolve every rpc of a service into a function type.
pub fn resolve_methods(
    service: &Service,
    resolver: &Resolver<'_>,
) -> Result<Vec<ResolvedMember>, UnresolvedType> {
    service
        .methods
        .iter()
        .map(|(name, method)| {
            let request = resolver.resolve(&method.request_type)?;
            let response = resolver.resolve(&method.response_type)?;
            Ok(ResolvedMember {
                name: name.clone(),
                ty: format_smolstr!("(params: {request}) => Promise<{response}>"),
                comment: method.comment.clone(),
                shape: Shape::Scalar,
            })
        })
        .collect()
}

/// Renders the declarations of one file.
#[derive(Clone, Copy, Debug)]
pub struct Emitter<'a> {
    tree: &'a ScopeTree,
    imports: &'a [SmolStr],
    options: &'a EmitOptions,
}

impl<'a> Emitter<'a> {
    pub fn new(tree: &'a ScopeTree, imports: &'a [SmolStr], options: &'a EmitOptions) -> Self {
        Self { tree, imports, options }
    }

    /// Render `nested`, whose names are declared in `scope`, in declaration
    /// order. The result carries no trailing blank line.
    pub fn render_nested(&self, nested: &Nested, scope: ScopeId) -> Result<String, UnresolvedType> {
        let mut out = String::new();
        for (name, decl) in nested {
            let decl_scope = self.tree.get(scope).child(name).unwrap_or(scope);
            out.push_str(&self.render_decl(name, decl, decl_scope)?);
        }
        if out.ends_with('\n') {
            out.pop();
        }
        Ok(out)
    }

    fn render_decl(
        &self,
        name: &str,
        decl: &Decl,
        scope: ScopeId,
    ) -> Result<String, UnresolvedType> {
        let resolver = Resolver::new(self.tree, scope, self.imports);
        let mut out = match decl {
            Decl::Message(message) => {
                let members = resolve_fields(message, &resolver)?;
                let optional = self.options.fields_optional(name);
                render_interface(
                    name,
                    message.comment.as_deref(),
                    &members,
                    optional,
                    &self.options.indent,
                )
            }
            Decl::Enum(e) => render_enum(name, e, &self.options.indent),
            Decl::Service(service) => render_service(&resolve_methods(service, &resolver)?),
            Decl::Namespace(_) => String::new(),
        };

        if let Some(inner) = decl.nested() {
            let content = self.render_nested(inner, scope)?;
            out.push_str(&render_namespace(name, &content, &self.options.indent));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Enum, EnumValue, Field, Method, Namespace};
    use crate::scope::build_scope;

    fn render(nested: &Nested, options: &EmitOptions) -> Result<String, UnresolvedType> {
        let mut tree = ScopeTree::new();
        let scope = build_scope(&mut tree, nested);
        Emitter::new(&tree, &[], options).render_nested(nested, scope)
    }

    fn message(fields: &[(&str, Field)]) -> Message {
        Message {
            fields: fields.iter().map(|(n, f)| (SmolStr::new(n), f.clone())).collect(),
            ..Message::default()
        }
    }

    #[test]
    fn test_optional_marker_rules() {
        let options = EmitOptions::default();
        assert!(options.fields_optional("GetUserReq"));
        assert!(!options.fields_optional("GetUserRes"));

        let forced = EmitOptions { force_optional: true, ..EmitOptions::default() };
        assert!(forced.fields_optional("User"));

        let custom = EmitOptions { request_suffix: "Request".into(), ..EmitOptions::default() };
        assert!(custom.fields_optional("GetUserRequest"));
        assert!(!custom.fields_optional("GetUserReq"));
    }

    #[test]
    fn test_shapes() {
        let scalar = ResolvedMember {
            name: "a".into(),
            ty: "number".into(),
            comment: None,
            shape: Shape::Scalar,
        };
        let array = ResolvedMember { shape: Shape::Array, ..scalar.clone() };
        let map = ResolvedMember { shape: Shape::Map { key: "string".into() }, ..scalar.clone() };

        assert_eq!(scalar.rendered_type(), "number");
        assert_eq!(array.rendered_type(), "number[]");
        assert_eq!(map.rendered_type(), "{ [key: string]: number }");
    }

    #[test]
    fn test_message_preserves_field_order() {
        let mut nested = Nested::new();
        nested.insert(
            "User".into(),
            Decl::Message(message(&[
                ("name", Field::new("string")),
                ("age", Field::new("int32")),
                ("tags", Field::new("string").repeated()),
                ("scores", Field::new("double").map("int64")),
                ("active", Field::new("bool")),
            ])),
        );

        let out = render(&nested, &EmitOptions::default()).unwrap();
        assert_eq!(
            out,
            "export interface User {\n  name: string;\n  age: number;\n  tags: string[];\n  scores: { [key: string]: number };\n  active: boolean;\n}\n"
        );
    }

    #[test]
    fn test_nested_message_scope_and_namespace() {
        let mut inner = Nested::new();
        inner.insert("Item".into(), Decl::Message(message(&[("id", Field::new("string"))])));
        let mut nested = Nested::new();
        nested.insert(
            "Cart".into(),
            Decl::Message(Message {
                fields: [(SmolStr::new("items"), Field::new("Item").repeated())]
                    .into_iter()
                    .collect(),
                nested: inner,
                comment: None,
            }),
        );

        let out = render(&nested, &EmitOptions::default()).unwrap();
        assert_eq!(
            out,
            "export interface Cart {\n  items: Cart.Item[];\n}\n\nexport namespace Cart {\n  export interface Item {\n    id: string;\n  }\n}\n"
        );
    }

    #[test]
    fn test_namespace_decl_renders_only_block() {
        let mut inner = Nested::new();
        inner.insert("Empty".into(), Decl::Message(Message::default()));
        let mut nested = Nested::new();
        nested.insert("v1".into(), Decl::Namespace(Namespace { nested: inner }));

        let out = render(&nested, &EmitOptions::default()).unwrap();
        assert_eq!(out, "export namespace v1 {\n  export interface Empty {\n  }\n}\n");
    }

    #[test]
    fn test_service_resolves_in_file_scope() {
        let mut nested = Nested::new();
        nested.insert("PingReq".into(), Decl::Message(Message::default()));
        nested.insert("PingRes".into(), Decl::Message(Message::default()));
        nested.insert(
            "Health".into(),
            Decl::Service(Service {
                methods: [(SmolStr::new("Ping"), Method::new("PingReq", "PingRes"))]
                    .into_iter()
                    .collect(),
                ..Service::default()
            }),
        );

        let out = render(&nested, &EmitOptions::default()).unwrap();
        assert!(
            out.ends_with("export type Ping = (params: PingReq) => Promise<PingRes>;\n"),
            "{out}"
        );
    }

    #[test]
    fn test_enum_member_order() {
        let mut e = Enum::default();
        e.values.insert("OFF".into(), EnumValue { value: 0, comment: None });
        e.values.insert("ON".into(), EnumValue { value: 1, comment: Some("powered".into()) });
        let mut nested = Nested::new();
        nested.insert("Switch".into(), Decl::Enum(e));

        let out = render(&nested, &EmitOptions::default()).unwrap();
        assert_eq!(out, "export enum Switch {\n  OFF = 0,\n  ON = 1, // powered\n}\n");
    }

    #[test]
    fn test_unresolved_field_type() {
        let mut nested = Nested::new();
        nested.insert("A".into(), Decl::Message(message(&[("b", Field::new("Bogus"))])));

        let err = render(&nested, &EmitOptions::default()).unwrap_err();
        assert_eq!(err.token, "Bogus");
    }
}
