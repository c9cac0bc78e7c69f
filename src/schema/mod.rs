//! Declaration tree handed from the parser to the generator.
//!
//! The tree mirrors the nested JSON shape protobuf tooling produces for a
//! parsed file: an ordered map from declared name to declaration, where
//! messages, services and namespaces may carry further nested declarations.
//! Declaration order is preserved everywhere because it is output order.

use indexmap::IndexMap;
use smol_str::SmolStr;

/// Ordered map of declarations at one nesting level.
pub type Nested = IndexMap<SmolStr, Decl>;

/// Options passed to the parsing collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep field names as written instead of camel-casing them.
    pub keep_case: bool,
}

/// One parsed interface-definition file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedFile {
    /// Declared package, if any (`foo.bar`).
    pub package: Option<SmolStr>,
    /// Imported file identifiers in declaration order.
    pub imports: Vec<SmolStr>,
    /// Top-level declarations. When a package is declared they are wrapped
    /// in one [`Decl::Namespace`] per package segment.
    pub nested: Nested,
}

impl ParsedFile {
    /// Declarations with the package namespace chain removed.
    ///
    /// Returns the tree unchanged when it is not wrapped in exactly the
    /// declared package.
    pub fn unwrapped_nested(&self) -> &Nested {
        let Some(package) = &self.package else {
            return &self.nested;
        };
        let mut current = &self.nested;
        for segment in package.split('.') {
            match current.get(segment) {
                Some(Decl::Namespace(ns)) if current.len() == 1 => current = &ns.nested,
                _ => return &self.nested,
            }
        }
        current
    }
}

/// A declaration inside a [`Nested`] map.
#[derive(Clone, Debug, PartialEq)]
pub enum Decl {
    Message(Message),
    Enum(Enum),
    Service(Service),
    Namespace(Namespace),
}

impl Decl {
    /// Nested declarations that open a child scope, if any.
    ///
    /// Enums and services never do: enum values are not referenceable types
    /// and services hold only methods.
    pub fn nested(&self) -> Option<&Nested> {
        let nested = match self {
            Decl::Message(m) => &m.nested,
            Decl::Namespace(ns) => &ns.nested,
            Decl::Enum(_) | Decl::Service(_) => return None,
        };
        (!nested.is_empty()).then_some(nested)
    }
}

/// A `message` declaration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Message {
    pub comment: Option<String>,
    pub fields: IndexMap<SmolStr, Field>,
    pub nested: Nested,
}

/// Cardinality of a message field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldRule {
    #[default]
    Singular,
    Optional,
    Repeated,
}

/// A message field. Map fields carry a `key_type`.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub type_name: SmolStr,
    pub rule: FieldRule,
    pub key_type: Option<SmolStr>,
    pub comment: Option<String>,
}

impl Field {
    pub fn new(type_name: impl Into<SmolStr>) -> Self {
        Self {
            type_name: type_name.into(),
            rule: FieldRule::Singular,
            key_type: None,
            comment: None,
        }
    }

    pub fn repeated(mut self) -> Self {
        self.rule = FieldRule::Repeated;
        self
    }

    pub fn map(mut self, key_type: impl Into<SmolStr>) -> Self {
        self.key_type = Some(key_type.into());
        self
    }
}

/// An `enum` declaration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Enum {
    pub comment: Option<String>,
    pub values: IndexMap<SmolStr, EnumValue>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumValue {
    pub value: i64,
    pub comment: Option<String>,
}

/// A `service` declaration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Service {
    pub comment: Option<String>,
    pub methods: IndexMap<SmolStr, Method>,
}

/// An `rpc` inside a service.
#[derive(Clone, Debug, PartialEq)]
pub struct Method {
    pub request_type: SmolStr,
    pub response_type: SmolStr,
    pub request_stream: bool,
    pub response_stream: bool,
    pub comment: Option<String>,
}

impl Method {
    pub fn new(request_type: impl Into<SmolStr>, response_type: impl Into<SmolStr>) -> Self {
        Self {
            request_type: request_type.into(),
            response_type: response_type.into(),
            request_stream: false,
            response_stream: false,
            comment: None,
        }
    }
}

/// A namespace holding only nested declarations (package segments).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Namespace {
    pub nested: Nested,
}
