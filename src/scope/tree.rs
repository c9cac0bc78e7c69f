//! Arena storage for the scope tree.

use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

/// Handle of a scope inside a [`ScopeTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// What a bare name exports to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Export {
    /// One qualified name.
    Single(SmolStr),
    /// Several files export the same bare name, in registration order.
    Ambiguous(Vec<SmolStr>),
}

impl Export {
    /// Add another qualified name, promoting a single export to a list.
    pub fn push(&mut self, qualified: SmolStr) {
        match self {
            Export::Single(existing) => {
                let first = std::mem::take(existing);
                *self = Export::Ambiguous(vec![first, qualified]);
            }
            Export::Ambiguous(list) => list.push(qualified),
        }
    }

    /// All qualified names this export can stand for.
    pub fn candidates(&self) -> &[SmolStr] {
        match self {
            Export::Single(name) => std::slice::from_ref(name),
            Export::Ambiguous(list) => list,
        }
    }
}

/// One node of the scope tree.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    /// Enclosing scope, used only for upward lookup.
    parent: Option<ScopeId>,
    /// Child scopes keyed by the declaration that opens them.
    children: IndexMap<SmolStr, ScopeId>,
    /// Bare name → qualified name(s) visible in this scope.
    exports: IndexMap<SmolStr, Export>,
}

impl Scope {
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn child(&self, name: &str) -> Option<ScopeId> {
        self.children.get(name).copied()
    }

    pub fn children(&self) -> impl Iterator<Item = (&SmolStr, ScopeId)> {
        self.children.iter().map(|(name, &id)| (name, id))
    }

    pub fn export(&self, name: &str) -> Option<&Export> {
        self.exports.get(name)
    }

    pub fn exports(&self) -> impl Iterator<Item = (&SmolStr, &Export)> {
        self.exports.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.exports.is_empty()
    }
}

/// All scopes of one compilation run. Index 0 is the shared root.
///
/// Scopes own their children through the `children` maps; `parent` links are
/// plain indices and never keep anything alive.
#[derive(Clone, Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self { scopes: vec![Scope::default()] }
    }

    /// The shared cross-file root scope.
    #[inline]
    pub const fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Allocate a detached, empty scope.
    pub fn alloc(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::default());
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    /// Attach `child` under `parent` as `name` and point its parent link back.
    ///
    /// Returns the scope previously attached under that name, if any. The
    /// displaced scope keeps its own parent link.
    pub fn attach(&mut self, parent: ScopeId, name: SmolStr, child: ScopeId) -> Option<ScopeId> {
        self.get_mut(child).parent = Some(parent);
        self.get_mut(parent).children.insert(name, child)
    }

    /// Set `name` to a single qualified name, replacing any previous export.
    pub fn set_export(&mut self, scope: ScopeId, name: SmolStr, qualified: SmolStr) {
        self.get_mut(scope).exports.insert(name, Export::Single(qualified));
    }

    /// Export `name`, accumulating collisions in registration order.
    pub fn add_export(&mut self, scope: ScopeId, name: SmolStr, qualified: SmolStr) {
        let exports = &mut self.get_mut(scope).exports;
        match exports.get_mut(&name) {
            Some(existing) => existing.push(qualified),
            None => {
                exports.insert(name, Export::Single(qualified));
            }
        }
    }

    /// `id` followed by each enclosing scope up to its root.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(id), |&current| self.get(current).parent)
    }

    /// Number of scopes, the root included.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
