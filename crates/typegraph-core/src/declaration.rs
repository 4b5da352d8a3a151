//! Domain type declarations.
//!
//! A [`Declaration`] is a cheap, clonable handle describing the shape of a
//! value: a scalar, an enum, a list, an optional ("maybe") value, a struct of
//! named fields, an interface or a union. Declarations may be wrapped in
//! annotation layers carrying schema metadata, and may be lazy so that
//! self-referential type graphs can be written down.
//!
//! Identity matters: two handles denote the same declaration exactly when
//! their [`Declaration::identity`] values are equal. Annotation and lazy
//! layers forward identity to the structural node they wrap.

use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde_json::Value;

use crate::metadata::Metadata;

/// Picks the concrete member declaration for a runtime value.
pub type Dispatch = Arc<dyn Fn(&Value) -> Option<Declaration> + Send + Sync>;

/// Ordered field declarations of a struct or interface.
pub type Fields = IndexMap<String, Declaration>;

/// Stable identity of a structural declaration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

/// Structural kind of a declaration.
pub enum Kind {
    /// A named scalar such as `String` or `Integer`.
    Scalar(String),
    /// Symbol to underlying value, in declaration order.
    Enum(IndexMap<String, Value>),
    List(Declaration),
    /// The wrapped value may be absent.
    Maybe(Declaration),
    Struct(Fields),
    Interface {
        fields: Fields,
        dispatch: Option<Dispatch>,
    },
    Union {
        members: Vec<Declaration>,
        dispatch: Dispatch,
    },
}

impl Kind {
    /// Kind name used as the fallback type-map key.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Kind::Scalar(_) => "scalar",
            Kind::Enum(_) => "enum",
            Kind::List(_) => "list",
            Kind::Maybe(_) => "maybe",
            Kind::Struct(_) => "struct",
            Kind::Interface { .. } => "interface",
            Kind::Union { .. } => "union",
        }
    }

    /// Returns the declared fields of a struct or interface.
    #[must_use]
    pub fn fields(&self) -> Option<&Fields> {
        match self {
            Kind::Struct(fields) | Kind::Interface { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

pub(crate) enum Node {
    Structural(Kind),
    Annotated { base: Declaration, meta: Metadata },
    Lazy(LazyNode),
}

pub(crate) struct LazyNode {
    target: OnceLock<Declaration>,
    init: Box<dyn Fn() -> Declaration + Send + Sync>,
}

impl LazyNode {
    fn get(&self) -> &Declaration {
        self.target.get_or_init(|| (self.init)())
    }
}

/// Handle to a domain type declaration.
#[derive(Clone)]
pub struct Declaration(pub(crate) Arc<Node>);

impl Declaration {
    fn structural(kind: Kind) -> Self {
        Self(Arc::new(Node::Structural(kind)))
    }

    /// A scalar with the given name.
    #[must_use]
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::structural(Kind::Scalar(name.into()))
    }

    /// An unnamed enum over `(symbol, underlying value)` pairs.
    pub fn enumeration<K>(values: impl IntoIterator<Item = (K, Value)>) -> Self
    where
        K: Into<String>,
    {
        Self::structural(Kind::Enum(
            values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    #[must_use]
    pub fn list(element: Declaration) -> Self {
        Self::structural(Kind::List(element))
    }

    #[must_use]
    pub fn maybe(inner: Declaration) -> Self {
        Self::structural(Kind::Maybe(inner))
    }

    /// An unnamed struct with fields in the given order.
    pub fn record<K>(fields: impl IntoIterator<Item = (K, Declaration)>) -> Self
    where
        K: Into<String>,
    {
        Self::structural(Kind::Struct(collect_fields(fields)))
    }

    /// An unnamed interface. Without `dispatch`, concrete types are picked by
    /// the runtime value's `__typename` property.
    pub fn interface<K>(
        fields: impl IntoIterator<Item = (K, Declaration)>,
        dispatch: Option<Dispatch>,
    ) -> Self
    where
        K: Into<String>,
    {
        Self::structural(Kind::Interface {
            fields: collect_fields(fields),
            dispatch,
        })
    }

    /// An unnamed union whose members are picked by `dispatch`.
    pub fn union<F>(members: impl IntoIterator<Item = Declaration>, dispatch: F) -> Self
    where
        F: Fn(&Value) -> Option<Declaration> + Send + Sync + 'static,
    {
        Self::structural(Kind::Union {
            members: members.into_iter().collect(),
            dispatch: Arc::new(dispatch),
        })
    }

    /// A declaration produced on first use. Allows a type to refer to itself.
    pub fn lazy<F>(init: F) -> Self
    where
        F: Fn() -> Declaration + Send + Sync + 'static,
    {
        Self(Arc::new(Node::Lazy(LazyNode {
            target: OnceLock::new(),
            init: Box::new(init),
        })))
    }

    /// Wraps this declaration in an annotation layer.
    ///
    /// Structural inspection and identity keep pointing at the wrapped
    /// declaration; metadata present on `meta` shadows inner metadata.
    #[must_use]
    pub fn annotate(&self, meta: Metadata) -> Self {
        Self(Arc::new(Node::Annotated {
            base: self.clone(),
            meta,
        }))
    }

    /// Follows annotation and lazy layers down to the structural handle.
    #[must_use]
    pub fn resolved(&self) -> &Declaration {
        match &*self.0 {
            Node::Structural(_) => self,
            Node::Annotated { base, .. } => base.resolved(),
            Node::Lazy(lazy) => lazy.get().resolved(),
        }
    }

    #[must_use]
    pub fn identity(&self) -> DeclId {
        DeclId(Arc::as_ptr(&self.resolved().0) as *const () as usize)
    }

    /// True when both handles denote the same declaration.
    #[must_use]
    pub fn same_as(&self, other: &Declaration) -> bool {
        self.identity() == other.identity()
    }

    #[must_use]
    pub fn kind(&self) -> &Kind {
        match &*self.resolved().0 {
            Node::Structural(kind) => kind,
            // resolved() only ever stops at a structural node
            Node::Annotated { base, .. } => base.kind(),
            Node::Lazy(lazy) => lazy.get().kind(),
        }
    }

    /// Finds the nearest metadata layer for which `pick` yields a value.
    pub(crate) fn lookup<'a, T: ?Sized>(
        &'a self,
        pick: impl Fn(&'a Metadata) -> Option<&'a T> + Copy,
    ) -> Option<&'a T> {
        match &*self.0 {
            Node::Structural(_) => None,
            Node::Annotated { base, meta } => pick(meta).or_else(|| base.lookup(pick)),
            Node::Lazy(lazy) => lazy.get().lookup(pick),
        }
    }
}

impl fmt::Debug for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declaration")
            .field("kind", &self.kind().tag())
            .field("name", &self.name())
            .finish()
    }
}

fn collect_fields<K: Into<String>>(fields: impl IntoIterator<Item = (K, Declaration)>) -> Fields {
    fields.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
