//! Schema-side type model produced by the transformer.
//!
//! These types sit between domain declarations and the async-graphql dynamic
//! schema. Named types are shared through `Arc` so that every reference to a
//! declaration resolves to the same instance, and their bodies are filled in
//! after the type is cached so that recursive declarations terminate.

use std::fmt;
use std::sync::{Arc, OnceLock};

use async_graphql::dynamic::TypeRef;
use serde_json::Value;
use typegraph_core::Declaration;

use crate::error::SchemaError;

/// A scalar known to the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
    /// Built-in GraphQL scalars are never registered explicitly.
    pub builtin: bool,
}

impl ScalarType {
    #[must_use]
    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            builtin: true,
        }
    }

    #[must_use]
    pub fn custom(name: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            name: name.into(),
            description: description.map(str::to_owned),
            builtin: false,
        }
    }
}

/// A GraphQL type reference.
#[derive(Clone)]
pub enum SchemaType {
    Scalar(ScalarType),
    Named(Arc<NamedType>),
    List(Box<SchemaType>),
    NonNull(Box<SchemaType>),
}

impl SchemaType {
    #[must_use]
    pub fn non_null(inner: SchemaType) -> Self {
        match inner {
            already @ SchemaType::NonNull(_) => already,
            other => SchemaType::NonNull(Box::new(other)),
        }
    }

    #[must_use]
    pub fn list(inner: SchemaType) -> Self {
        SchemaType::List(Box::new(inner))
    }

    /// Name of the innermost named type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            SchemaType::Scalar(scalar) => &scalar.name,
            SchemaType::Named(named) => named.name(),
            SchemaType::List(inner) | SchemaType::NonNull(inner) => inner.type_name(),
        }
    }

    #[must_use]
    pub fn is_non_null(&self) -> bool {
        matches!(self, SchemaType::NonNull(_))
    }

    #[must_use]
    pub fn as_named(&self) -> Option<&Arc<NamedType>> {
        match self {
            SchemaType::Named(named) => Some(named),
            _ => None,
        }
    }

    /// Strips list and non-null wrappers.
    #[must_use]
    pub fn innermost(&self) -> &SchemaType {
        match self {
            SchemaType::List(inner) | SchemaType::NonNull(inner) => inner.innermost(),
            other => other,
        }
    }

    #[must_use]
    pub fn to_type_ref(&self) -> TypeRef {
        match self {
            SchemaType::Scalar(scalar) => TypeRef::named(scalar.name.clone()),
            SchemaType::Named(named) => TypeRef::named(named.name()),
            SchemaType::List(inner) => TypeRef::List(Box::new(inner.to_type_ref())),
            SchemaType::NonNull(inner) => TypeRef::NonNull(Box::new(inner.to_type_ref())),
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaType::Scalar(scalar) => f.write_str(&scalar.name),
            SchemaType::Named(named) => f.write_str(named.name()),
            SchemaType::List(inner) => write!(f, "[{inner}]"),
            SchemaType::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl fmt::Debug for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaType({self})")
    }
}

/// Result of transforming one declaration.
///
/// `Nullable` marks a type produced from an optional declaration; the
/// transformer consults it to decide whether a non-null wrapper is needed.
#[derive(Debug, Clone)]
pub enum Transformed {
    Plain(SchemaType),
    Nullable(SchemaType),
}

impl Transformed {
    #[must_use]
    pub fn into_type(self) -> SchemaType {
        match self {
            Transformed::Plain(ty) | Transformed::Nullable(ty) => ty,
        }
    }

    #[must_use]
    pub fn as_type(&self) -> &SchemaType {
        match self {
            Transformed::Plain(ty) | Transformed::Nullable(ty) => ty,
        }
    }
}

/// Which flavor of composite type a struct or interface becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Object,
    InputObject,
    Interface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKind {
    Object,
    InputObject,
    Interface,
    Union,
    Enum,
}

impl From<ObjectKind> for NamedKind {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Object => NamedKind::Object,
            ObjectKind::InputObject => NamedKind::InputObject,
            ObjectKind::Interface => NamedKind::Interface,
        }
    }
}

/// An argument of an object or interface field.
#[derive(Clone)]
pub struct ArgumentType {
    pub name: String,
    pub ty: SchemaType,
    pub description: Option<String>,
    pub default_value: Option<Value>,
}

/// A field of an object, input object or interface.
#[derive(Clone)]
pub struct FieldType {
    pub name: String,
    pub ty: SchemaType,
    pub description: Option<String>,
    /// Only meaningful on input object fields.
    pub default_value: Option<Value>,
    pub args: Vec<ArgumentType>,
}

/// One enum value: the GraphQL symbol and the domain value behind it.
#[derive(Debug, Clone)]
pub struct EnumValue {
    pub symbol: String,
    pub value: Value,
}

#[derive(Default)]
struct Body {
    interfaces: OnceLock<Vec<SchemaType>>,
    fields: OnceLock<Vec<FieldType>>,
    members: OnceLock<Vec<SchemaType>>,
}

/// A named GraphQL type built from a declaration.
pub struct NamedType {
    name: String,
    description: Option<String>,
    kind: NamedKind,
    declaration: Declaration,
    values: Vec<EnumValue>,
    body: Body,
}

impl NamedType {
    /// A composite type whose fields are supplied later.
    pub(crate) fn composite(
        name: impl Into<String>,
        description: Option<&str>,
        kind: ObjectKind,
        declaration: Declaration,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.map(str::to_owned),
            kind: kind.into(),
            declaration,
            values: Vec::new(),
            body: Body::default(),
        }
    }

    /// A union whose members are supplied later.
    pub(crate) fn union(
        name: impl Into<String>,
        description: Option<&str>,
        declaration: Declaration,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.map(str::to_owned),
            kind: NamedKind::Union,
            declaration,
            values: Vec::new(),
            body: Body::default(),
        }
    }

    pub(crate) fn enumeration(
        name: impl Into<String>,
        description: Option<&str>,
        declaration: Declaration,
        values: Vec<EnumValue>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.map(str::to_owned),
            kind: NamedKind::Enum,
            declaration,
            values,
            body: Body::default(),
        }
    }

    pub(crate) fn set_fields(
        &self,
        interfaces: Vec<SchemaType>,
        fields: Vec<FieldType>,
    ) -> Result<(), SchemaError> {
        let set_twice = || SchemaError::Internal(format!("fields of `{}` set twice", self.name));
        self.body.interfaces.set(interfaces).map_err(|_| set_twice())?;
        self.body.fields.set(fields).map_err(|_| set_twice())
    }

    pub(crate) fn set_members(&self, members: Vec<SchemaType>) -> Result<(), SchemaError> {
        self.body
            .members
            .set(members)
            .map_err(|_| SchemaError::Internal(format!("members of `{}` set twice", self.name)))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> NamedKind {
        self.kind
    }

    /// The declaration this type was built from.
    #[must_use]
    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldType] {
        self.body.fields.get().map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldType> {
        self.fields().iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn interfaces(&self) -> &[SchemaType] {
        self.body.interfaces.get().map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn members(&self) -> &[SchemaType] {
        self.body.members.get().map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    /// Symbol for a domain value of this enum.
    #[must_use]
    pub fn symbol_for(&self, value: &Value) -> Option<&str> {
        self.values
            .iter()
            .find(|v| &v.value == value)
            .map(|v| v.symbol.as_str())
    }

    /// Domain value behind an enum symbol.
    #[must_use]
    pub fn value_for(&self, symbol: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|v| v.symbol == symbol)
            .map(|v| &v.value)
    }
}

impl fmt::Debug for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedType")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("fields", &self.fields().iter().map(|f| &f.name).collect::<Vec<_>>())
            .finish()
    }
}
