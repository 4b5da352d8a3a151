//! Mapping from declaration names and kinds to schema types.
//!
//! The transformer consults the map twice per declaration: first under the
//! declaration's display name, then under its kind tag. Entries are either a
//! fixed scalar or a builder that produces a schema type from the declaration.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_graphql::dynamic::TypeRef;
use typegraph_core::Declaration;

use super::transform::Transformer;
use super::types::{ObjectKind, ScalarType, Transformed};
use crate::error::SchemaError;

/// Builds a schema type for a declaration.
pub type BuildFn =
    Arc<dyn Fn(&mut Transformer<'_>, &Declaration) -> Result<Transformed, SchemaError> + Send + Sync>;

/// One type-map entry.
#[derive(Clone)]
pub enum TypeMapping {
    Scalar(ScalarType),
    Builder(BuildFn),
}

impl fmt::Debug for TypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeMapping::Scalar(scalar) => write!(f, "Scalar({})", scalar.name),
            TypeMapping::Builder(_) => f.write_str("Builder"),
        }
    }
}

/// Name- and kind-keyed lookup table used by the transformer.
#[derive(Debug, Clone)]
pub struct TypeMap {
    entries: HashMap<String, TypeMapping>,
}

impl Default for TypeMap {
    fn default() -> Self {
        let mut map = Self::empty();

        // Domain scalar names
        map.insert("Boolean", TypeMapping::Scalar(ScalarType::builtin(TypeRef::BOOLEAN)));
        map.insert("ID", TypeMapping::Scalar(ScalarType::builtin(TypeRef::ID)));
        map.insert("Integer", TypeMapping::Scalar(ScalarType::builtin(TypeRef::INT)));
        map.insert("Number", TypeMapping::Scalar(ScalarType::builtin(TypeRef::FLOAT)));
        map.insert("String", TypeMapping::Scalar(ScalarType::builtin(TypeRef::STRING)));
        map.insert(
            "Date",
            TypeMapping::Scalar(ScalarType::custom("Date", Some("Calendar date in ISO-8601 format"))),
        );

        // Kind builders
        map.insert_builder("enum", |t, decl| t.build_enum(decl).map(Transformed::Plain));
        map.insert_builder("list", |t, decl| t.build_list(decl));
        map.insert_builder("maybe", |t, decl| t.build_maybe(decl));
        map.insert_builder("struct", |t, decl| {
            let kind = if decl.is_input() {
                ObjectKind::InputObject
            } else {
                ObjectKind::Object
            };
            t.build_object(decl, kind).map(Transformed::Plain)
        });
        map.insert_builder("interface", |t, decl| {
            t.build_object(decl, ObjectKind::Interface)
                .map(Transformed::Plain)
        });
        map.insert_builder("union", |t, decl| t.build_union(decl).map(Transformed::Plain));

        map
    }
}

impl TypeMap {
    /// A map with no entries at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, key: impl Into<String>, mapping: TypeMapping) -> &mut Self {
        self.entries.insert(key.into(), mapping);
        self
    }

    pub fn insert_builder<F>(&mut self, key: impl Into<String>, build: F) -> &mut Self
    where
        F: Fn(&mut Transformer<'_>, &Declaration) -> Result<Transformed, SchemaError>
            + Send
            + Sync
            + 'static,
    {
        self.insert(key, TypeMapping::Builder(Arc::new(build)))
    }

    /// Maps a domain scalar name onto a custom GraphQL scalar of the same name.
    pub fn register_scalar(&mut self, name: &str, description: Option<&str>) -> &mut Self {
        self.insert(name, TypeMapping::Scalar(ScalarType::custom(name, description)))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TypeMapping> {
        self.entries.get(key)
    }

    /// Entry for a declaration: display name first, then kind tag.
    #[must_use]
    pub fn lookup(&self, decl: &Declaration) -> Option<&TypeMapping> {
        decl.name()
            .and_then(|name| self.get(name))
            .or_else(|| self.get(decl.kind().tag()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
