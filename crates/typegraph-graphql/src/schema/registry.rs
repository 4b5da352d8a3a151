//! Memoization of named schema types.
//!
//! The registry remembers which declaration produced which named type, so a
//! declaration reached through several paths (a field type, a union member,
//! its own recursive fields) always yields the same [`NamedType`] instance.
//! Entries are inserted before a type's fields are built; a recursive lookup
//! finds the partially-built type and stops there.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;
use typegraph_core::{DeclId, Declaration};

use super::types::{NamedType, ScalarType};
use crate::error::SchemaError;

/// Named types built so far, keyed by declaration identity.
#[derive(Default)]
pub struct TypeRegistry {
    /// Types in the order they were first reached.
    types: IndexMap<DeclId, Arc<NamedType>>,
    /// GraphQL name to the identity that claimed it.
    names: HashMap<String, DeclId>,
    /// Custom scalars referenced by built types.
    scalars: IndexMap<String, ScalarType>,
}

impl TypeRegistry {
    /// Creates a new empty type registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the type previously built for this declaration.
    #[must_use]
    pub fn get(&self, decl: &Declaration) -> Option<Arc<NamedType>> {
        self.types.get(&decl.identity()).cloned()
    }

    #[must_use]
    pub fn contains(&self, decl: &Declaration) -> bool {
        self.types.contains_key(&decl.identity())
    }

    /// Caches a freshly created type.
    ///
    /// # Errors
    ///
    /// Fails if another declaration already claimed the same GraphQL name.
    pub fn insert(&mut self, decl: &Declaration, ty: Arc<NamedType>) -> Result<(), SchemaError> {
        let id = decl.identity();
        match self.names.get(ty.name()) {
            Some(existing) if *existing != id => {
                return Err(SchemaError::DuplicateTypeName(ty.name().to_owned()));
            }
            _ => {}
        }
        trace!(type_name = %ty.name(), kind = ?ty.kind(), "Registering named type");
        self.names.insert(ty.name().to_owned(), id);
        self.types.insert(id, ty);
        Ok(())
    }

    /// Records a custom scalar so the assembler can register it.
    pub fn note_scalar(&mut self, scalar: &ScalarType) {
        if !scalar.builtin && !self.scalars.contains_key(&scalar.name) {
            self.scalars.insert(scalar.name.clone(), scalar.clone());
        }
    }

    /// All named types, in first-reached order.
    pub fn types(&self) -> impl Iterator<Item = &Arc<NamedType>> {
        self.types.values()
    }

    /// Looks a built type up by its GraphQL name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Arc<NamedType>> {
        self.names.get(name).and_then(|id| self.types.get(id))
    }

    pub fn scalars(&self) -> impl Iterator<Item = &ScalarType> {
        self.scalars.values()
    }

    /// Returns the number of built types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::ObjectKind;
    use typegraph_core::builders::{object, string};

    fn named(decl: &Declaration) -> Arc<NamedType> {
        Arc::new(NamedType::composite(
            decl.name().unwrap(),
            None,
            ObjectKind::Object,
            decl.clone(),
        ))
    }

    #[test]
    fn test_insert_and_get() {
        let mut registry = TypeRegistry::new();
        let user = object("User", None, [("name", string())]);
        let ty = named(&user);

        registry.insert(&user, ty.clone()).unwrap();
        assert!(Arc::ptr_eq(&registry.get(&user).unwrap(), &ty));
        assert!(registry.contains(&user.with_description("annotated handle")));
        assert_eq!(registry.len(), 1);
        assert!(registry.by_name("User").is_some());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = TypeRegistry::new();
        let first = object("User", None, [("name", string())]);
        let second = object("User", None, [("email", string())]);

        registry.insert(&first, named(&first)).unwrap();
        let err = registry.insert(&second, named(&second)).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTypeName(name) if name == "User"));
    }

    #[test]
    fn test_scalars_deduplicated() {
        let mut registry = TypeRegistry::new();
        let date = ScalarType::custom("Date", None);
        registry.note_scalar(&date);
        registry.note_scalar(&date);
        registry.note_scalar(&ScalarType::builtin("Int"));
        assert_eq!(registry.scalars().count(), 1);
    }
}
