//! Declaration to schema type transformation.
//!
//! [`Transformer::transform`] resolves a declaration through the type map and
//! applies the optionality policy: a type is wrapped in non-null unless the
//! caller asked for an optional position or the declaration was itself
//! optional ("maybe").
//!
//! | caller optional | produced        | result            |
//! |-----------------|-----------------|-------------------|
//! | yes             | `Nullable(t)`   | `Nullable(t)`     |
//! | yes             | `Plain(t)`      | `Plain(t)`        |
//! | no              | `Nullable(t)`   | `Plain(t)`        |
//! | no              | `Plain(t)`      | `Plain(t!)`       |

use std::sync::Arc;

use tracing::trace;
use typegraph_core::{Declaration, Kind};

use super::registry::TypeRegistry;
use super::type_map::{TypeMap, TypeMapping};
use super::types::{
    ArgumentType, EnumValue, FieldType, NamedType, ObjectKind, SchemaType, Transformed,
};
use crate::error::SchemaError;

/// Walks declarations and produces schema types.
pub struct Transformer<'a> {
    type_map: &'a TypeMap,
    registry: &'a mut TypeRegistry,
}

impl<'a> Transformer<'a> {
    pub fn new(type_map: &'a TypeMap, registry: &'a mut TypeRegistry) -> Self {
        Self { type_map, registry }
    }

    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    /// Transforms a declaration, honoring the optionality policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the declaration (or anything it references) has no
    /// type-map entry, or if a named type cannot be built.
    pub fn transform(
        &mut self,
        decl: &Declaration,
        optional: bool,
    ) -> Result<Transformed, SchemaError> {
        let produced = self.resolve(decl)?;
        Ok(match (optional, produced) {
            (true, produced) => produced,
            (false, Transformed::Nullable(ty)) => Transformed::Plain(ty),
            (false, Transformed::Plain(ty)) => Transformed::Plain(SchemaType::non_null(ty)),
        })
    }

    fn resolve(&mut self, decl: &Declaration) -> Result<Transformed, SchemaError> {
        let mapping = self
            .type_map
            .lookup(decl)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownType {
                name: decl.name().map(str::to_owned),
                kind: decl.kind().tag(),
            })?;

        match mapping {
            TypeMapping::Scalar(scalar) => {
                self.registry.note_scalar(&scalar);
                Ok(Transformed::Plain(SchemaType::Scalar(scalar)))
            }
            TypeMapping::Builder(build) => build(self, decl),
        }
    }

    // ========================================================================
    // Kind builders
    // ========================================================================

    /// Lists are always nullable themselves; elements are required unless
    /// the element declaration is optional.
    pub fn build_list(&mut self, decl: &Declaration) -> Result<Transformed, SchemaError> {
        let Kind::List(element) = decl.kind() else {
            return Err(unexpected("list", decl));
        };
        let element = self.transform(element, false)?.into_type();
        Ok(Transformed::Plain(SchemaType::list(element)))
    }

    pub fn build_maybe(&mut self, decl: &Declaration) -> Result<Transformed, SchemaError> {
        let Kind::Maybe(inner) = decl.kind() else {
            return Err(unexpected("maybe", decl));
        };
        let inner = self.transform(inner, true)?.into_type();
        Ok(Transformed::Nullable(inner))
    }

    pub fn build_enum(&mut self, decl: &Declaration) -> Result<SchemaType, SchemaError> {
        if let Some(existing) = self.registry.get(decl) {
            return Ok(SchemaType::Named(existing));
        }
        let Kind::Enum(values) = decl.kind() else {
            return Err(unexpected("enum", decl));
        };
        let name = required_name(decl)?;
        let values = values
            .iter()
            .map(|(symbol, value)| EnumValue {
                symbol: symbol.clone(),
                value: value.clone(),
            })
            .collect();

        let ty = Arc::new(NamedType::enumeration(
            name,
            decl.type_description(),
            decl.clone(),
            values,
        ));
        self.registry.insert(decl, ty.clone())?;
        Ok(SchemaType::Named(ty))
    }

    /// Builds an object, input object or interface.
    ///
    /// The type is cached before its fields are transformed so that fields
    /// referring back to it resolve to the same instance.
    pub fn build_object(
        &mut self,
        decl: &Declaration,
        kind: ObjectKind,
    ) -> Result<SchemaType, SchemaError> {
        if let Some(existing) = self.registry.get(decl) {
            return Ok(SchemaType::Named(existing));
        }
        let Some(fields) = decl.kind().fields() else {
            return Err(unexpected("struct", decl));
        };
        let name = required_name(decl)?;

        let ty = Arc::new(NamedType::composite(
            name,
            decl.type_description(),
            kind,
            decl.clone(),
        ));
        self.registry.insert(decl, ty.clone())?;
        trace!(type_name = %name, ?kind, field_count = fields.len(), "Building object type");

        let interfaces = decl
            .interfaces()
            .iter()
            .map(|iface| self.transform(iface, true).map(Transformed::into_type))
            .collect::<Result<Vec<_>, _>>()?;

        let mut built = Vec::with_capacity(fields.len());
        for (field_name, field_decl) in fields {
            let field_ty = self.transform(field_decl, false)?.into_type();
            let args = match field_decl.args() {
                Some(args) => self.build_args(args)?,
                None => Vec::new(),
            };
            built.push(FieldType {
                name: field_name.clone(),
                ty: field_ty,
                description: field_decl.description().map(str::to_owned),
                default_value: field_decl.default_value().cloned(),
                args,
            });
        }

        ty.set_fields(interfaces, built)?;
        Ok(SchemaType::Named(ty))
    }

    fn build_args(
        &mut self,
        args: &typegraph_core::Fields,
    ) -> Result<Vec<ArgumentType>, SchemaError> {
        args.iter()
            .map(|(arg_name, arg_decl)| -> Result<ArgumentType, SchemaError> {
                Ok(ArgumentType {
                    name: arg_name.clone(),
                    ty: self.transform(arg_decl, false)?.into_type(),
                    description: arg_decl.description().map(str::to_owned),
                    default_value: arg_decl.default_value().cloned(),
                })
            })
            .collect()
    }

    /// Builds a union. Members are transformed in optional position, so they
    /// are referenced by bare name.
    pub fn build_union(&mut self, decl: &Declaration) -> Result<SchemaType, SchemaError> {
        if let Some(existing) = self.registry.get(decl) {
            return Ok(SchemaType::Named(existing));
        }
        let Kind::Union { members, .. } = decl.kind() else {
            return Err(unexpected("union", decl));
        };
        let name = required_name(decl)?;

        let ty = Arc::new(NamedType::union(name, decl.type_description(), decl.clone()));
        self.registry.insert(decl, ty.clone())?;

        let members = members
            .iter()
            .map(|member| self.transform(member, true).map(Transformed::into_type))
            .collect::<Result<Vec<_>, _>>()?;
        ty.set_members(members)?;
        Ok(SchemaType::Named(ty))
    }
}

fn required_name(decl: &Declaration) -> Result<&str, SchemaError> {
    decl.name().ok_or(SchemaError::MissingName {
        kind: decl.kind().tag(),
    })
}

fn unexpected(expected: &'static str, decl: &Declaration) -> SchemaError {
    SchemaError::UnexpectedKind {
        expected,
        found: decl.kind().tag(),
    }
}
