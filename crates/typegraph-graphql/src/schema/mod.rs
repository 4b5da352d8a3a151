//! Schema construction.
//!
//! ## Components
//!
//! - [`TypeMap`] - Maps declaration names and kinds to schema types
//! - [`Transformer`] - Turns declarations into schema types
//! - [`TypeRegistry`] - One schema type per declaration identity
//! - [`SchemaAssembler`] - Collects roots, resolvers and rules into a schema
//!
//! ## Build order
//!
//! 1. Root field maps are wrapped into synthetic root declarations
//! 2. The transformer walks everything reachable from the roots, caching each
//!    named type before building its fields so cycles terminate
//! 3. The binder registers the cached types with async-graphql and attaches
//!    resolvers and permission rules

pub(crate) mod binder;
mod builder;
mod printer;
pub mod registry;
pub mod transform;
pub mod type_map;
pub mod types;

pub use builder::{
    MUTATION_TYPE, PLACEHOLDER_FIELD, QUERY_TYPE, SUBSCRIPTION_TYPE, SchemaAssembler,
};
pub use registry::TypeRegistry;
pub use transform::Transformer;
pub use type_map::{BuildFn, TypeMap, TypeMapping};
pub use types::{
    ArgumentType, EnumValue, FieldType, NamedKind, NamedType, ObjectKind, ScalarType, SchemaType,
    Transformed,
};
