//! Domain type declarations for typegraph.
//!
//! This crate holds the vocabulary applications use to describe their data:
//! scalars, enums, lists, optional values, structs, interfaces and unions,
//! plus the builders that attach GraphQL-facing metadata (type names,
//! descriptions, arguments, defaults, published payloads).
//!
//! The `typegraph-graphql` crate turns these declarations into an executable
//! GraphQL schema.

pub mod builders;
pub mod declaration;
pub mod metadata;

pub use declaration::{DeclId, Declaration, Dispatch, Fields, Kind};
pub use metadata::Metadata;
