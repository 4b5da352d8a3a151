//! # typegraph-graphql
//!
//! Executable GraphQL schemas from typegraph declarations.
//!
//! Domain types are declared once with [`typegraph_core`]; this crate derives
//! from them:
//!
//! - a query, mutation and subscription schema built on async-graphql's
//!   dynamic schema API
//! - the schema's SDL text
//! - an [`Executor`] running requests with resolvers and permission rules
//!   attached field by field
//!
//! ## Example
//!
//! ```ignore
//! use typegraph_core::builders::*;
//! use typegraph_graphql::{Resolver, SchemaAssembler};
//!
//! let mut assembler = SchemaAssembler::new();
//! assembler
//!     .add_queries([("greeting", string())])
//!     .add_resolvers([("Query", [("greeting", Resolver::value(json!("hello")))])]);
//!
//! let executor = assembler.compile()?;
//! let response = executor.execute("{ greeting }", json!(null), json!({}), None).await;
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! event_buffer_size = 1024
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`schema`] - Type map, transformer and schema assembly
//! - [`resolvers`] - Resolvers, permission rules and their tables
//! - [`subscriptions`] - Event bus behind subscription fields
//! - [`context`] - Per-request execution context
//! - [`error`] - Error types for schema construction

pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod resolvers;
pub mod schema;
pub mod subscriptions;

// Re-export main types
pub use config::SchemaConfig;
pub use context::{ExecutionContext, ExecutionContextBuilder};
pub use error::SchemaError;
pub use executor::Executor;
pub use resolvers::access::{PERMISSION_DENIED, permission_denied};
pub use resolvers::{
    AccessDecision, EventStream, Permission, ResolveParams, ResolveResult, Resolver, Rule, Table,
    allow, deep_merge, deny, rule,
};
pub use schema::{SchemaAssembler, SchemaType, TypeMap, TypeMapping};
pub use subscriptions::PubSub;

/// Result type for schema construction.
pub type Result<T> = std::result::Result<T, SchemaError>;
