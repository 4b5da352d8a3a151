//! Schema assembly.
//!
//! [`SchemaAssembler`] collects root fields, resolvers and permission rules,
//! then turns them into an async-graphql dynamic schema:
//!
//! 1. Root field maps become synthetic `Query`, `Mutation` and `Subscription`
//!    struct declarations; empty mutation and subscription maps are omitted.
//! 2. Every declaration reachable from the roots is transformed into schema
//!    types through the type map.
//! 3. The types are registered with the engine, binding resolvers and
//!    permission rules field by field.
//! 4. Limits from [`SchemaConfig`] are applied and the optional adaptation
//!    callback gets the last word before the schema is finished.

use std::collections::HashSet;

use async_graphql::dynamic::{Schema, SchemaBuilder};
use tracing::{debug, trace};
use typegraph_core::builders::{maybe, string};
use typegraph_core::{Declaration, Fields, Metadata};

use super::binder::Binder;
use super::printer::order_definitions;
use super::registry::TypeRegistry;
use super::transform::Transformer;
use super::type_map::TypeMap;
use crate::config::SchemaConfig;
use crate::error::SchemaError;
use crate::executor::Executor;
use crate::resolvers::{Permission, Resolver, Table, deep_merge};
use crate::subscriptions::PubSub;

pub const QUERY_TYPE: &str = "Query";
pub const MUTATION_TYPE: &str = "Mutation";
pub const SUBSCRIPTION_TYPE: &str = "Subscription";

/// Field emitted on `Query` when no queries are registered.
pub const PLACEHOLDER_FIELD: &str = "_placeholder";

/// Collects declarations, resolvers and rules and builds schemas from them.
///
/// # Example
///
/// ```ignore
/// let mut assembler = SchemaAssembler::new();
/// assembler
///     .add_queries([("hello", func([("name", string())], string(), None, None))])
///     .add_resolvers([("Query", [("hello", Resolver::sync(|p| {
///         Ok(json!(format!("Hello, {}", p.arg("name").and_then(Value::as_str).unwrap_or("?"))))
///     }))])]);
///
/// let executor = assembler.compile()?;
/// let response = executor.execute(r#"{ hello(name: "Ada") }"#, json!(null), json!({}), None).await;
/// ```
pub struct SchemaAssembler {
    config: SchemaConfig,
    type_map: TypeMap,
    queries: Fields,
    mutations: Fields,
    subscriptions: Fields,
    /// Subscription fields derived from a mutation's publish type.
    derived: HashSet<String>,
    resolvers: Table<Resolver>,
    permissions: Table<Permission>,
    pubsub: PubSub,
}

impl Default for SchemaAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaAssembler {
    /// Creates an assembler with the default configuration and type map.
    #[must_use]
    pub fn new() -> Self {
        let config = SchemaConfig::default();
        let pubsub = PubSub::new(config.event_buffer_size);
        Self {
            config,
            type_map: TypeMap::default(),
            queries: Fields::new(),
            mutations: Fields::new(),
            subscriptions: Fields::new(),
            derived: HashSet::new(),
            resolvers: Table::new(),
            permissions: Table::new(),
            pubsub,
        }
    }

    /// Creates an assembler with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn with_config(config: SchemaConfig) -> Result<Self, SchemaError> {
        config.validate().map_err(SchemaError::InvalidConfig)?;
        Ok(Self {
            pubsub: PubSub::new(config.event_buffer_size),
            config,
            ..Self::new()
        })
    }

    #[must_use]
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    #[must_use]
    pub fn type_map(&self) -> &TypeMap {
        &self.type_map
    }

    /// Mutable access to the type map, for custom scalars and builders.
    pub fn type_map_mut(&mut self) -> &mut TypeMap {
        &mut self.type_map
    }

    /// Maps a domain scalar name onto a custom GraphQL scalar.
    pub fn register_scalar(&mut self, name: &str, description: Option<&str>) -> &mut Self {
        self.type_map.register_scalar(name, description);
        self
    }

    /// Adds query root fields.
    pub fn add_queries<K>(&mut self, fields: impl IntoIterator<Item = (K, Declaration)>) -> &mut Self
    where
        K: Into<String>,
    {
        extend_fields(&mut self.queries, fields);
        self
    }

    /// Adds mutation root fields.
    ///
    /// A mutation whose declaration names a publish type also gets a
    /// subscription field of the same name delivering that type. Replacing
    /// such a mutation with one that publishes nothing drops the derived
    /// subscription again.
    pub fn add_mutations<K>(
        &mut self,
        fields: impl IntoIterator<Item = (K, Declaration)>,
    ) -> &mut Self
    where
        K: Into<String>,
    {
        for (name, decl) in fields {
            let name = name.into();
            if let Some(publish) = decl.publish() {
                trace!(field_name = %name, "Deriving subscription from mutation");
                self.subscriptions.insert(name.clone(), publish.clone());
                self.derived.insert(name.clone());
            } else if self.derived.remove(&name) {
                trace!(field_name = %name, "Dropping subscription derived from replaced mutation");
                self.subscriptions.shift_remove(&name);
            }
            self.mutations.insert(name, decl);
        }
        self
    }

    /// Adds subscription root fields.
    pub fn add_subscriptions<K>(
        &mut self,
        fields: impl IntoIterator<Item = (K, Declaration)>,
    ) -> &mut Self
    where
        K: Into<String>,
    {
        for (name, decl) in fields {
            let name = name.into();
            self.derived.remove(&name);
            self.subscriptions.insert(name, decl);
        }
        self
    }

    /// Deep-merges resolvers keyed by type name, then field name.
    pub fn add_resolvers<T, F, K1, K2>(&mut self, resolvers: T) -> &mut Self
    where
        T: IntoIterator<Item = (K1, F)>,
        F: IntoIterator<Item = (K2, Resolver)>,
        K1: Into<String>,
        K2: Into<String>,
    {
        deep_merge(&mut self.resolvers, resolvers);
        self
    }

    /// Deep-merges permission rules keyed by type name, then field name.
    ///
    /// A `"*"` field entry applies to every field of its type without an
    /// entry of its own.
    pub fn add_permissions<T, F, K1, K2>(&mut self, permissions: T) -> &mut Self
    where
        T: IntoIterator<Item = (K1, F)>,
        F: IntoIterator<Item = (K2, Permission)>,
        K1: Into<String>,
        K2: Into<String>,
    {
        deep_merge(&mut self.permissions, permissions);
        self
    }

    #[must_use]
    pub fn resolvers(&self) -> &Table<Resolver> {
        &self.resolvers
    }

    #[must_use]
    pub fn permissions(&self) -> &Table<Permission> {
        &self.permissions
    }

    /// The event bus installed into every schema this assembler builds.
    #[must_use]
    pub fn pubsub(&self) -> &PubSub {
        &self.pubsub
    }

    /// Builds the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if a declaration cannot be transformed, a resolver
    /// does not fit its field, or the engine rejects the schema.
    pub fn to_graphql(&self) -> Result<Schema, SchemaError> {
        self.to_graphql_with(|builder| builder)
    }

    /// Builds the schema, letting `adapt` modify the engine builder last.
    ///
    /// # Errors
    ///
    /// See [`SchemaAssembler::to_graphql`].
    pub fn to_graphql_with<F>(&self, adapt: F) -> Result<Schema, SchemaError>
    where
        F: FnOnce(SchemaBuilder) -> SchemaBuilder,
    {
        self.assemble(adapt).map(|(schema, _)| schema)
    }

    /// Builds the schema along with its type names in registration order.
    fn assemble<F>(&self, adapt: F) -> Result<(Schema, Vec<String>), SchemaError>
    where
        F: FnOnce(SchemaBuilder) -> SchemaBuilder,
    {
        debug!(
            queries = self.queries.len(),
            mutations = self.mutations.len(),
            subscriptions = self.subscriptions.len(),
            "Starting GraphQL schema build"
        );

        let mut registry = TypeRegistry::new();
        let mut transformer = Transformer::new(&self.type_map, &mut registry);

        let queries = if self.queries.is_empty() {
            debug!("No queries registered, emitting placeholder query field");
            Fields::from([(PLACEHOLDER_FIELD.to_owned(), maybe(string()))])
        } else {
            self.queries.clone()
        };
        let query = root_type(&mut transformer, QUERY_TYPE, &queries)?;
        let mutation = optional_root(&mut transformer, MUTATION_TYPE, &self.mutations)?;
        let subscription =
            optional_root(&mut transformer, SUBSCRIPTION_TYPE, &self.subscriptions)?;

        let builder = Schema::build(query, mutation, subscription);
        let binder = Binder::new(&self.resolvers, &self.permissions, subscription);
        let mut builder = binder
            .register_all(builder, &registry)?
            .data(self.pubsub.clone())
            .limit_depth(self.config.max_depth)
            .limit_complexity(self.config.max_complexity);
        if !self.config.introspection {
            builder = builder.disable_introspection();
        }

        let schema = adapt(builder)
            .finish()
            .map_err(|e| SchemaError::BuildFailed(e.to_string()))?;

        debug!(types = registry.len(), "GraphQL schema build complete");
        let order = registry
            .types()
            .map(|ty| ty.name().to_owned())
            .chain(registry.scalars().map(|scalar| scalar.name.clone()))
            .collect();
        Ok((schema, order))
    }

    /// Builds the schema and wraps it for execution.
    ///
    /// # Errors
    ///
    /// See [`SchemaAssembler::to_graphql`].
    pub fn compile(&self) -> Result<Executor, SchemaError> {
        self.to_graphql().map(Executor::new)
    }

    /// Like [`SchemaAssembler::compile`], with an adaptation callback.
    ///
    /// # Errors
    ///
    /// See [`SchemaAssembler::to_graphql`].
    pub fn compile_with<F>(&self, adapt: F) -> Result<Executor, SchemaError>
    where
        F: FnOnce(SchemaBuilder) -> SchemaBuilder,
    {
        self.to_graphql_with(adapt).map(Executor::new)
    }

    /// Builds the schema and renders it as SDL, listing types in the order
    /// they were first reached from the root fields.
    ///
    /// # Errors
    ///
    /// See [`SchemaAssembler::to_graphql`].
    pub fn print(&self) -> Result<String, SchemaError> {
        let (schema, order) = self.assemble(|builder| builder)?;
        Ok(order_definitions(&schema.sdl(), &order))
    }
}

impl std::fmt::Debug for SchemaAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaAssembler")
            .field("queries", &self.queries.keys().collect::<Vec<_>>())
            .field("mutations", &self.mutations.keys().collect::<Vec<_>>())
            .field("subscriptions", &self.subscriptions.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn extend_fields<K: Into<String>>(
    target: &mut Fields,
    fields: impl IntoIterator<Item = (K, Declaration)>,
) {
    target.extend(fields.into_iter().map(|(name, decl)| (name.into(), decl)));
}

/// Transforms a root field map under a synthetic struct declaration.
fn root_type<'n>(
    transformer: &mut Transformer<'_>,
    name: &'n str,
    fields: &Fields,
) -> Result<&'n str, SchemaError> {
    let decl = Declaration::record(fields.clone()).annotate(Metadata::named(name));
    transformer.transform(&decl, true)?;
    trace!(type_name = name, fields = fields.len(), "Built root type");
    Ok(name)
}

fn optional_root<'n>(
    transformer: &mut Transformer<'_>,
    name: &'n str,
    fields: &Fields,
) -> Result<Option<&'n str>, SchemaError> {
    if fields.is_empty() {
        return Ok(None);
    }
    root_type(transformer, name, fields).map(Some)
}
