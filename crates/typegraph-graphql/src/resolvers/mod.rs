//! Field resolvers.
//!
//! Applications supply resolvers as async closures over [`ResolveParams`],
//! working in plain JSON. The binder converts between JSON and GraphQL values
//! and shapes resolver output by the field's schema type.

pub mod access;
pub mod table;
pub(crate) mod values;

pub use access::{AccessDecision, Permission, Rule, allow, deny, rule};
pub use table::{Table, deep_merge};

use std::future::Future;
use std::sync::Arc;

use async_graphql::Error as GraphQLError;
use futures_util::future::BoxFuture;
use futures_util::stream::{BoxStream, Stream};
use futures_util::{FutureExt, StreamExt};
use serde_json::{Map, Value};

use crate::subscriptions::PubSub;

/// Result of a query or mutation resolver.
pub type ResolveResult = Result<Value, GraphQLError>;

/// Stream of payloads produced by a subscription resolver.
pub type EventStream = BoxStream<'static, ResolveResult>;

pub type ResolveFn = Arc<dyn Fn(ResolveParams) -> BoxFuture<'static, ResolveResult> + Send + Sync>;

pub type SubscribeFn =
    Arc<dyn Fn(ResolveParams) -> BoxFuture<'static, Result<EventStream, GraphQLError>> + Send + Sync>;

/// Everything a resolver gets to see about the field being resolved.
#[derive(Debug, Clone)]
pub struct ResolveParams {
    pub type_name: String,
    pub field_name: String,
    /// The object the field is read from; the root value for root fields.
    pub parent: Value,
    /// Arguments with declared defaults applied and enum symbols mapped to
    /// their domain values.
    pub args: Map<String, Value>,
    /// Per-request context supplied at execution time.
    pub context: Arc<Value>,
    pub(crate) pubsub: Option<PubSub>,
}

impl ResolveParams {
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Reads a property of the request context.
    #[must_use]
    pub fn context_value(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    /// Publishes a payload to subscribers of `topic`.
    ///
    /// Returns the number of receivers; zero when the schema has no event bus
    /// or nobody is listening.
    pub fn publish(&self, topic: &str, payload: Value) -> usize {
        self.pubsub
            .as_ref()
            .map_or(0, |pubsub| pubsub.publish(topic, payload))
    }

    #[must_use]
    pub fn pubsub(&self) -> Option<&PubSub> {
        self.pubsub.as_ref()
    }
}

/// A field resolver.
#[derive(Clone)]
pub enum Resolver {
    /// Produces the value of a query, mutation or object field.
    Field(ResolveFn),
    /// Produces the event stream of a subscription field.
    Subscription(SubscribeFn),
}

impl Resolver {
    /// Wraps an async closure.
    pub fn new<F, Fut>(resolve: F) -> Self
    where
        F: Fn(ResolveParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ResolveResult> + Send + 'static,
    {
        Resolver::Field(Arc::new(move |params| resolve(params).boxed()))
    }

    /// Wraps a synchronous closure.
    pub fn sync<F>(resolve: F) -> Self
    where
        F: Fn(ResolveParams) -> ResolveResult + Send + Sync + 'static,
    {
        Resolver::Field(Arc::new(move |params| {
            let result = resolve(params);
            async move { result }.boxed()
        }))
    }

    /// Always resolves to the same value.
    #[must_use]
    pub fn value(value: Value) -> Self {
        Resolver::sync(move |_| Ok(value.clone()))
    }

    /// Wraps an async closure returning a stream of payloads.
    pub fn subscription<F, Fut, S>(subscribe: F) -> Self
    where
        F: Fn(ResolveParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S, GraphQLError>> + Send + 'static,
        S: Stream<Item = ResolveResult> + Send + 'static,
    {
        Resolver::Subscription(Arc::new(move |params| {
            let pending = subscribe(params);
            async move { pending.await.map(|stream| stream.boxed()) }.boxed()
        }))
    }

    #[must_use]
    pub fn is_subscription(&self) -> bool {
        matches!(self, Resolver::Subscription(_))
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolver::Field(_) => f.write_str("Resolver::Field"),
            Resolver::Subscription(_) => f.write_str("Resolver::Subscription"),
        }
    }
}

/// Convert a serde_json::Value to async_graphql::Value.
pub(crate) fn json_to_graphql_value(json: Value) -> async_graphql::Value {
    match json {
        Value::Null => async_graphql::Value::Null,
        Value::Bool(b) => async_graphql::Value::Boolean(b),
        Value::Number(n) => async_graphql::Value::Number(n),
        Value::String(s) => async_graphql::Value::String(s),
        Value::Array(arr) => {
            async_graphql::Value::List(arr.into_iter().map(json_to_graphql_value).collect())
        }
        Value::Object(obj) => {
            let map: async_graphql::indexmap::IndexMap<async_graphql::Name, async_graphql::Value> =
                obj.into_iter()
                    .map(|(k, v)| (async_graphql::Name::new(k), json_to_graphql_value(v)))
                    .collect();
            async_graphql::Value::Object(map)
        }
    }
}

/// Convert an async_graphql::Value to serde_json::Value.
///
/// Enum symbols become strings; binary values become byte arrays.
pub(crate) fn graphql_value_to_json(value: &async_graphql::Value) -> Value {
    match value {
        async_graphql::Value::Null => Value::Null,
        async_graphql::Value::Boolean(b) => Value::Bool(*b),
        async_graphql::Value::Number(n) => Value::Number(n.clone()),
        async_graphql::Value::String(s) => Value::String(s.clone()),
        async_graphql::Value::Enum(name) => Value::String(name.to_string()),
        async_graphql::Value::Binary(bytes) => {
            Value::Array(bytes.iter().map(|b| Value::from(*b)).collect())
        }
        async_graphql::Value::List(items) => {
            Value::Array(items.iter().map(graphql_value_to_json).collect())
        }
        async_graphql::Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.to_string(), graphql_value_to_json(v)))
                .collect(),
        ),
    }
}
