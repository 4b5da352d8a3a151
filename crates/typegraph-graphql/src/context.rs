//! Per-request execution context.
//!
//! The root value and the application's context object travel with each
//! request as schema-request data. Field bindings read them back when building
//! [`ResolveParams`](crate::resolvers::ResolveParams).
//!
//! # Example
//!
//! ```ignore
//! use typegraph_graphql::ExecutionContext;
//!
//! let request = ExecutionContext::builder()
//!     .with_root(json!({"greeting": "hello"}))
//!     .with_context(json!({"user": "alice"}))
//!     .build()
//!     .into_request("{ greeting }", None);
//! ```

use std::sync::Arc;

use async_graphql::{Request, Variables};
use serde_json::Value;

/// Request-scoped values visible to resolvers and permission rules.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Parent value of root fields.
    pub root: Value,

    /// Application context, shared by every resolver of the request.
    pub context: Arc<Value>,
}

impl ExecutionContext {
    /// Creates a new builder for ExecutionContext.
    #[must_use]
    pub fn builder() -> ExecutionContextBuilder {
        ExecutionContextBuilder::default()
    }

    /// Wraps a query into an engine request carrying this context.
    #[must_use]
    pub fn into_request(self, query: impl Into<String>, variables: Option<Value>) -> Request {
        let mut request = Request::new(query);
        if let Some(variables) = variables {
            request = request.variables(Variables::from_json(variables));
        }
        request.data(self)
    }
}

/// Builder for constructing ExecutionContext.
#[derive(Debug, Default)]
pub struct ExecutionContextBuilder {
    root: Option<Value>,
    context: Option<Value>,
}

impl ExecutionContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root value.
    #[must_use]
    pub fn with_root(mut self, root: Value) -> Self {
        self.root = Some(root);
        self
    }

    /// Sets the application context.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Builds the ExecutionContext. Missing values default to JSON `null`.
    #[must_use]
    pub fn build(self) -> ExecutionContext {
        ExecutionContext {
            root: self.root.unwrap_or(Value::Null),
            context: Arc::new(self.context.unwrap_or(Value::Null)),
        }
    }
}
