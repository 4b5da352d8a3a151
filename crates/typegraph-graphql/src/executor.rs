//! Execution entry point for compiled schemas.

use async_graphql::dynamic::Schema;
use async_graphql::{Request, Response};
use futures_util::stream::BoxStream;
use serde_json::Value;
use tracing::debug;

use crate::context::ExecutionContext;

/// A compiled schema ready to run queries, mutations and subscriptions.
///
/// Cloning is cheap; clones share the same schema.
#[derive(Clone)]
pub struct Executor {
    schema: Schema,
}

impl Executor {
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// Executes a query or mutation.
    ///
    /// `root` is the parent value of root fields and `context` is handed to
    /// every resolver and permission rule. Errors are reported inside the
    /// response.
    pub async fn execute(
        &self,
        query: impl Into<String>,
        root: Value,
        context: Value,
        variables: Option<Value>,
    ) -> Response {
        let request = ExecutionContext::builder()
            .with_root(root)
            .with_context(context)
            .build()
            .into_request(query, variables);
        self.execute_request(request).await
    }

    /// Executes a prepared request.
    ///
    /// Requests without an [`ExecutionContext`] in their data run with a
    /// `null` root value and context.
    pub async fn execute_request(&self, request: Request) -> Response {
        let response = self.schema.execute(request).await;
        if response.is_err() {
            debug!(errors = response.errors.len(), "GraphQL request completed with errors");
        }
        response
    }

    /// Starts a subscription, yielding one response per event.
    #[must_use]
    pub fn subscribe(
        &self,
        query: impl Into<String>,
        root: Value,
        context: Value,
        variables: Option<Value>,
    ) -> BoxStream<'static, Response> {
        let request = ExecutionContext::builder()
            .with_root(root)
            .with_context(context)
            .build()
            .into_request(query, variables);
        <Schema as async_graphql::Executor>::execute_stream(&self.schema, request, None)
    }

    /// The schema in SDL form.
    #[must_use]
    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}
