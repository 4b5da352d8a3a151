//! Access control for field resolution.
//!
//! A [`Rule`] decides whether a field may be resolved for a given request.
//! Rules are registered per `type -> field` with an optional `"*"` entry per
//! type; the binder evaluates the applicable rule before running the field's
//! resolver.

use std::sync::Arc;

use async_graphql::ErrorExtensions;
use async_trait::async_trait;
use tracing::{trace, warn};

use super::ResolveParams;

/// Message of the error returned for rejected fields.
pub const PERMISSION_DENIED: &str = "Permission denied";

/// Outcome of evaluating a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
    /// The rule has no opinion. Treated as a denial.
    Abstain,
}

/// Authorization rule for a field.
#[async_trait]
pub trait Rule: Send + Sync {
    async fn evaluate(&self, params: &ResolveParams) -> AccessDecision;
}

/// Shared handle to a rule, as stored in permission tables.
pub type Permission = Arc<dyn Rule>;

struct FnRule<F>(F);

#[async_trait]
impl<F> Rule for FnRule<F>
where
    F: Fn(&ResolveParams) -> bool + Send + Sync,
{
    async fn evaluate(&self, params: &ResolveParams) -> AccessDecision {
        if (self.0)(params) {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny
        }
    }
}

struct Constant(AccessDecision);

#[async_trait]
impl Rule for Constant {
    async fn evaluate(&self, _params: &ResolveParams) -> AccessDecision {
        self.0
    }
}

/// Builds a rule from a predicate over the resolve parameters.
pub fn rule<F>(predicate: F) -> Permission
where
    F: Fn(&ResolveParams) -> bool + Send + Sync + 'static,
{
    Arc::new(FnRule(predicate))
}

#[must_use]
pub fn allow() -> Permission {
    Arc::new(Constant(AccessDecision::Allow))
}

#[must_use]
pub fn deny() -> Permission {
    Arc::new(Constant(AccessDecision::Deny))
}

/// Evaluates `rule` and converts a rejection into a GraphQL error.
pub(crate) async fn authorize(
    rule: &dyn Rule,
    params: &ResolveParams,
) -> Result<(), async_graphql::Error> {
    trace!(
        type_name = %params.type_name,
        field_name = %params.field_name,
        "Evaluating permission"
    );

    match rule.evaluate(params).await {
        AccessDecision::Allow => Ok(()),
        decision => {
            warn!(
                type_name = %params.type_name,
                field_name = %params.field_name,
                ?decision,
                "Access denied"
            );
            Err(permission_denied())
        }
    }
}

/// The error surfaced for a rejected field.
pub fn permission_denied() -> async_graphql::Error {
    async_graphql::Error::new(PERMISSION_DENIED).extend_with(|_, e| e.set("code", "FORBIDDEN"))
}
