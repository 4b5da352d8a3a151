//! Subscription root type.
//!
//! Each field streams either the events produced by its subscription resolver
//! or, without one, the payloads published on the topic named after the field.

use std::sync::Arc;

use async_graphql::Error as GraphQLError;
use async_graphql::dynamic::{FieldValue, Subscription, SubscriptionField, SubscriptionFieldFuture};
use futures_util::StreamExt;
use tracing::{debug, trace};

use crate::error::SchemaError;
use crate::resolvers::access::authorize;
use crate::resolvers::values::output_value;
use crate::resolvers::{EventStream, ResolveParams, Resolver};
use crate::schema::binder::{Binder, FieldBinding, input_value};
use crate::schema::types::NamedType;

/// Builds the subscription root from its schema type.
pub(crate) fn build_subscription_type(
    ty: &NamedType,
    binder: &Binder<'_>,
) -> Result<Subscription, SchemaError> {
    let mut subscription = Subscription::new(ty.name());
    if let Some(description) = ty.description() {
        subscription = subscription.description(description);
    }

    for field in ty.fields() {
        let binding = Arc::new(binder.binding(ty, field));
        if matches!(binding.resolver, Some(Resolver::Field(_))) {
            return Err(SchemaError::ResolverMismatch {
                type_name: binding.type_name.clone(),
                field_name: binding.field_name.clone(),
                reason: "subscription fields need a subscription resolver",
            });
        }
        trace!(
            field_name = %field.name,
            custom_resolver = binding.resolver.is_some(),
            "Binding subscription field"
        );

        let mut sub_field = SubscriptionField::new(&field.name, field.ty.to_type_ref(), move |ctx| {
            let binding = Arc::clone(&binding);
            let params = binding.params(&ctx);
            SubscriptionFieldFuture::new(async move {
                let events = open_stream(&binding, params?).await?;
                let shaping = Arc::clone(&binding);
                Ok::<_, GraphQLError>(events.map(move |event| {
                    event.and_then(|payload| {
                        output_value(&shaping.ty, payload).map(|v| v.unwrap_or(FieldValue::NULL))
                    })
                }))
            })
        });
        if let Some(description) = &field.description {
            sub_field = sub_field.description(description);
        }
        for arg in &field.args {
            sub_field = sub_field.argument(input_value(arg));
        }
        subscription = subscription.field(sub_field);
    }
    Ok(subscription)
}

async fn open_stream(
    binding: &FieldBinding,
    params: ResolveParams,
) -> Result<EventStream, GraphQLError> {
    if let Some(rule) = &binding.rule {
        authorize(rule.as_ref(), &params).await?;
    }

    match &binding.resolver {
        Some(Resolver::Subscription(subscribe)) => subscribe(params).await,
        Some(Resolver::Field(_)) => Err(GraphQLError::new(format!(
            "{}.{} is bound to a query resolver",
            binding.type_name, binding.field_name
        ))),
        None => {
            let pubsub = params
                .pubsub()
                .ok_or_else(|| GraphQLError::new("no event bus is installed in the schema"))?;
            debug!(topic = %binding.field_name, "Starting subscription");
            Ok(pubsub.subscribe(&binding.field_name))
        }
    }
}
