//! Materializes built schema types into async-graphql dynamic types.
//!
//! Every object field gets a resolver that evaluates the field's permission
//! rule, runs the application resolver (or reads the parent's property of the
//! same name), and shapes the result by the field's schema type.

use std::sync::Arc;

use async_graphql::dynamic::{
    Enum, EnumItem, Field, FieldFuture, FieldValue, InputObject, InputValue, Interface,
    InterfaceField, Object, ResolverContext, Scalar, SchemaBuilder, Union,
};
use async_graphql::{Error as GraphQLError, Name, Value as GraphQLValue};
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::registry::TypeRegistry;
use super::types::{ArgumentType, FieldType, NamedKind, NamedType, ScalarType, SchemaType};
use crate::context::ExecutionContext;
use crate::error::SchemaError;
use crate::resolvers::access::authorize;
use crate::resolvers::table::lookup_with_wildcard;
use crate::resolvers::values::{input_arguments, output_value};
use crate::resolvers::{
    Permission, ResolveParams, Resolver, Table, graphql_value_to_json, json_to_graphql_value,
};
use crate::subscriptions::PubSub;
use crate::subscriptions::fields::build_subscription_type;

/// Everything a field resolver needs at run time.
pub(crate) struct FieldBinding {
    pub type_name: String,
    pub field_name: String,
    pub ty: SchemaType,
    pub args: Vec<ArgumentType>,
    pub resolver: Option<Resolver>,
    pub rule: Option<Permission>,
}

/// Work left for the async part of a field resolution.
enum Pending {
    Ready(Value),
    Call(ResolveParams),
}

impl FieldBinding {
    /// Collects owned resolver inputs from the engine context.
    pub(crate) fn params(&self, ctx: &ResolverContext<'_>) -> Result<ResolveParams, GraphQLError> {
        let supplied = ctx.args.as_index_map();
        let args = input_arguments(&self.args, |name| supplied.get(&Name::new(name)))?;
        let execution = ctx.data_opt::<ExecutionContext>();

        Ok(ResolveParams {
            type_name: self.type_name.clone(),
            field_name: self.field_name.clone(),
            parent: parent_value(ctx, execution),
            args,
            context: execution
                .map(|e| Arc::clone(&e.context))
                .unwrap_or_default(),
            pubsub: ctx.data_opt::<PubSub>().cloned(),
        })
    }

    fn prepare(&self, ctx: &ResolverContext<'_>) -> Result<Pending, GraphQLError> {
        if self.resolver.is_none() && self.rule.is_none() {
            return Ok(Pending::Ready(parent_property(ctx, &self.field_name)));
        }
        self.params(ctx).map(Pending::Call)
    }

    async fn complete<'v>(&self, pending: Pending) -> Result<Option<FieldValue<'v>>, GraphQLError> {
        let value = match pending {
            Pending::Ready(value) => value,
            Pending::Call(params) => {
                if let Some(rule) = &self.rule {
                    authorize(rule.as_ref(), &params).await?;
                }
                match &self.resolver {
                    Some(Resolver::Field(resolve)) => resolve(params).await?,
                    Some(Resolver::Subscription(_)) => {
                        return Err(GraphQLError::new(format!(
                            "{}.{} is bound to a subscription resolver",
                            self.type_name, self.field_name
                        )));
                    }
                    None => params
                        .parent
                        .get(&self.field_name)
                        .cloned()
                        .unwrap_or(Value::Null),
                }
            }
        };
        output_value(&self.ty, value)
    }
}

/// The parent object as JSON; the request's root value for root fields.
fn parent_value(ctx: &ResolverContext<'_>, execution: Option<&ExecutionContext>) -> Value {
    match ctx.parent_value.as_value() {
        Some(value) if !matches!(value, GraphQLValue::Null) => graphql_value_to_json(value),
        _ => execution.map(|e| e.root.clone()).unwrap_or(Value::Null),
    }
}

/// Reads one property of the parent without converting the whole object.
fn parent_property(ctx: &ResolverContext<'_>, field_name: &str) -> Value {
    match ctx.parent_value.as_value() {
        Some(GraphQLValue::Object(map)) => map
            .get(&Name::new(field_name))
            .map(graphql_value_to_json)
            .unwrap_or(Value::Null),
        Some(value) if !matches!(value, GraphQLValue::Null) => Value::Null,
        _ => ctx
            .data_opt::<ExecutionContext>()
            .and_then(|e| e.root.get(field_name).cloned())
            .unwrap_or(Value::Null),
    }
}

/// Turns the registry's types into dynamic types, binding resolvers and rules.
pub(crate) struct Binder<'a> {
    resolvers: &'a Table<Resolver>,
    permissions: &'a Table<Permission>,
    subscription_root: Option<&'a str>,
}

impl<'a> Binder<'a> {
    pub(crate) fn new(
        resolvers: &'a Table<Resolver>,
        permissions: &'a Table<Permission>,
        subscription_root: Option<&'a str>,
    ) -> Self {
        Self {
            resolvers,
            permissions,
            subscription_root,
        }
    }

    pub(crate) fn register_all(
        &self,
        mut builder: SchemaBuilder,
        registry: &TypeRegistry,
    ) -> Result<SchemaBuilder, SchemaError> {
        for scalar in registry.scalars() {
            builder = builder.register(scalar_type(scalar));
        }

        for ty in registry.types() {
            builder = match ty.kind() {
                NamedKind::Object if Some(ty.name()) == self.subscription_root => {
                    builder.register(build_subscription_type(ty, self)?)
                }
                NamedKind::Object => builder.register(self.object_type(ty)?),
                NamedKind::InputObject => builder.register(input_object_type(ty)),
                NamedKind::Interface => builder.register(interface_type(ty)),
                NamedKind::Union => builder.register(union_type(ty)),
                NamedKind::Enum => builder.register(enum_type(ty)),
            };
        }

        self.warn_unbound(registry);
        debug!(
            types = registry.len(),
            scalars = registry.scalars().count(),
            "Registered schema types"
        );
        Ok(builder)
    }

    pub(crate) fn binding(&self, ty: &NamedType, field: &FieldType) -> FieldBinding {
        FieldBinding {
            type_name: ty.name().to_owned(),
            field_name: field.name.clone(),
            ty: field.ty.clone(),
            args: field.args.clone(),
            resolver: self
                .resolvers
                .get(ty.name())
                .and_then(|fields| fields.get(&field.name))
                .cloned(),
            rule: lookup_with_wildcard(self.permissions, ty.name(), &field.name).cloned(),
        }
    }

    fn object_type(&self, ty: &NamedType) -> Result<Object, SchemaError> {
        let mut object = Object::new(ty.name());
        if let Some(description) = ty.description() {
            object = object.description(description);
        }
        for iface in ty.interfaces() {
            object = object.implement(iface.type_name());
        }

        for field in ty.fields() {
            let binding = Arc::new(self.binding(ty, field));
            if matches!(binding.resolver, Some(Resolver::Subscription(_))) {
                return Err(SchemaError::ResolverMismatch {
                    type_name: binding.type_name.clone(),
                    field_name: binding.field_name.clone(),
                    reason: "subscription resolvers only apply to subscription fields",
                });
            }
            trace!(
                type_name = %ty.name(),
                field_name = %field.name,
                custom_resolver = binding.resolver.is_some(),
                guarded = binding.rule.is_some(),
                "Binding field"
            );

            let mut gql_field = Field::new(&field.name, field.ty.to_type_ref(), move |ctx| {
                let binding = Arc::clone(&binding);
                FieldFuture::new(async move {
                    let resolved = match binding.prepare(&ctx) {
                        Ok(pending) => binding.complete(pending).await,
                        Err(err) => Err(err),
                    };
                    match resolved {
                        // A nullable field reports its error and resolves to null.
                        Err(err) if !binding.ty.is_non_null() => {
                            let err = ctx.set_error_path(err.into_server_error(ctx.item.pos));
                            ctx.add_error(err);
                            Ok(None)
                        }
                        other => other,
                    }
                })
            });
            if let Some(description) = &field.description {
                gql_field = gql_field.description(description);
            }
            for arg in &field.args {
                gql_field = gql_field.argument(input_value(arg));
            }
            object = object.field(gql_field);
        }
        Ok(object)
    }

    fn warn_unbound(&self, registry: &TypeRegistry) {
        warn_unknown_entries(self.resolvers, registry, "resolver");
        warn_unknown_entries(self.permissions, registry, "permission");
    }
}

/// Table entries naming a type or field that the built schema lacks.
fn warn_unknown_entries<V>(table: &Table<V>, registry: &TypeRegistry, kind: &'static str) {
    for (type_name, fields) in table {
        let ty = registry.by_name(type_name);
        for field_name in fields.keys() {
            let known = ty.is_some_and(|ty| field_name == "*" || ty.field(field_name).is_some());
            if !known {
                warn!(
                    type_name = %type_name,
                    field_name = %field_name,
                    kind,
                    "Registered for a field that is not in the schema"
                );
            }
        }
    }
}

pub(crate) fn input_value(arg: &ArgumentType) -> InputValue {
    let mut value = InputValue::new(&arg.name, arg.ty.to_type_ref());
    if let Some(description) = &arg.description {
        value = value.description(description);
    }
    if let Some(default) = &arg.default_value {
        value = value.default_value(default_literal(&arg.ty, default));
    }
    value
}

/// Default values are written in GraphQL terms: enum defaults by symbol.
fn default_literal(ty: &SchemaType, default: &Value) -> GraphQLValue {
    match (ty, default) {
        (SchemaType::NonNull(inner), _) => default_literal(inner, default),
        (SchemaType::List(inner), Value::Array(items)) => GraphQLValue::List(
            items.iter().map(|item| default_literal(inner, item)).collect(),
        ),
        (SchemaType::List(inner), single) => default_literal(inner, single),
        (SchemaType::Named(named), _) if named.kind() == NamedKind::Enum => named
            .symbol_for(default)
            .map(|symbol| GraphQLValue::Enum(Name::new(symbol)))
            .unwrap_or_else(|| json_to_graphql_value(default.clone())),
        _ => json_to_graphql_value(default.clone()),
    }
}

fn scalar_type(scalar: &ScalarType) -> Scalar {
    let mut out = Scalar::new(&scalar.name);
    if let Some(description) = &scalar.description {
        out = out.description(description);
    }
    out
}

fn input_object_type(ty: &NamedType) -> InputObject {
    let mut object = InputObject::new(ty.name());
    if let Some(description) = ty.description() {
        object = object.description(description);
    }
    for field in ty.fields() {
        let mut value = InputValue::new(&field.name, field.ty.to_type_ref());
        if let Some(description) = &field.description {
            value = value.description(description);
        }
        if let Some(default) = &field.default_value {
            value = value.default_value(default_literal(&field.ty, default));
        }
        object = object.field(value);
    }
    object
}

fn interface_type(ty: &NamedType) -> Interface {
    let mut iface = Interface::new(ty.name());
    if let Some(description) = ty.description() {
        iface = iface.description(description);
    }
    for parent in ty.interfaces() {
        iface = iface.implement(parent.type_name());
    }
    for field in ty.fields() {
        let mut iface_field = InterfaceField::new(&field.name, field.ty.to_type_ref());
        if let Some(description) = &field.description {
            iface_field = iface_field.description(description);
        }
        for arg in &field.args {
            iface_field = iface_field.argument(input_value(arg));
        }
        iface = iface.field(iface_field);
    }
    iface
}

fn union_type(ty: &NamedType) -> Union {
    let mut union = Union::new(ty.name());
    if let Some(description) = ty.description() {
        union = union.description(description);
    }
    for member in ty.members() {
        union = union.possible_type(member.type_name());
    }
    union
}

fn enum_type(ty: &NamedType) -> Enum {
    let mut out = Enum::new(ty.name());
    if let Some(description) = ty.description() {
        out = out.description(description);
    }
    for value in ty.values() {
        out = out.item(EnumItem::new(&value.symbol));
    }
    out
}
