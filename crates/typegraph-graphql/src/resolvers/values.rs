//! Conversion between resolver JSON and GraphQL values, guided by schema types.

use async_graphql::dynamic::FieldValue;
use async_graphql::{Error as GraphQLError, Name, Value as GraphQLValue};
use serde_json::{Map, Value};
use typegraph_core::Kind;

use super::{graphql_value_to_json, json_to_graphql_value};
use crate::schema::types::{ArgumentType, NamedKind, NamedType, SchemaType};

/// Shapes a resolver's JSON output for the engine.
///
/// Enum values are mapped back to their symbols and abstract types are
/// tagged with the concrete type picked for each value.
pub(crate) fn output_value<'a>(
    ty: &SchemaType,
    value: Value,
) -> Result<Option<FieldValue<'a>>, GraphQLError> {
    if value.is_null() {
        return Ok(None);
    }
    match ty {
        SchemaType::NonNull(inner) => output_value(inner, value),
        SchemaType::List(inner) => {
            let Value::Array(items) = value else {
                return Err(GraphQLError::new(format!("expected a list for `{ty}`")));
            };
            let mut shaped = Vec::with_capacity(items.len());
            for item in items {
                shaped.push(output_value(inner, item)?.unwrap_or(FieldValue::NULL));
            }
            Ok(Some(FieldValue::list(shaped)))
        }
        SchemaType::Scalar(_) => Ok(Some(FieldValue::value(json_to_graphql_value(value)))),
        SchemaType::Named(named) => match named.kind() {
            NamedKind::Enum => {
                let symbol = named.symbol_for(&value).ok_or_else(|| {
                    GraphQLError::new(format!("{value} is not a value of enum `{}`", named.name()))
                })?;
                Ok(Some(FieldValue::value(GraphQLValue::Enum(Name::new(symbol)))))
            }
            NamedKind::Union | NamedKind::Interface => {
                let concrete = concrete_type(named, &value)?;
                Ok(Some(
                    FieldValue::value(json_to_graphql_value(value)).with_type(concrete),
                ))
            }
            NamedKind::Object | NamedKind::InputObject => {
                Ok(Some(FieldValue::value(json_to_graphql_value(value))))
            }
        },
    }
}

/// Picks the concrete object type for a value of an abstract type.
fn concrete_type(named: &NamedType, value: &Value) -> Result<String, GraphQLError> {
    let dispatched = match named.declaration().kind() {
        Kind::Union { dispatch, .. } => dispatch(value),
        Kind::Interface {
            dispatch: Some(dispatch),
            ..
        } => dispatch(value),
        _ => None,
    };
    if let Some(member) = dispatched {
        return member.name().map(str::to_owned).ok_or_else(|| {
            GraphQLError::new(format!("unnamed member picked for `{}`", named.name()))
        });
    }
    value
        .get("__typename")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            GraphQLError::new(format!(
                "cannot determine the concrete type of `{}` for this value",
                named.name()
            ))
        })
}

/// Converts an incoming GraphQL value to JSON for resolvers.
///
/// Enum symbols become their domain values and missing input object fields
/// take their declared defaults.
pub(crate) fn input_value(ty: &SchemaType, value: &GraphQLValue) -> Result<Value, GraphQLError> {
    if matches!(value, GraphQLValue::Null) {
        return Ok(Value::Null);
    }
    match ty {
        SchemaType::NonNull(inner) => input_value(inner, value),
        SchemaType::List(inner) => match value {
            GraphQLValue::List(items) => items
                .iter()
                .map(|item| input_value(inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            single => Ok(Value::Array(vec![input_value(inner, single)?])),
        },
        SchemaType::Scalar(_) => Ok(graphql_value_to_json(value)),
        SchemaType::Named(named) => match named.kind() {
            NamedKind::Enum => {
                let symbol = match value {
                    GraphQLValue::Enum(name) => name.as_str(),
                    GraphQLValue::String(s) => s.as_str(),
                    _ => return Err(GraphQLError::new(format!("expected a `{}` symbol", named.name()))),
                };
                named.value_for(symbol).cloned().ok_or_else(|| {
                    GraphQLError::new(format!("`{symbol}` is not a value of enum `{}`", named.name()))
                })
            }
            NamedKind::InputObject => {
                let GraphQLValue::Object(fields) = value else {
                    return Err(GraphQLError::new(format!("expected a `{}` object", named.name())));
                };
                let mut out = Map::new();
                for field in named.fields() {
                    match fields.get(&Name::new(&field.name)) {
                        Some(v) => {
                            out.insert(field.name.clone(), input_value(&field.ty, v)?);
                        }
                        None => {
                            if let Some(default) = &field.default_value {
                                out.insert(field.name.clone(), default.clone());
                            }
                        }
                    }
                }
                Ok(Value::Object(out))
            }
            _ => Ok(graphql_value_to_json(value)),
        },
    }
}

/// Converts a field's arguments, applying declared defaults for missing ones.
pub(crate) fn input_arguments<'v>(
    declared: &[ArgumentType],
    supplied: impl Fn(&str) -> Option<&'v GraphQLValue>,
) -> Result<Map<String, Value>, GraphQLError> {
    let mut args = Map::new();
    for arg in declared {
        match supplied(&arg.name) {
            Some(value) => {
                args.insert(arg.name.clone(), input_value(&arg.ty, value)?);
            }
            None => {
                if let Some(default) = &arg.default_value {
                    args.insert(arg.name.clone(), default.clone());
                }
            }
        }
    }
    Ok(args)
}
