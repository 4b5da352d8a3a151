//! Declaration builders.
//!
//! Helpers that attach the metadata the schema layer expects onto domain
//! declarations: named object types, input types, function fields with
//! arguments, and arguments with defaults.
//!
//! ```
//! use serde_json::json;
//! use typegraph_core::builders::*;
//!
//! let user = object("User", Some("A registered user"), [("name", string())]);
//! let lookup = func(
//!     [("limit", arg(integer(), Some(json!(10)), None))],
//!     list(user.clone()),
//!     None,
//!     Some("Lists users"),
//! );
//! assert_eq!(user.name(), Some("User"));
//! assert!(lookup.args().is_some());
//! ```

use indexmap::IndexMap;
use serde_json::Value;

use crate::declaration::{Declaration, Dispatch};
use crate::metadata::Metadata;

// ============================================================================
// Scalars
// ============================================================================

#[must_use]
pub fn boolean() -> Declaration {
    Declaration::scalar("Boolean")
}

#[must_use]
pub fn id() -> Declaration {
    Declaration::scalar("ID")
}

#[must_use]
pub fn integer() -> Declaration {
    Declaration::scalar("Integer")
}

#[must_use]
pub fn number() -> Declaration {
    Declaration::scalar("Number")
}

#[must_use]
pub fn string() -> Declaration {
    Declaration::scalar("String")
}

/// Calendar dates, carried as ISO-8601 strings.
#[must_use]
pub fn date() -> Declaration {
    Declaration::scalar("Date")
}

// ============================================================================
// Structural helpers
// ============================================================================

#[must_use]
pub fn list(element: Declaration) -> Declaration {
    Declaration::list(element)
}

#[must_use]
pub fn maybe(inner: Declaration) -> Declaration {
    Declaration::maybe(inner)
}

/// A named enum over `(symbol, underlying value)` pairs.
pub fn enumeration<K>(name: &str, values: impl IntoIterator<Item = (K, Value)>) -> Declaration
where
    K: Into<String>,
{
    Declaration::enumeration(values).annotate(Metadata::named(name))
}

/// A named interface type.
pub fn interface<K>(
    name: &str,
    description: Option<&str>,
    fields: impl IntoIterator<Item = (K, Declaration)>,
    dispatch: Option<Dispatch>,
) -> Declaration
where
    K: Into<String>,
{
    Declaration::interface(fields, dispatch).annotate(describe(Metadata::named(name), description))
}

/// A named union; `dispatch` picks the member describing a runtime value.
pub fn union<F>(
    name: &str,
    members: impl IntoIterator<Item = Declaration>,
    dispatch: F,
) -> Declaration
where
    F: Fn(&Value) -> Option<Declaration> + Send + Sync + 'static,
{
    Declaration::union(members, dispatch).annotate(Metadata::named(name))
}

// ============================================================================
// Schema builders
// ============================================================================

/// A named GraphQL object type.
pub fn object<K>(
    name: &str,
    description: Option<&str>,
    fields: impl IntoIterator<Item = (K, Declaration)>,
) -> Declaration
where
    K: Into<String>,
{
    object_implementing(name, description, fields, Vec::<Declaration>::new())
}

/// A named GraphQL object type implementing the given interfaces.
pub fn object_implementing<K>(
    name: &str,
    description: Option<&str>,
    fields: impl IntoIterator<Item = (K, Declaration)>,
    interfaces: impl IntoIterator<Item = Declaration>,
) -> Declaration
where
    K: Into<String>,
{
    let meta = describe(Metadata::named(name), description).with_interfaces(interfaces);
    Declaration::record(fields).annotate(meta)
}

/// A named GraphQL input object type.
pub fn input<K>(
    name: &str,
    description: Option<&str>,
    fields: impl IntoIterator<Item = (K, Declaration)>,
) -> Declaration
where
    K: Into<String>,
{
    Declaration::record(fields).annotate(describe(Metadata::named(name), description).as_input())
}

/// A field taking arguments.
///
/// `publish` names the payload a mutation announces to subscribers; the
/// assembler turns it into a subscription field of the same name.
pub fn func<K>(
    args: impl IntoIterator<Item = (K, Declaration)>,
    output: Declaration,
    publish: Option<Declaration>,
    description: Option<&str>,
) -> Declaration
where
    K: Into<String>,
{
    let args: IndexMap<String, Declaration> =
        args.into_iter().map(|(k, v)| (k.into(), v)).collect();
    let mut meta = describe(Metadata::for_field(), description).with_args(args);
    meta.publish = publish;
    output.annotate(meta)
}

/// An argument with an optional default value.
#[must_use]
pub fn arg(decl: Declaration, default: Option<Value>, description: Option<&str>) -> Declaration {
    let mut meta = describe(Metadata::for_field(), description);
    meta.default_value = default;
    decl.annotate(meta)
}

fn describe(meta: Metadata, description: Option<&str>) -> Metadata {
    match description {
        Some(text) => meta.with_description(text),
        None => meta,
    }
}
