//! Two-level `type -> field -> value` tables for resolvers and permissions.

use indexmap::IndexMap;

/// Values keyed by GraphQL type name, then field name.
pub type Table<V> = IndexMap<String, IndexMap<String, V>>;

/// Merges `source` into `target`.
///
/// Types present in both keep the union of their fields; for a field present
/// in both, the value from `source` wins.
pub fn deep_merge<V, T, F, K1, K2>(target: &mut Table<V>, source: T)
where
    T: IntoIterator<Item = (K1, F)>,
    F: IntoIterator<Item = (K2, V)>,
    K1: Into<String>,
    K2: Into<String>,
{
    for (type_name, fields) in source {
        let entry = target.entry(type_name.into()).or_default();
        for (field_name, value) in fields {
            entry.insert(field_name.into(), value);
        }
    }
}

/// Looks a value up by type and field, falling back to the type's `"*"` entry.
pub(crate) fn lookup_with_wildcard<'a, V>(
    table: &'a Table<V>,
    type_name: &str,
    field_name: &str,
) -> Option<&'a V> {
    let fields = table.get(type_name)?;
    fields.get(field_name).or_else(|| fields.get("*"))
}
