//! Error types for schema construction.
//!
//! Build-time problems (unmapped declarations, name clashes, rejected schemas)
//! are reported as [`SchemaError`]. Problems raised while executing a query
//! travel as `async_graphql::Error` entries in the response instead.

/// Errors that can occur while turning declarations into a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Neither the display name nor the kind has a type-map entry.
    #[error("no type mapping for {} (kind `{kind}`)", .name.as_deref().unwrap_or("unnamed declaration"))]
    UnknownType {
        name: Option<String>,
        kind: &'static str,
    },

    /// A named GraphQL type was requested for an unnamed declaration.
    #[error("{kind} declaration has no name; annotate it before use")]
    MissingName { kind: &'static str },

    /// A builder received a declaration of the wrong kind.
    #[error("expected a {expected} declaration, found {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: &'static str,
    },

    /// Two different declarations claim the same GraphQL type name.
    #[error("type name `{0}` is used by two different declarations")]
    DuplicateTypeName(String),

    /// A resolver of the wrong flavor was bound to a field.
    #[error("resolver for {type_name}.{field_name} does not match the field: {reason}")]
    ResolverMismatch {
        type_name: String,
        field_name: String,
        reason: &'static str,
    },

    /// The GraphQL engine rejected the assembled schema.
    #[error("failed to build GraphQL schema: {0}")]
    BuildFailed(String),

    /// Configuration values are invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SchemaError {
    /// Returns a stable code for logs and error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownType { .. } => "UNKNOWN_TYPE",
            Self::MissingName { .. } => "MISSING_NAME",
            Self::UnexpectedKind { .. } => "UNEXPECTED_KIND",
            Self::DuplicateTypeName(_) => "DUPLICATE_TYPE_NAME",
            Self::ResolverMismatch { .. } => "RESOLVER_MISMATCH",
            Self::BuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
