//! Schema metadata attached to declarations through annotation layers.

use serde_json::Value;

use crate::declaration::{Declaration, Fields, Kind};

/// Metadata carried by one annotation layer.
///
/// Every entry is optional; lookups fall through to inner layers for entries
/// a layer leaves unset.
#[derive(Clone, Default)]
pub struct Metadata {
    /// GraphQL type name.
    pub name: Option<String>,
    pub description: Option<String>,
    /// Default value for an argument or input field.
    pub default_value: Option<Value>,
    /// Interfaces an object type implements.
    pub interfaces: Vec<Declaration>,
    /// Arguments of a function field.
    pub args: Option<Fields>,
    /// Payload type announced by a mutation on its subscription channel.
    pub publish: Option<Declaration>,
    /// Marks a struct as a GraphQL input object.
    pub input: Option<bool>,
    /// Set on layers describing one field or argument use of a type.
    /// Type-level lookups skip these layers.
    pub field_level: bool,
}

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A layer describing a field or argument rather than its type.
    #[must_use]
    pub fn for_field() -> Self {
        Self {
            field_level: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().with_name(name)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_interfaces(mut self, interfaces: impl IntoIterator<Item = Declaration>) -> Self {
        self.interfaces = interfaces.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: Fields) -> Self {
        self.args = Some(args);
        self
    }

    #[must_use]
    pub fn with_publish(mut self, publish: Declaration) -> Self {
        self.publish = Some(publish);
        self
    }

    #[must_use]
    pub fn as_input(mut self) -> Self {
        self.input = Some(true);
        self
    }
}

impl Declaration {
    /// Display name: the nearest annotated name, or the scalar name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.lookup(|m| m.name.as_deref())
            .or_else(|| match self.kind() {
                Kind::Scalar(name) => Some(name.as_str()),
                _ => None,
            })
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.lookup(|m| m.description.as_deref())
    }

    /// Description of the type itself, ignoring field and argument layers.
    #[must_use]
    pub fn type_description(&self) -> Option<&str> {
        self.lookup(|m| {
            if m.field_level {
                None
            } else {
                m.description.as_deref()
            }
        })
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.lookup(|m| m.default_value.as_ref())
    }

    #[must_use]
    pub fn interfaces(&self) -> &[Declaration] {
        self.lookup(|m| (!m.interfaces.is_empty()).then_some(m.interfaces.as_slice()))
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn args(&self) -> Option<&Fields> {
        self.lookup(|m| m.args.as_ref())
    }

    #[must_use]
    pub fn publish(&self) -> Option<&Declaration> {
        self.lookup(|m| m.publish.as_ref())
    }

    #[must_use]
    pub fn is_input(&self) -> bool {
        self.lookup(|m| m.input.as_ref()).copied().unwrap_or(false)
    }

    /// Shorthand for annotating with a name.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Declaration {
        self.annotate(Metadata::named(name))
    }

    /// Shorthand for annotating with a description.
    #[must_use]
    pub fn with_description(&self, description: impl Into<String>) -> Declaration {
        self.annotate(Metadata::new().with_description(description))
    }

    /// Adds implemented interfaces to an object declaration.
    #[must_use]
    pub fn implementing(&self, interfaces: impl IntoIterator<Item = Declaration>) -> Declaration {
        self.annotate(Metadata::new().with_interfaces(interfaces))
    }
}
