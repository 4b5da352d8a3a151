//! Schema configuration.
//!
//! Limits and switches applied to every schema the assembler builds. The
//! configuration can be embedded in an application's TOML file.
//!
//! # Example Configuration
//!
//! ```toml
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! event_buffer_size = 1024
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Schema assembly configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Maximum query depth allowed.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,

    /// Number of published events buffered for slow subscribers.
    /// Default: 1024
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

fn default_event_buffer_size() -> usize {
    1024
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
            event_buffer_size: default_event_buffer_size(),
        }
    }
}

impl SchemaConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value is invalid.
    pub fn from_toml_str(text: &str) -> Result<Self, SchemaError> {
        let config: Self =
            toml::from_str(text).map_err(|e| SchemaError::InvalidConfig(e.to_string()))?;
        config.validate().map_err(SchemaError::InvalidConfig)?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("max_depth must be > 0".into());
        }
        if self.max_complexity == 0 {
            return Err("max_complexity must be > 0".into());
        }
        if self.event_buffer_size == 0 {
            return Err("event_buffer_size must be > 0".into());
        }
        Ok(())
    }
}
