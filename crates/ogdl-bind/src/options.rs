//! Component options
//!
//! Options can be built in code or read from a TOML table:
//!
//! ```toml
//! max_args = 10
//! close_method = "close"
//! close_on_drop = true
//! field_access = true
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading options
#[derive(Debug, Error)]
pub enum OptionsError {
    /// Failed to parse TOML
    #[error("Failed to parse options: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize options
    #[error("Failed to serialize options: {0}")]
    SerializeError(String),

    /// Validation error
    #[error("Invalid options: {0}")]
    ValidationError(String),
}

/// Behaviour switches for a bound component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindOptions {
    /// Per-call argument bound; `None` means unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_args: Option<usize>,

    /// Name of the teardown method dispatched by `close()`
    pub close_method: String,

    /// Dispatch the teardown method when the component is dropped
    pub close_on_drop: bool,

    /// Zero-argument calls read a public field of the same name first
    pub field_access: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            max_args: None,
            close_method: "close".to_string(),
            close_on_drop: true,
            field_access: true,
        }
    }
}

impl BindOptions {
    /// Parse options from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, OptionsError> {
        let options: BindOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Serialize options to TOML
    pub fn to_toml_string(&self) -> Result<String, OptionsError> {
        toml::to_string_pretty(self).map_err(|e| OptionsError::SerializeError(e.to_string()))
    }

    /// Validate option values
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.close_method.trim().is_empty() {
            return Err(OptionsError::ValidationError(
                "close_method must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder-style: bound the argument count per call
    pub fn with_max_args(mut self, max: usize) -> Self {
        self.max_args = Some(max);
        self
    }

    /// Builder-style: rename the teardown method
    pub fn with_close_method(mut self, name: impl Into<String>) -> Self {
        self.close_method = name.into();
        self
    }

    /// Builder-style: enable or disable teardown on drop
    pub fn with_close_on_drop(mut self, enabled: bool) -> Self {
        self.close_on_drop = enabled;
        self
    }

    /// Builder-style: enable or disable the field-access short-circuit
    pub fn with_field_access(mut self, enabled: bool) -> Self {
        self.field_access = enabled;
        self
    }
}
