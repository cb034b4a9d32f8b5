//! Error types for value conversion

/// Result type for value conversions
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Value conversion errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    /// Value has the wrong runtime kind
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Integral value does not fit the target type
    #[error("Value {value} out of range for {target}")]
    OutOfRange {
        /// Offending value
        value: i64,
        /// Target type name
        target: &'static str,
    },
}

impl ConvertError {
    pub(crate) fn mismatch(expected: &str, got: &crate::Value) -> Self {
        ConvertError::TypeMismatch {
            expected: expected.to_string(),
            got: got.type_name().to_string(),
        }
    }
}
