//! Conversion traits between [`Value`] and Rust types.
//!
//! `FromValue` is fallible and used when native handlers pull typed
//! arguments; `IntoValue` is total and used for results.

use crate::error::{ConvertError, ConvertResult};
use crate::node::Graph;
use crate::value::{ObjectRef, Value};

/// Convert from a borrowed [`Value`] to a Rust type.
pub trait FromValue: Sized {
    /// Convert, returning an error if the kind doesn't match
    fn from_value(value: &Value) -> ConvertResult<Self>;
}

/// Convert from a Rust type into a [`Value`].
pub trait IntoValue {
    /// Convert to Value
    fn into_value(self) -> Value;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        value.as_bool().ok_or_else(|| ConvertError::mismatch("boolean", value))
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        value.as_i64().ok_or_else(|| ConvertError::mismatch("long", value))
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        match value {
            Value::Int(i) => Ok(*i),
            Value::Long(l) => i32::try_from(*l).map_err(|_| ConvertError::OutOfRange {
                value: *l,
                target: "int",
            }),
            other => Err(ConvertError::mismatch("int", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        value.as_f64().ok_or_else(|| ConvertError::mismatch("double", value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ConvertError::mismatch("string", value))
    }
}

impl FromValue for Graph {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        value
            .as_node()
            .cloned()
            .ok_or_else(|| ConvertError::mismatch("node", value))
    }
}

impl FromValue for ObjectRef {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        value
            .as_object()
            .cloned()
            .ok_or_else(|| ConvertError::mismatch("object", value))
    }
}

impl FromValue for Vec<Value> {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        match value {
            Value::List(items) => Ok(items.clone()),
            other => Err(ConvertError::mismatch("list", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> ConvertResult<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

// ============================================================================
// IntoValue
// ============================================================================

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Null
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Long(self)
    }
}

impl IntoValue for usize {
    fn into_value(self) -> Value {
        // Saturate rather than wrap
        Value::Long(i64::try_from(self).unwrap_or(i64::MAX))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Str(self.to_string())
    }
}

impl IntoValue for Graph {
    fn into_value(self) -> Value {
        Value::Node(self)
    }
}

impl IntoValue for ObjectRef {
    fn into_value(self) -> Value {
        Value::Object(self)
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}
