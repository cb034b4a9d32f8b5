//! Dynamic values flowing between templates and native objects
//!
//! Scalars are stored inline. Unreduced nodes travel as owned [`Graph`]s and
//! host objects travel as [`ObjectRef`]s: a class name plus a shared payload.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::node::{Graph, GraphNode};

/// Dynamic value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 64-bit float
    Double(f64),
    /// String
    Str(String),
    /// Ordered list of values
    List(Vec<Value>),
    /// Unreduced graph node
    Node(Graph),
    /// Host object
    Object(ObjectRef),
}

impl Value {
    /// Name of the runtime kind, for diagnostics
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Node(_) => "node",
            Value::Object(obj) => obj.class_name(),
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract an integral value (int or long)
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i as i64),
            Value::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// Extract double value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Borrow string contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow node
    pub fn as_node(&self) -> Option<&Graph> {
        match self {
            Value::Node(g) => Some(g),
            _ => None,
        }
    }

    /// Borrow host object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Value::Null"),
            Value::Bool(b) => write!(f, "Value::Bool({})", b),
            Value::Int(i) => write!(f, "Value::Int({})", i),
            Value::Long(l) => write!(f, "Value::Long({})", l),
            Value::Double(d) => write!(f, "Value::Double({})", d),
            Value::Str(s) => write!(f, "Value::Str({:?})", s),
            Value::List(items) => f.debug_tuple("Value::List").field(items).finish(),
            Value::Node(g) => write!(f, "Value::Node({:?})", g.name()),
            Value::Object(o) => write!(f, "Value::Object({})", o.class_name()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}", l),
            Value::Double(d) => write!(f, "{}", d),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Node(g) => write!(f, "{}", g.name()),
            Value::Object(o) => write!(f, "{}@{:p}", o.class_name(), Arc::as_ptr(&o.data)),
        }
    }
}

// ============================================================================
// ObjectRef
// ============================================================================

/// Shared reference to a host object.
///
/// The class name is what argument classification sees; the payload is only
/// reachable through [`ObjectRef::downcast_ref`].
#[derive(Clone)]
pub struct ObjectRef {
    class: Arc<str>,
    data: Arc<dyn Any + Send + Sync>,
}

impl ObjectRef {
    /// Wrap a host value under the given class name
    pub fn new<T: Any + Send + Sync>(class: impl Into<Arc<str>>, value: T) -> Self {
        Self {
            class: class.into(),
            data: Arc::new(value),
        }
    }

    /// Class name
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// Borrow the payload as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef").field("class", &self.class).finish()
    }
}
