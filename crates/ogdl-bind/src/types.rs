//! Parameter types, argument classification and assignability
//!
//! Implements the relation `declared ⊒ actual` used by the widened method
//! lookup. Primitives are only assignable to themselves and to `object`;
//! class types follow declared supertypes.

use std::fmt;
use std::sync::Arc;

use ogdl_graph::{Graph, ObjectRef, Value};
use rustc_hash::FxHashSet;

/// Declared parameter type or classified argument type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// `boolean`
    Boolean,
    /// `int` (32-bit); declared only, integral arguments classify as `long`
    Int,
    /// `long` (64-bit)
    Long,
    /// `double`
    Double,
    /// `string`
    Str,
    /// `list`
    List,
    /// Graph node
    Node,
    /// Type of the null value; classification only
    Null,
    /// Top type: accepts every argument
    Object,
    /// Host class, by registered name
    Class(Arc<str>),
}

impl ParamType {
    /// Host class type
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        ParamType::Class(name.into())
    }

    /// Primitive types cannot hold null
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ParamType::Boolean | ParamType::Int | ParamType::Long | ParamType::Double
        )
    }

    /// Name used in signatures and failure messages
    pub fn name(&self) -> &str {
        match self {
            ParamType::Boolean => "boolean",
            ParamType::Int => "int",
            ParamType::Long => "long",
            ParamType::Double => "double",
            ParamType::Str => "string",
            ParamType::List => "list",
            ParamType::Node => "node",
            ParamType::Null => "null",
            ParamType::Object => "object",
            ParamType::Class(name) => name,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify an evaluated argument.
///
/// Precedence: float → `double`, integral → `long`, boolean → `boolean`,
/// unreduced node → `node`, anything else → its own runtime type.
pub fn classify(value: &Value) -> ParamType {
    match value {
        Value::Double(_) => ParamType::Double,
        Value::Int(_) | Value::Long(_) => ParamType::Long,
        Value::Bool(_) => ParamType::Boolean,
        Value::Node(_) => ParamType::Node,
        Value::Str(_) => ParamType::Str,
        Value::List(_) => ParamType::List,
        Value::Object(obj) => ParamType::class(obj.class_name()),
        Value::Null => ParamType::Null,
    }
}

// ============================================================================
// Assignability
// ============================================================================

/// Source of declared supertypes for host classes
pub trait ClassHierarchy {
    /// Direct supertypes of `class`; empty when unknown
    fn supertypes(&self, class: &str) -> &[String];
}

/// Hierarchy with no declared supertypes
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatHierarchy;

impl ClassHierarchy for FlatHierarchy {
    fn supertypes(&self, _class: &str) -> &[String] {
        &[]
    }
}

/// Check whether an argument of type `actual` may be passed where
/// `declared` is expected.
pub fn is_assignable(declared: &ParamType, actual: &ParamType, hierarchy: &dyn ClassHierarchy) -> bool {
    // Reflexivity
    if declared == actual {
        return true;
    }

    match (declared, actual) {
        (ParamType::Object, _) => true,

        // null fits any reference slot
        (d, ParamType::Null) => !d.is_primitive() && *d != ParamType::Null,

        (ParamType::Class(want), ParamType::Class(have)) => is_subclass(have, want, hierarchy),

        _ => false,
    }
}

/// Check whether `sub` reaches `sup` through declared supertypes.
pub fn is_subclass(sub: &str, sup: &str, hierarchy: &dyn ClassHierarchy) -> bool {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut pending = vec![sub];

    while let Some(class) = pending.pop() {
        if class == sup {
            return true;
        }
        if !seen.insert(class) {
            continue;
        }
        pending.extend(hierarchy.supertypes(class).iter().map(String::as_str));
    }

    false
}

// ============================================================================
// Native type mapping
// ============================================================================

/// Rust types that map to a declared parameter type
pub trait NativeType {
    /// Declared parameter type for this Rust type
    fn param_type() -> ParamType;
}

macro_rules! native_type {
    ($($ty:ty => $param:expr),* $(,)?) => {
        $(
            impl NativeType for $ty {
                fn param_type() -> ParamType {
                    $param
                }
            }
        )*
    };
}

native_type! {
    bool => ParamType::Boolean,
    i32 => ParamType::Int,
    i64 => ParamType::Long,
    f64 => ParamType::Double,
    String => ParamType::Str,
    Vec<Value> => ParamType::List,
    Graph => ParamType::Node,
    Value => ParamType::Object,
    ObjectRef => ParamType::Object,
}

// Only reference types are nullable; `Option<i64>` and friends have no
// declared type, since a primitive slot never accepts null.
native_type! {
    Option<String> => ParamType::Str,
    Option<Vec<Value>> => ParamType::List,
    Option<Graph> => ParamType::Node,
    Option<Value> => ParamType::Object,
    Option<ObjectRef> => ParamType::Object,
}

// ============================================================================
// Formatting
// ============================================================================

/// Comma-separated type list, e.g. `long,double`
pub fn format_types(types: &[ParamType]) -> String {
    let mut out = String::new();
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(ty.name());
    }
    out
}

/// `Class.member(types)`
pub fn format_signature(class: &str, member: &str, types: &[ParamType]) -> String {
    format!("{}.{}({})", class, member, format_types(types))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapHierarchy(HashMap<&'static str, Vec<String>>);

    impl ClassHierarchy for MapHierarchy {
        fn supertypes(&self, class: &str) -> &[String] {
            self.0.get(class).map(Vec::as_slice).unwrap_or(&[])
        }
    }

    fn shapes() -> MapHierarchy {
        let mut map = HashMap::new();
        map.insert("Square", vec!["Rect".to_string()]);
        map.insert("Rect", vec!["Shape".to_string(), "Drawable".to_string()]);
        // cycle must not hang the search
        map.insert("Shape", vec!["Square".to_string()]);
        MapHierarchy(map)
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify(&Value::Double(1.5)), ParamType::Double);
        assert_eq!(classify(&Value::Long(1)), ParamType::Long);
        assert_eq!(classify(&Value::Int(1)), ParamType::Long);
        assert_eq!(classify(&Value::Bool(true)), ParamType::Boolean);
        assert_eq!(classify(&Value::Node(Graph::new("n"))), ParamType::Node);
        assert_eq!(classify(&Value::Str("s".into())), ParamType::Str);
        assert_eq!(classify(&Value::List(vec![])), ParamType::List);
        assert_eq!(classify(&Value::Null), ParamType::Null);
        assert_eq!(
            classify(&Value::Object(ObjectRef::new("demo.Point", ()))),
            ParamType::class("demo.Point")
        );
    }

    #[test]
    fn test_primitives_do_not_widen() {
        let h = FlatHierarchy;
        assert!(is_assignable(&ParamType::Long, &ParamType::Long, &h));
        assert!(!is_assignable(&ParamType::Int, &ParamType::Long, &h));
        assert!(!is_assignable(&ParamType::Double, &ParamType::Long, &h));
        assert!(!is_assignable(&ParamType::Long, &ParamType::Double, &h));
    }

    #[test]
    fn test_object_accepts_everything() {
        let h = FlatHierarchy;
        for actual in [
            ParamType::Long,
            ParamType::Boolean,
            ParamType::Str,
            ParamType::Node,
            ParamType::Null,
            ParamType::class("demo.Point"),
        ] {
            assert!(is_assignable(&ParamType::Object, &actual, &h), "object <- {}", actual);
        }
    }

    #[test]
    fn test_null_fits_references_only() {
        let h = FlatHierarchy;
        assert!(is_assignable(&ParamType::Str, &ParamType::Null, &h));
        assert!(is_assignable(&ParamType::Node, &ParamType::Null, &h));
        assert!(is_assignable(&ParamType::class("X"), &ParamType::Null, &h));
        assert!(!is_assignable(&ParamType::Long, &ParamType::Null, &h));
        assert!(!is_assignable(&ParamType::Boolean, &ParamType::Null, &h));
    }

    #[test]
    fn test_class_supertypes() {
        let h = shapes();
        let square = ParamType::class("Square");
        assert!(is_assignable(&ParamType::class("Rect"), &square, &h));
        assert!(is_assignable(&ParamType::class("Drawable"), &square, &h));
        assert!(!is_assignable(&square, &ParamType::class("Rect"), &FlatHierarchy));
        assert!(!is_assignable(&ParamType::class("Circle"), &square, &h));
        assert!(!is_assignable(&ParamType::Str, &square, &h));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_types(&[]), "");
        assert_eq!(format_types(&[ParamType::Long, ParamType::Node]), "long,node");
        assert_eq!(
            format_signature("demo.Calc", "add", &[ParamType::Long, ParamType::Long]),
            "demo.Calc.add(long,long)"
        );
        assert_eq!(Option::<String>::param_type(), ParamType::Str);
    }

    #[test]
    fn test_nullable_parameters_accept_null() {
        for declared in [
            Option::<String>::param_type(),
            Option::<Vec<Value>>::param_type(),
            Option::<Graph>::param_type(),
            Option::<Value>::param_type(),
            Option::<ObjectRef>::param_type(),
        ] {
            assert!(!declared.is_primitive());
            assert!(is_assignable(&declared, &ParamType::Null, &FlatHierarchy), "{} <- null", declared);
        }
    }
}
