//! Evaluator seam for reducing argument nodes to scalars
//!
//! Dispatchers never interpret argument nodes themselves; they hand each
//! child to an [`Evaluator`]. A node that cannot be reduced comes back as
//! [`Value::Node`].

use crate::node::{Graph, GraphNode};
use crate::value::Value;

/// Reduces a node to a scalar value.
///
/// Implementations must be pure with respect to the node: the same node
/// evaluates to the same value and is never mutated.
pub trait Evaluator: Send + Sync {
    /// Evaluate `node` to a scalar, or return it as `Value::Node` if irreducible
    fn to_scalar(&self, node: &dyn GraphNode) -> Value;
}

impl<F> Evaluator for F
where
    F: Fn(&dyn GraphNode) -> Value + Send + Sync,
{
    fn to_scalar(&self, node: &dyn GraphNode) -> Value {
        self(node)
    }
}

/// Literal evaluator for leaf nodes.
///
/// - integer literal → `Long`
/// - float literal → `Double`
/// - `true` / `false` → `Bool`
/// - `null` → `Null`
/// - `"text"` or `'text'` → `Str` without the quotes
/// - any other leaf → `Str(name)`
/// - a node with children → `Node` (unreduced)
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarEvaluator;

impl ScalarEvaluator {
    /// Parse a single literal token
    pub fn parse_literal(token: &str) -> Value {
        match token {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            "null" => return Value::Null,
            _ => {}
        }

        if let Some(inner) = unquote(token) {
            return Value::Str(inner.to_string());
        }

        if let Ok(l) = token.parse::<i64>() {
            return Value::Long(l);
        }

        // Require a digit so that words like "inf" or "NaN" stay strings
        if token.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(d) = token.parse::<f64>() {
                return Value::Double(d);
            }
        }

        Value::Str(token.to_string())
    }
}

impl Evaluator for ScalarEvaluator {
    fn to_scalar(&self, node: &dyn GraphNode) -> Value {
        if node.is_empty() {
            Self::parse_literal(node.name())
        } else {
            Value::Node(Graph::from_node(node))
        }
    }
}

fn unquote(token: &str) -> Option<&str> {
    let bytes = token.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
    if (first == b'"' || first == b'\'') && first == last {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}
