//! OGDL graph model
//!
//! The data-model side of template function calls: the read-only node
//! interface, an owned node type, dynamic values, value conversions and the
//! evaluator seam that reduces argument nodes to scalars.
//!
//! # Example
//!
//! ```ignore
//! use ogdl_graph::{Evaluator, Graph, ScalarEvaluator, Value};
//!
//! let call = Graph::new("add").with_leaves(["1", "2.5"]);
//! let args: Vec<Value> = call.children().map(|c| ScalarEvaluator.to_scalar(c)).collect();
//! assert_eq!(args, vec![Value::Long(1), Value::Double(2.5)]);
//! ```

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod eval;
pub mod node;
pub mod value;

pub use convert::{FromValue, IntoValue};
pub use error::{ConvertError, ConvertResult};
pub use eval::{Evaluator, ScalarEvaluator};
pub use node::{Children, Graph, GraphNode};
pub use value::{ObjectRef, Value};
