//! Argument translation
//!
//! Evaluates each child of a call node and classifies the result for
//! method lookup. The argument set is rebuilt for every call.

use ogdl_graph::{Children, Evaluator, GraphNode, Value};

use crate::class::guarded;
use crate::error::DispatchError;
use crate::types::{classify, ParamType};

/// Translated arguments of one call: classified types and values, in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentSet {
    types: Vec<ParamType>,
    values: Vec<Value>,
}

impl ArgumentSet {
    /// Empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already evaluated value
    pub fn push(&mut self, value: Value) {
        self.types.push(classify(&value));
        self.values.push(value);
    }

    /// Classified types
    pub fn types(&self) -> &[ParamType] {
        &self.types
    }

    /// Argument values
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// `(type, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&ParamType, &Value)> {
        self.types.iter().zip(self.values.iter())
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for zero-argument calls
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<Value> for ArgumentSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ArgumentSet::new();
        for value in iter {
            set.push(value);
        }
        set
    }
}

/// Evaluate and classify every child of `call`.
///
/// `max_args` bounds the child count; `None` leaves it unbounded.
pub fn translate(
    call: &dyn GraphNode,
    evaluator: &dyn Evaluator,
    max_args: Option<usize>,
) -> Result<ArgumentSet, DispatchError> {
    let given = call.len();
    if let Some(max) = max_args {
        if given > max {
            return Err(DispatchError::TooManyArguments {
                name: call.name().to_string(),
                given,
                max,
            });
        }
    }

    let mut args = ArgumentSet::new();
    for (index, child) in Children::of(call).enumerate() {
        let value = guarded(|| Ok(evaluator.to_scalar(child))).map_err(|source| {
            DispatchError::Evaluation {
                name: call.name().to_string(),
                index,
                source,
            }
        })?;
        args.push(value);
    }

    for (i, (ty, value)) in args.iter().enumerate() {
        log::trace!("{} arg {}: {:?} -> {}", call.name(), i, value, ty);
    }

    Ok(args)
}
