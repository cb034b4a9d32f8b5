//! Dispatcher: field access, method resolution and invocation
//!
//! Resolution runs in two phases over the bound method table:
//!
//! 1. **exact**: name, arity and every parameter type identical to the
//!    classified argument types;
//! 2. **widened**: the first method in declaration order whose name and
//!    arity match and whose declared parameter types each accept the
//!    corresponding argument type.
//!
//! Phase 2 picks the first admissible overload, not the most specific one.
//! Callers should not depend on which of several admissible overloads wins.

use std::sync::Arc;

use ogdl_graph::{Evaluator, GraphNode, Value};

use crate::args::translate;
use crate::binder::BoundInstance;
use crate::class::MethodDescriptor;
use crate::error::DispatchError;
use crate::options::BindOptions;
use crate::types::{format_signature, is_assignable, ClassHierarchy, ParamType};

/// How a method was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Parameter types identical to the argument types
    Exact,
    /// Parameter types accept the argument types
    Widened,
}

/// Find the method to call for `name` with argument types `args`.
pub fn resolve_method<'a>(
    methods: &'a [Arc<MethodDescriptor>],
    name: &str,
    args: &[ParamType],
    hierarchy: &dyn ClassHierarchy,
) -> Option<(&'a Arc<MethodDescriptor>, Resolution)> {
    if let Some(exact) = methods
        .iter()
        .find(|m| m.name() == name && m.params() == args)
    {
        return Some((exact, Resolution::Exact));
    }

    methods
        .iter()
        .find(|m| {
            m.name() == name
                && m.arity() == args.len()
                && m
                    .params()
                    .iter()
                    .zip(args)
                    .all(|(declared, actual)| is_assignable(declared, actual, hierarchy))
        })
        .map(|m| (m, Resolution::Widened))
}

/// Everything a dispatch needs besides the bound instance
pub(crate) struct DispatchContext<'a> {
    pub hierarchy: &'a dyn ClassHierarchy,
    pub evaluator: &'a dyn Evaluator,
    pub options: &'a BindOptions,
}

/// Dispatch one call node on `bound`.
pub(crate) fn dispatch(
    bound: &BoundInstance,
    call: &dyn GraphNode,
    ctx: &DispatchContext<'_>,
) -> Result<Value, DispatchError> {
    let name = call.name();
    let class = bound.class.name();

    // Field access takes precedence over zero-argument methods
    if ctx.options.field_access && call.is_empty() {
        if let Some(field) = bound.fields.get(name) {
            log::trace!("{}: field access {}", class, name);
            let instance = bound.instance.lock();
            return field
                .get(&**instance)
                .map_err(|source| DispatchError::Invocation {
                    signature: format!("{}.{}", class, name),
                    source,
                });
        }
    }

    let args = translate(call, ctx.evaluator, ctx.options.max_args)?;

    let (method, resolution) = resolve_method(&bound.methods, name, args.types(), ctx.hierarchy)
        .ok_or_else(|| DispatchError::NoSuchMethod {
            name: name.to_string(),
            arg_types: args.types().to_vec(),
            class: class.to_string(),
        })?;

    let mut instance = bound.instance.lock();
    let result = method.invoke(&mut **instance, args.values());
    drop(instance);

    match result {
        Ok(value) => {
            log::debug!(
                "invoked: {} as {} ({:?})",
                format_signature(class, name, args.types()),
                method.signature(),
                resolution
            );
            Ok(value)
        }
        Err(source) => Err(DispatchError::Invocation {
            signature: format_signature(class, name, method.params()),
            source,
        }),
    }
}
