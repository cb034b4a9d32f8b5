//! A native object exposed as a template function
//!
//! A component is either **Bound** (it owns a live instance) or **Unbound**
//! (binding failed at construction). The state is decided once; an unbound
//! component answers every call with [`DispatchError::Unusable`] and never
//! retries the binding.
//!
//! The bound instance is locked for the duration of each field read or
//! method call, so overlapping calls from several threads are serialized.
//! Native handlers must not call back into the component that invoked them.

use std::sync::Arc;

use ogdl_graph::{Evaluator, Graph, GraphNode, ScalarEvaluator, Value};

use crate::binder::{bind, BoundInstance};
use crate::class::ClassDescriptor;
use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink, Severity};
use crate::dispatch::{dispatch, DispatchContext};
use crate::error::{BindError, DispatchError, FailureKind};
use crate::options::BindOptions;
use crate::registry::ClassRegistry;

/// Binding state of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    /// Construction succeeded
    Bound,
    /// Construction failed; every call fails
    Unbound,
}

enum Binding {
    Bound(BoundInstance),
    Unbound(BindError),
}

/// A bound native object answering call nodes.
pub struct LocalFunction {
    type_name: String,
    binding: Binding,
    registry: Arc<ClassRegistry>,
    evaluator: Arc<dyn Evaluator>,
    sink: Arc<dyn DiagnosticSink>,
    options: BindOptions,
    closed: bool,
}

impl LocalFunction {
    /// Bind `type_name` with default options, logging diagnostics.
    ///
    /// Never fails: a binding failure yields an unbound component.
    pub fn new(
        registry: Arc<ClassRegistry>,
        type_name: &str,
        config: Option<&dyn GraphNode>,
    ) -> Self {
        let mut builder = Self::builder(registry, type_name);
        if let Some(config) = config {
            builder = builder.config(config);
        }
        builder.build()
    }

    /// Start building a component
    pub fn builder<'c>(registry: Arc<ClassRegistry>, type_name: &str) -> LocalFunctionBuilder<'c> {
        LocalFunctionBuilder {
            registry,
            type_name: type_name.to_string(),
            config: None,
            options: BindOptions::default(),
            evaluator: Arc::new(ScalarEvaluator),
            sink: Arc::new(LogSink),
        }
    }

    /// Class name the component was built for
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Binding state
    pub fn state(&self) -> BindState {
        match self.binding {
            Binding::Bound(_) => BindState::Bound,
            Binding::Unbound(_) => BindState::Unbound,
        }
    }

    /// True when construction succeeded
    pub fn is_bound(&self) -> bool {
        self.state() == BindState::Bound
    }

    /// Construction failure of an unbound component
    pub fn construction_error(&self) -> Option<&BindError> {
        match &self.binding {
            Binding::Bound(_) => None,
            Binding::Unbound(err) => Some(err),
        }
    }

    /// Bound class descriptor
    pub fn class(&self) -> Option<&ClassDescriptor> {
        match &self.binding {
            Binding::Bound(bound) => Some(bound.class()),
            Binding::Unbound(_) => None,
        }
    }

    /// Public field names, sorted; empty when unbound
    pub fn field_names(&self) -> Vec<&str> {
        match &self.binding {
            Binding::Bound(bound) => bound.fields().names(),
            Binding::Unbound(_) => Vec::new(),
        }
    }

    /// Method signatures in table order; empty when unbound
    pub fn methods(&self) -> Vec<String> {
        match &self.binding {
            Binding::Bound(bound) => bound.methods().iter().map(|m| m.signature()).collect(),
            Binding::Unbound(_) => Vec::new(),
        }
    }

    /// Options in effect
    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    /// True once `close()` has run
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Dispatch `call`: field access first, then method resolution.
    ///
    /// Failures are returned and also reported to the diagnostic sink.
    pub fn invoke(&self, call: &dyn GraphNode) -> Result<Value, DispatchError> {
        self.invoke_inner(call).map_err(|err| {
            let severity = match err.kind() {
                FailureKind::Unusable => Severity::Error,
                _ => Severity::Warning,
            };
            self.sink
                .report(Diagnostic::new(severity, err.kind(), err.to_string()));
            err
        })
    }

    /// Dispatch `call`, turning any failure into a descriptive string value.
    ///
    /// This is the form template pipelines use: one unresolved call
    /// renders as its message instead of aborting the whole template.
    pub fn exec(&self, call: &dyn GraphNode) -> Value {
        self.invoke(call)
            .unwrap_or_else(|err| Value::Str(err.to_string()))
    }

    fn invoke_inner(&self, call: &dyn GraphNode) -> Result<Value, DispatchError> {
        let bound = match &self.binding {
            Binding::Bound(bound) => bound,
            Binding::Unbound(cause) => {
                return Err(DispatchError::Unusable {
                    type_name: self.type_name.clone(),
                    cause: cause.clone(),
                })
            }
        };

        if log::log_enabled!(log::Level::Debug) {
            log::debug!("input\n{}", Graph::from_node(call));
        }

        let ctx = DispatchContext {
            hierarchy: self.registry.as_ref(),
            evaluator: self.evaluator.as_ref(),
            options: &self.options,
        };
        dispatch(bound, call, &ctx)
    }

    /// Release the component.
    ///
    /// Dispatches a zero-argument call named after `BindOptions::close_method`
    /// exactly once. A class without such a method is left alone; a failing
    /// teardown is reported to the sink.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if !self.is_bound() {
            log::trace!("{}: close on unbound component ignored", self.type_name);
            return;
        }

        let call = Graph::new(self.options.close_method.as_str());
        match self.invoke_inner(&call) {
            Ok(_) => log::debug!("{}: closed", self.type_name),
            Err(DispatchError::NoSuchMethod { .. }) => {
                log::trace!("{}: no {}() to call", self.type_name, self.options.close_method);
            }
            Err(err) => {
                self.sink
                    .report(Diagnostic::new(Severity::Warning, err.kind(), err.to_string()));
            }
        }
    }
}

impl Drop for LocalFunction {
    fn drop(&mut self) {
        if self.options.close_on_drop {
            self.close();
        }
    }
}

impl std::fmt::Debug for LocalFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFunction")
            .field("type_name", &self.type_name)
            .field("state", &self.state())
            .field("closed", &self.closed)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`LocalFunction`]
pub struct LocalFunctionBuilder<'c> {
    registry: Arc<ClassRegistry>,
    type_name: String,
    config: Option<&'c dyn GraphNode>,
    options: BindOptions,
    evaluator: Arc<dyn Evaluator>,
    sink: Arc<dyn DiagnosticSink>,
}

impl<'c> LocalFunctionBuilder<'c> {
    /// Configuration node handed to the config constructor
    pub fn config(mut self, config: &'c dyn GraphNode) -> Self {
        self.config = Some(config);
        self
    }

    /// Component options
    pub fn options(mut self, options: BindOptions) -> Self {
        self.options = options;
        self
    }

    /// Evaluator used to reduce argument nodes
    pub fn evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Diagnostic sink
    pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Build, recording a binding failure as an unbound component.
    ///
    /// Options are validated first; invalid options leave the component
    /// unbound without instantiating the class.
    pub fn build(self) -> LocalFunction {
        let bound = self
            .options
            .validate()
            .map_err(|err| BindError::InvalidOptions {
                type_name: self.type_name.clone(),
                reason: err.to_string(),
            })
            .and_then(|()| bind(&self.registry, &self.type_name, self.config));

        let binding = match bound {
            Ok(bound) => Binding::Bound(bound),
            Err(err) => {
                self.sink.report(Diagnostic::new(
                    Severity::Error,
                    FailureKind::Construction,
                    err.to_string(),
                ));
                Binding::Unbound(err)
            }
        };

        LocalFunction {
            type_name: self.type_name,
            binding,
            registry: self.registry,
            evaluator: self.evaluator,
            sink: self.sink,
            options: self.options,
            closed: false,
        }
    }

    /// Build, returning the binding failure instead of an unbound component
    pub fn try_build(self) -> Result<LocalFunction, BindError> {
        let function = self.build();
        match function.construction_error() {
            Some(err) => Err(err.clone()),
            None => Ok(function),
        }
    }
}
