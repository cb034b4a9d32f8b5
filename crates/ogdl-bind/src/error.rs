//! Error types for binding and dispatch

use ogdl_graph::ConvertError;

use crate::types::{format_types, ParamType};

/// Errors raised at the native boundary (constructors, getters, methods)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvokeError {
    /// Argument could not be converted to the handler's Rust type
    #[error("argument {index}: {source}")]
    Argument {
        /// Zero-based argument position
        index: usize,
        /// Underlying conversion error
        #[source]
        source: ConvertError,
    },

    /// Handler received the wrong number of arguments
    #[error("expected {expected} arguments, got {got}")]
    Arity {
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Bound instance is not of the type the handler was registered for
    #[error("receiver is not a {expected}")]
    ReceiverMismatch {
        /// Rust type name the handler expects
        expected: &'static str,
    },

    /// Native code reported a failure
    #[error("{0}")]
    Failed(String),

    /// Native code panicked
    #[error("panicked: {0}")]
    Panic(String),
}

impl InvokeError {
    /// Shorthand for [`InvokeError::Failed`]
    pub fn failed(message: impl Into<String>) -> Self {
        InvokeError::Failed(message.into())
    }
}

/// Construction-time failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    /// No class registered under the requested name
    #[error("class {type_name} not found")]
    TypeNotFound {
        /// Requested class name
        type_name: String,
    },

    /// Neither a config constructor nor a zero-argument constructor applies
    #[error("class {type_name} has no usable constructor")]
    NoUsableConstructor {
        /// Class name
        type_name: String,
    },

    /// Component options failed validation
    #[error("invalid options for {type_name}: {reason}")]
    InvalidOptions {
        /// Class name
        type_name: String,
        /// Validation message
        reason: String,
    },

    /// Selected constructor failed
    #[error("class {type_name} could not be instantiated: {source}")]
    ConstructorFailed {
        /// Class name
        type_name: String,
        /// Native failure
        #[source]
        source: InvokeError,
    },
}

/// Kinds of failure, kept distinct for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Binding failed while the component was built
    Construction,
    /// Call on a component whose binding failed
    Unusable,
    /// No field or method matches the call
    Resolution,
    /// Resolved member failed while running
    Invocation,
    /// Call exceeds the configured argument bound
    ArgumentLimit,
    /// An argument node could not be evaluated
    Evaluation,
}

/// Per-call failures returned by `LocalFunction::invoke`
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// The component has no instance; binding failed at construction
    #[error("cannot execute {type_name}: no instance could be created ({cause})")]
    Unusable {
        /// Class name the component was built for
        type_name: String,
        /// Recorded construction failure
        cause: BindError,
    },

    /// No field and no method matches name, arity and argument types
    #[error("No method {name}({}) found in class {class}", format_types(.arg_types))]
    NoSuchMethod {
        /// Call name
        name: String,
        /// Classified argument types
        arg_types: Vec<ParamType>,
        /// Bound class name
        class: String,
    },

    /// A field or method was found but failed
    #[error("{signature} failed: {source}")]
    Invocation {
        /// `Class.member(types)` of the failing member
        signature: String,
        /// Native failure
        #[source]
        source: InvokeError,
    },

    /// The evaluator failed on an argument node
    #[error("argument {index} of {name} could not be evaluated: {source}")]
    Evaluation {
        /// Call name
        name: String,
        /// Zero-based argument position
        index: usize,
        /// Evaluator failure
        #[source]
        source: InvokeError,
    },

    /// Call has more arguments than `BindOptions::max_args` allows
    #[error("call {name} has {given} arguments, at most {max} allowed")]
    TooManyArguments {
        /// Call name
        name: String,
        /// Supplied argument count
        given: usize,
        /// Configured bound
        max: usize,
    },
}

impl DispatchError {
    /// Failure kind for diagnostics
    pub fn kind(&self) -> FailureKind {
        match self {
            DispatchError::Unusable { .. } => FailureKind::Unusable,
            DispatchError::NoSuchMethod { .. } => FailureKind::Resolution,
            DispatchError::Invocation { .. } => FailureKind::Invocation,
            DispatchError::TooManyArguments { .. } => FailureKind::ArgumentLimit,
            DispatchError::Evaluation { .. } => FailureKind::Evaluation,
        }
    }
}

/// Errors raised while describing a class
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two methods share name and parameter list
    #[error("duplicate method {signature} in class {class}")]
    DuplicateMethod {
        /// Class name
        class: String,
        /// `name(types)` of the duplicate
        signature: String,
    },

    /// Two fields share a name
    #[error("duplicate field {name} in class {class}")]
    DuplicateField {
        /// Class name
        class: String,
        /// Field name
        name: String,
    },

    /// Two constructors share a parameter list
    #[error("duplicate constructor ({}) in class {class}", format_types(.params))]
    DuplicateConstructor {
        /// Class name
        class: String,
        /// Parameter list
        params: Vec<ParamType>,
    },
}
