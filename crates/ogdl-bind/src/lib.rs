//! OGDL native binding
//!
//! Exposes native Rust objects to OGDL templates. A [`LocalFunction`] binds
//! one registered class, then answers call nodes (a name plus argument
//! children) by reading a public field or by resolving and invoking the best
//! matching method at run time.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ogdl_bind::{ClassDescriptor, ClassRegistry, LocalFunction};
//! use ogdl_graph::{Graph, Value};
//!
//! #[derive(Default)]
//! struct Calc;
//!
//! let mut registry = ClassRegistry::new();
//! registry.register(
//!     ClassDescriptor::builder::<Calc>("demo.Calc")
//!         .constructor(|| Ok(Calc))
//!         .method2("add", |_c, a: i64, b: i64| Ok(a + b))
//!         .build()?,
//! );
//!
//! let calc = LocalFunction::new(Arc::new(registry), "demo.Calc", None);
//! let sum = calc.exec(&Graph::new("add").with_leaves(["1", "2"]));
//! assert_eq!(sum, Value::Long(3));
//! ```

#![warn(missing_docs)]

pub mod args;
pub mod binder;
pub mod class;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod function;
pub mod options;
pub mod registry;
pub mod types;

pub use args::{translate, ArgumentSet};
pub use binder::{bind, BoundInstance, FieldIndex, MethodTable};
pub use class::{
    ArgList, ClassBuilder, ClassDescriptor, ConstructorDescriptor, FieldDescriptor,
    MethodDescriptor, NativeInstance,
};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, LogSink, NullSink, Severity};
pub use dispatch::{resolve_method, Resolution};
pub use error::{BindError, DispatchError, FailureKind, InvokeError, RegistryError};
pub use function::{BindState, LocalFunction, LocalFunctionBuilder};
pub use options::{BindOptions, OptionsError};
pub use registry::ClassRegistry;
pub use types::{classify, is_assignable, ClassHierarchy, FlatHierarchy, NativeType, ParamType};
