//! Class descriptors describing what a bindable native type exposes
//!
//! A [`ClassDescriptor`] lists what a bound object exposes: constructors,
//! public fields and public methods, each with its declared parameter types
//! and a type-erased handler. Descriptors are built once with
//! [`ClassBuilder`] and shared read-only afterwards.

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use ogdl_graph::{ConvertError, FromValue, Graph, IntoValue, Value};

use crate::error::{InvokeError, RegistryError};
use crate::types::{format_types, NativeType, ParamType};

/// A live native object owned by a bound component
pub type NativeInstance = Box<dyn Any + Send>;

type CtorFn = dyn Fn(ArgList<'_>) -> Result<NativeInstance, InvokeError> + Send + Sync;
type GetterFn = dyn Fn(&(dyn Any + Send)) -> Result<Value, InvokeError> + Send + Sync;
type MethodFn = dyn Fn(&mut (dyn Any + Send), ArgList<'_>) -> Result<Value, InvokeError> + Send + Sync;

// ============================================================================
// ArgList
// ============================================================================

/// Borrowed view of translated call arguments.
#[derive(Clone, Copy)]
pub struct ArgList<'a> {
    values: &'a [Value],
}

impl<'a> ArgList<'a> {
    /// Wrap a slice of argument values
    pub fn new(values: &'a [Value]) -> Self {
        Self { values }
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no arguments
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw argument at `index`
    pub fn value(&self, index: usize) -> Result<&'a Value, InvokeError> {
        self.values.get(index).ok_or(InvokeError::Arity {
            expected: index + 1,
            got: self.values.len(),
        })
    }

    /// Argument at `index` converted to `T`
    pub fn get<T: FromValue>(&self, index: usize) -> Result<T, InvokeError> {
        T::from_value(self.value(index)?).map_err(|source| InvokeError::Argument { index, source })
    }

    /// All arguments
    pub fn as_slice(&self) -> &'a [Value] {
        self.values
    }
}

/// Run native code, turning a panic into [`InvokeError::Panic`].
pub(crate) fn guarded<R>(f: impl FnOnce() -> Result<R, InvokeError>) -> Result<R, InvokeError> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|panic| {
        let msg = if let Some(s) = panic.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        Err(InvokeError::Panic(msg))
    })
}

// ============================================================================
// Member descriptors
// ============================================================================

/// Constructor entry
pub struct ConstructorDescriptor {
    params: Vec<ParamType>,
    ctor: Box<CtorFn>,
}

impl ConstructorDescriptor {
    /// Declared parameter types
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// Create a new instance
    pub fn instantiate(&self, args: &[Value]) -> Result<NativeInstance, InvokeError> {
        if args.len() != self.params.len() {
            return Err(InvokeError::Arity {
                expected: self.params.len(),
                got: args.len(),
            });
        }
        guarded(|| (self.ctor)(ArgList::new(args)))
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstructorDescriptor({})", format_types(&self.params))
    }
}

/// Public field entry
pub struct FieldDescriptor {
    name: String,
    getter: Box<GetterFn>,
}

impl FieldDescriptor {
    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the field's current value
    pub fn get(&self, instance: &(dyn Any + Send)) -> Result<Value, InvokeError> {
        guarded(|| (self.getter)(instance))
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldDescriptor({})", self.name)
    }
}

/// Public method entry
pub struct MethodDescriptor {
    name: String,
    params: Vec<ParamType>,
    handler: Box<MethodFn>,
}

impl MethodDescriptor {
    /// Method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter types, in order
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// Parameter count
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// `name(types)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, format_types(&self.params))
    }

    /// Call the method on `receiver`
    pub fn invoke(&self, receiver: &mut (dyn Any + Send), args: &[Value]) -> Result<Value, InvokeError> {
        if args.len() != self.params.len() {
            return Err(InvokeError::Arity {
                expected: self.params.len(),
                got: args.len(),
            });
        }
        guarded(|| (self.handler)(receiver, ArgList::new(args)))
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodDescriptor({})", self.signature())
    }
}

// ============================================================================
// ClassDescriptor
// ============================================================================

/// Everything a bindable class exposes.
#[derive(Debug)]
pub struct ClassDescriptor {
    name: String,
    supertypes: Vec<String>,
    constructors: Vec<ConstructorDescriptor>,
    fields: Vec<Arc<FieldDescriptor>>,
    methods: Vec<Arc<MethodDescriptor>>,
}

impl ClassDescriptor {
    /// Start describing a class backed by Rust type `T`
    pub fn builder<T: Any + Send>(name: &str) -> ClassBuilder<T> {
        ClassBuilder::new(name)
    }

    /// Registered class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared direct supertypes
    pub fn supertypes(&self) -> &[String] {
        &self.supertypes
    }

    /// Constructor with exactly these parameter types
    pub fn constructor(&self, params: &[ParamType]) -> Option<&ConstructorDescriptor> {
        self.constructors.iter().find(|c| c.params == params)
    }

    /// Public fields in declaration order
    pub fn fields(&self) -> &[Arc<FieldDescriptor>] {
        &self.fields
    }

    /// Public methods in declaration order
    pub fn methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }
}

// ============================================================================
// ClassBuilder
// ============================================================================

/// Typed builder for [`ClassDescriptor`].
///
/// Handlers receive the concrete `T`; the builder erases it so the
/// dispatcher only sees `dyn Any`.
///
/// # Example
///
/// ```ignore
/// let class = ClassDescriptor::builder::<Counter>("demo.Counter")
///     .constructor(|| Ok(Counter::default()))
///     .field("count", |c| Value::Long(c.count))
///     .method1("add", |c, n: i64| {
///         c.count += n;
///         Ok(c.count)
///     })
///     .build()?;
/// ```
pub struct ClassBuilder<T> {
    name: String,
    supertypes: Vec<String>,
    constructors: Vec<ConstructorDescriptor>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send> ClassBuilder<T> {
    /// Create a builder for class `name`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            supertypes: Vec::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declare a supertype (parent class or interface name)
    pub fn extends(mut self, supertype: &str) -> Self {
        self.supertypes.push(supertype.to_string());
        self
    }

    /// Zero-argument constructor
    pub fn constructor<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<T, InvokeError> + Send + Sync + 'static,
    {
        self.constructors.push(ConstructorDescriptor {
            params: Vec::new(),
            ctor: Box::new(move |_args: ArgList<'_>| f().map(|t| Box::new(t) as NativeInstance)),
        });
        self
    }

    /// Constructor taking a configuration node
    pub fn config_constructor<F>(mut self, f: F) -> Self
    where
        F: Fn(&Graph) -> Result<T, InvokeError> + Send + Sync + 'static,
    {
        self.constructors.push(ConstructorDescriptor {
            params: vec![ParamType::Node],
            ctor: Box::new(move |args: ArgList<'_>| {
                let value = args.value(0)?;
                let config = value.as_node().ok_or_else(|| InvokeError::Argument {
                    index: 0,
                    source: ConvertError::TypeMismatch {
                        expected: "node".to_string(),
                        got: value.type_name().to_string(),
                    },
                })?;
                f(config).map(|t| Box::new(t) as NativeInstance)
            }),
        });
        self
    }

    /// Public field read through `getter`
    pub fn field<F>(mut self, name: &str, getter: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.fields.push(FieldDescriptor {
            name: name.to_string(),
            getter: Box::new(move |instance: &(dyn Any + Send)| {
                let this = instance
                    .downcast_ref::<T>()
                    .ok_or(InvokeError::ReceiverMismatch {
                        expected: type_name::<T>(),
                    })?;
                Ok(getter(this))
            }),
        });
        self
    }

    /// Method with explicit parameter types and a raw argument handler
    pub fn method<F>(mut self, name: &str, params: &[ParamType], handler: F) -> Self
    where
        F: Fn(&mut T, ArgList<'_>) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        self.methods.push(MethodDescriptor {
            name: name.to_string(),
            params: params.to_vec(),
            handler: Box::new(move |instance: &mut (dyn Any + Send), args: ArgList<'_>| {
                let this = instance
                    .downcast_mut::<T>()
                    .ok_or(InvokeError::ReceiverMismatch {
                        expected: type_name::<T>(),
                    })?;
                handler(this, args)
            }),
        });
        self
    }

    /// Method without parameters
    pub fn method0<R, F>(self, name: &str, f: F) -> Self
    where
        R: IntoValue,
        F: Fn(&mut T) -> Result<R, InvokeError> + Send + Sync + 'static,
    {
        self.method(name, &[], move |this, _args| f(this).map(IntoValue::into_value))
    }

    /// Method with one parameter; the declared type comes from `A`
    pub fn method1<A, R, F>(self, name: &str, f: F) -> Self
    where
        A: FromValue + NativeType,
        R: IntoValue,
        F: Fn(&mut T, A) -> Result<R, InvokeError> + Send + Sync + 'static,
    {
        self.method(name, &[A::param_type()], move |this, args| {
            let a = args.get::<A>(0)?;
            f(this, a).map(IntoValue::into_value)
        })
    }

    /// Method with two parameters; declared types come from `A` and `B`
    pub fn method2<A, B, R, F>(self, name: &str, f: F) -> Self
    where
        A: FromValue + NativeType,
        B: FromValue + NativeType,
        R: IntoValue,
        F: Fn(&mut T, A, B) -> Result<R, InvokeError> + Send + Sync + 'static,
    {
        self.method(name, &[A::param_type(), B::param_type()], move |this, args| {
            let a = args.get::<A>(0)?;
            let b = args.get::<B>(1)?;
            f(this, a, b).map(IntoValue::into_value)
        })
    }

    /// Validate and build the descriptor
    pub fn build(self) -> Result<ClassDescriptor, RegistryError> {
        for (i, ctor) in self.constructors.iter().enumerate() {
            if self.constructors[..i].iter().any(|c| c.params == ctor.params) {
                return Err(RegistryError::DuplicateConstructor {
                    class: self.name.clone(),
                    params: ctor.params.clone(),
                });
            }
        }

        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(RegistryError::DuplicateField {
                    class: self.name.clone(),
                    name: field.name.clone(),
                });
            }
        }

        for (i, method) in self.methods.iter().enumerate() {
            if self.methods[..i]
                .iter()
                .any(|m| m.name == method.name && m.params == method.params)
            {
                return Err(RegistryError::DuplicateMethod {
                    class: self.name.clone(),
                    signature: method.signature(),
                });
            }
        }

        Ok(ClassDescriptor {
            name: self.name,
            supertypes: self.supertypes,
            constructors: self.constructors,
            fields: self.fields.into_iter().map(Arc::new).collect(),
            methods: self.methods.into_iter().map(Arc::new).collect(),
        })
    }
}
