//! Binder: resolves a class name and produces a live instance
//!
//! Instantiation policy:
//! 1. with a config node, use the constructor taking exactly one `node`;
//! 2. without a config node, or when no such constructor exists, use the
//!    zero-argument constructor.
//!
//! A failing constructor is not retried with the other one.

use std::sync::Arc;

use ogdl_graph::{Graph, GraphNode, Value};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::class::{ClassDescriptor, FieldDescriptor, MethodDescriptor, NativeInstance};
use crate::error::BindError;
use crate::registry::ClassRegistry;
use crate::types::ParamType;

/// Public fields of the bound class, keyed by name
#[derive(Debug, Default)]
pub struct FieldIndex {
    fields: FxHashMap<String, Arc<FieldDescriptor>>,
}

impl FieldIndex {
    fn build(class: &ClassDescriptor) -> Self {
        let mut fields = FxHashMap::default();
        for field in class.fields() {
            fields.insert(field.name().to_string(), Arc::clone(field));
        }
        Self { fields }
    }

    /// Field descriptor by name
    pub fn get(&self, name: &str) -> Option<&Arc<FieldDescriptor>> {
        self.fields.get(name)
    }

    /// Check if a field exists
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the class has no public fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Snapshot of the bound class's public methods, in declaration order
pub type MethodTable = Vec<Arc<MethodDescriptor>>;

/// A successfully bound object with its lookup tables
pub struct BoundInstance {
    pub(crate) class: Arc<ClassDescriptor>,
    pub(crate) instance: Mutex<NativeInstance>,
    pub(crate) fields: FieldIndex,
    pub(crate) methods: MethodTable,
}

impl BoundInstance {
    /// Bound class
    pub fn class(&self) -> &ClassDescriptor {
        &self.class
    }

    /// Field index
    pub fn fields(&self) -> &FieldIndex {
        &self.fields
    }

    /// Method table
    pub fn methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }
}

impl std::fmt::Debug for BoundInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundInstance")
            .field("class", &self.class.name())
            .field("fields", &self.fields.len())
            .field("methods", &self.methods.len())
            .finish()
    }
}

/// Resolve `type_name` in `registry` and instantiate it.
pub fn bind(
    registry: &ClassRegistry,
    type_name: &str,
    config: Option<&dyn GraphNode>,
) -> Result<BoundInstance, BindError> {
    let class = registry.get(type_name).ok_or_else(|| BindError::TypeNotFound {
        type_name: type_name.to_string(),
    })?;

    let instance = instantiate(&class, config)?;

    let fields = FieldIndex::build(&class);
    let methods: MethodTable = class.methods().to_vec();

    log::debug!(
        "bound {} ({} fields, {} methods)",
        class.name(),
        fields.len(),
        methods.len()
    );

    Ok(BoundInstance {
        class,
        instance: Mutex::new(instance),
        fields,
        methods,
    })
}

fn instantiate(
    class: &ClassDescriptor,
    config: Option<&dyn GraphNode>,
) -> Result<NativeInstance, BindError> {
    let failed = |source| BindError::ConstructorFailed {
        type_name: class.name().to_string(),
        source,
    };

    if let Some(config) = config {
        if let Some(ctor) = class.constructor(&[ParamType::Node]) {
            log::trace!("{}: using config constructor", class.name());
            return ctor
                .instantiate(&[Value::Node(Graph::from_node(config))])
                .map_err(failed);
        }
        log::trace!("{}: no config constructor, trying default", class.name());
    }

    match class.constructor(&[]) {
        Some(ctor) => ctor.instantiate(&[]).map_err(failed),
        None => Err(BindError::NoUsableConstructor {
            type_name: class.name().to_string(),
        }),
    }
}
