//! Class registry: resolves type names to class descriptors
//!
//! Populated once at startup, then shared read-only (`Arc<ClassRegistry>`)
//! by every component bound from it.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::class::ClassDescriptor;
use crate::types::ClassHierarchy;

/// Registry of bindable classes indexed by name.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: FxHashMap<String, Arc<ClassDescriptor>>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class under its own name, returning the entry it replaced
    pub fn register(&mut self, class: ClassDescriptor) -> Option<Arc<ClassDescriptor>> {
        let name = class.name().to_string();
        let previous = self.classes.insert(name.clone(), Arc::new(class));
        if previous.is_some() {
            log::warn!("class {} registered twice; keeping the newer descriptor", name);
        }
        previous
    }

    /// Get a class by name
    pub fn get(&self, name: &str) -> Option<Arc<ClassDescriptor>> {
        self.classes.get(name).cloned()
    }

    /// Check if a class is registered
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Registered class names, sorted
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassHierarchy for ClassRegistry {
    fn supertypes(&self, class: &str) -> &[String] {
        self.classes
            .get(class)
            .map(|c| c.supertypes())
            .unwrap_or(&[])
    }
}
