//! A programmatic provider: modules assembled in code, keyed by path.
//!
//! Hosts that compile their plugin set into the binary register a
//! [`ModuleBlueprint`] per module up front; `load_module` then answers from
//! the registry. There is no filesystem access and no parsing; the blueprint
//! holds finished
//! descriptors built directly against the core metadata graph.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use lynx_core::error::LoadError;
use lynx_core::types::{ClassDescriptor, ModuleExports};
use lynx_core::CapabilityProvider;

/// A module description assembled in code: display name plus exposed-class
/// descriptors in declaration order.
#[derive(Clone, Debug)]
pub struct ModuleBlueprint {
    name: String,
    classes: Vec<ClassDescriptor>,
}

impl ModuleBlueprint {
    /// Start an empty blueprint with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classes: Vec::new(),
        }
    }

    /// Append an exposed class. Order of calls is declaration order.
    pub fn with_class(mut self, descriptor: ClassDescriptor) -> Self {
        self.classes.push(descriptor);
        self
    }

    /// The module's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of exposed classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the blueprint exposes no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// A thread-safe registry of blueprints keyed by load path.
#[derive(Default)]
pub struct StaticProvider {
    modules: Mutex<HashMap<String, ModuleBlueprint>>,
}

impl StaticProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a blueprint under a path key. Re-registering a path replaces
    /// the previous blueprint.
    pub fn register(&self, path: impl Into<String>, blueprint: ModuleBlueprint) {
        let path = path.into();
        debug!(path = %path, module = blueprint.name(), "registering module blueprint");
        self.modules.lock().insert(path, blueprint);
    }
}

impl CapabilityProvider for StaticProvider {
    fn load_module(&self, path: &str) -> Result<ModuleExports, LoadError> {
        let modules = self.modules.lock();
        let blueprint = modules
            .get(path)
            .ok_or_else(|| LoadError::UnknownModule(path.to_owned()))?;
        Ok(ModuleExports::new(
            blueprint.name.clone(),
            blueprint.classes.clone(),
        ))
    }
}

impl fmt::Debug for StaticProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticProvider")
            .field("modules", &self.modules.lock().len())
            .finish()
    }
}
